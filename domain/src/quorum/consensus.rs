//! Consensus decision
//!
//! Aggregates one verdict per active agent into a single gate decision.

use super::policy::ConsensusPolicy;
use super::verdict::AgentVerdict;
use serde::{Deserialize, Serialize};

/// Outcome of a review cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsensusDecision {
    /// No agent vetoed
    Approved,
    /// At least one veto stands
    Blocked,
    /// A single veto was overridden on request
    ApprovedWithOverride,
}

impl ConsensusDecision {
    /// Whether the downstream action may proceed
    pub fn allows_proceed(&self) -> bool {
        !matches!(self, ConsensusDecision::Blocked)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsensusDecision::Approved => "APPROVED",
            ConsensusDecision::Blocked => "BLOCKED",
            ConsensusDecision::ApprovedWithOverride => "APPROVED_WITH_OVERRIDE",
        }
    }
}

impl std::fmt::Display for ConsensusDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregated result of a review cycle
///
/// `vetoes` keeps every VETO verdict in the order it was received. When an
/// override was granted the single overridden veto stays here for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub decision: ConsensusDecision,
    pub vetoes: Vec<AgentVerdict>,
    /// WARN verdicts, carried for reporting only
    pub warnings: Vec<AgentVerdict>,
    pub overridden: bool,
    pub override_requested: bool,
    pub approvals: usize,
    pub total_agents: usize,
}

impl ConsensusResult {
    pub fn is_approved(&self) -> bool {
        self.decision.allows_proceed()
    }

    pub fn is_blocked(&self) -> bool {
        self.decision == ConsensusDecision::Blocked
    }

    /// Vetoes synthesized because an agent timed out
    pub fn timeouts(&self) -> impl Iterator<Item = &AgentVerdict> {
        self.vetoes.iter().filter(|v| v.is_timeout())
    }

    /// Vetoes returned by the agents themselves
    pub fn substantive_vetoes(&self) -> impl Iterator<Item = &AgentVerdict> {
        self.vetoes.iter().filter(|v| !v.is_synthesized())
    }

    /// Generate a visual verdict summary (e.g., "6/8 approve, 1 veto, 1 warn")
    pub fn summary(&self) -> String {
        format!(
            "{}/{} approve, {} veto, {} warn",
            self.approvals,
            self.total_agents,
            self.vetoes.len(),
            self.warnings.len()
        )
    }
}

/// Apply the decision rule to a complete set of verdicts
///
/// 1. No vetoes: `Approved`. WARN verdicts never block.
/// 2. Exactly one veto, override requested, approvals at or above the
///    threshold: `ApprovedWithOverride`.
/// 3. Otherwise `Blocked`.
///
/// # Example
///
/// ```
/// use gate_domain::quorum::{decide, AgentVerdict, ConsensusDecision, ConsensusPolicy, Severity};
///
/// let verdicts = vec![
///     AgentVerdict::approve("data-agent", "ok"),
///     AgentVerdict::veto("doc-agent", "README outdated", Severity::Medium),
/// ];
/// let result = decide(&verdicts, &ConsensusPolicy::default(), false);
/// assert_eq!(result.decision, ConsensusDecision::Blocked);
/// assert_eq!(result.vetoes.len(), 1);
/// ```
pub fn decide(
    verdicts: &[AgentVerdict],
    policy: &ConsensusPolicy,
    override_requested: bool,
) -> ConsensusResult {
    let vetoes: Vec<AgentVerdict> = verdicts.iter().filter(|v| v.is_veto()).cloned().collect();
    let warnings: Vec<AgentVerdict> = verdicts.iter().filter(|v| v.is_warn()).cloned().collect();
    let approvals = verdicts.iter().filter(|v| v.is_approve()).count();

    let (decision, overridden) = if vetoes.is_empty() {
        (ConsensusDecision::Approved, false)
    } else if override_requested && policy.override_allowed(vetoes.len(), approvals) {
        (ConsensusDecision::ApprovedWithOverride, true)
    } else {
        (ConsensusDecision::Blocked, false)
    };

    ConsensusResult {
        decision,
        vetoes,
        warnings,
        overridden,
        override_requested,
        approvals,
        total_agents: verdicts.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quorum::verdict::Severity;

    fn approvals(n: usize) -> Vec<AgentVerdict> {
        (0..n)
            .map(|i| AgentVerdict::approve(format!("agent-{i}"), "ok"))
            .collect()
    }

    #[test]
    fn test_all_approve() {
        let result = decide(&approvals(6), &ConsensusPolicy::default(), false);

        assert_eq!(result.decision, ConsensusDecision::Approved);
        assert!(!result.overridden);
        assert!(result.vetoes.is_empty());
        assert_eq!(result.approvals, 6);
        assert_eq!(result.total_agents, 6);
    }

    #[test]
    fn test_single_veto_blocks_without_override() {
        let mut verdicts = approvals(7);
        verdicts.push(AgentVerdict::veto("security-agent", "secret", Severity::Critical));

        let result = decide(&verdicts, &ConsensusPolicy::default(), false);

        assert_eq!(result.decision, ConsensusDecision::Blocked);
        assert_eq!(result.vetoes.len(), 1);
        assert!(!result.overridden);
    }

    #[test]
    fn test_override_with_six_approvals() {
        // N=8: 6 approve, 1 veto, 1 warn
        let mut verdicts = approvals(6);
        verdicts.push(AgentVerdict::veto("doc-agent", "stale docs", Severity::Medium));
        verdicts.push(AgentVerdict::warn("refactor-agent", "long function"));

        let result = decide(&verdicts, &ConsensusPolicy::default(), true);

        assert_eq!(result.decision, ConsensusDecision::ApprovedWithOverride);
        assert!(result.overridden);
        assert_eq!(result.vetoes.len(), 1);
        assert_eq!(result.vetoes[0].agent_id, "doc-agent");
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.total_agents, 8);
    }

    #[test]
    fn test_override_fails_with_five_approvals() {
        // Warnings do not count toward the threshold
        let mut verdicts = approvals(5);
        verdicts.push(AgentVerdict::veto("doc-agent", "stale docs", Severity::Medium));
        verdicts.push(AgentVerdict::warn("refactor-agent", "long function"));
        verdicts.push(AgentVerdict::warn("build-agent", "slow build"));

        let result = decide(&verdicts, &ConsensusPolicy::default(), true);

        assert_eq!(result.decision, ConsensusDecision::Blocked);
        assert!(!result.overridden);
        assert!(result.override_requested);
    }

    #[test]
    fn test_two_vetoes_never_overridden() {
        let mut verdicts = approvals(10);
        verdicts.push(AgentVerdict::veto("security-agent", "secret", Severity::Critical));
        verdicts.push(AgentVerdict::veto("test-agent", "coverage 60%", Severity::High));

        let result = decide(&verdicts, &ConsensusPolicy::default(), true);

        assert_eq!(result.decision, ConsensusDecision::Blocked);
        assert_eq!(result.vetoes.len(), 2);
    }

    #[test]
    fn test_vetoes_keep_received_order() {
        let verdicts = vec![
            AgentVerdict::veto("test-agent", "b", Severity::High),
            AgentVerdict::approve("data-agent", "ok"),
            AgentVerdict::veto("doc-agent", "a", Severity::Low),
        ];

        let result = decide(&verdicts, &ConsensusPolicy::default(), false);

        let order: Vec<_> = result.vetoes.iter().map(|v| v.agent_id.as_str()).collect();
        assert_eq!(order, vec!["test-agent", "doc-agent"]);
    }

    #[test]
    fn test_warnings_never_block() {
        let mut verdicts = approvals(3);
        verdicts.push(AgentVerdict::warn("doc-agent", "typo"));

        let result = decide(&verdicts, &ConsensusPolicy::default(), false);

        assert_eq!(result.decision, ConsensusDecision::Approved);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_timeout_distinguished_from_substantive_veto() {
        let verdicts = vec![
            AgentVerdict::veto("security-agent", "secret", Severity::Critical),
            AgentVerdict::timeout("doc-agent"),
        ];

        let result = decide(&verdicts, &ConsensusPolicy::default(), false);

        assert_eq!(result.timeouts().count(), 1);
        assert_eq!(result.substantive_vetoes().count(), 1);
    }

    #[test]
    fn test_summary_and_display() {
        let mut verdicts = approvals(2);
        verdicts.push(AgentVerdict::warn("doc-agent", "typo"));
        let result = decide(&verdicts, &ConsensusPolicy::default(), false);

        assert_eq!(result.summary(), "2/3 approve, 0 veto, 1 warn");
        assert_eq!(ConsensusDecision::ApprovedWithOverride.to_string(), "APPROVED_WITH_OVERRIDE");
        assert!(ConsensusDecision::ApprovedWithOverride.allows_proceed());
        assert!(!ConsensusDecision::Blocked.allows_proceed());
    }
}
