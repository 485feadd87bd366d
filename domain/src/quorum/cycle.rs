//! Review cycle state machine
//!
//! ```text
//! COLLECTING ──(all verdicts | deadline)──▶ ALL_RECEIVED ──▶ DECIDING ──▶ DECIDED
//! ```
//!
//! On the deadline every agent still pending receives a synthesized timeout
//! VETO. Verdicts arriving after that point are discarded.

use super::consensus::{ConsensusResult, decide};
use super::policy::ConsensusPolicy;
use super::verdict::AgentVerdict;
use crate::core::error::CycleError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Phase of a review cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
    Collecting,
    AllReceived,
    Deciding,
    Decided,
}

/// What happened to a submitted verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Stored; other agents are still pending
    Accepted,
    /// Stored; it was the last one outstanding
    Completed,
    /// Arrived after the cycle stopped collecting and was dropped
    Discarded,
}

/// One review cycle over a fixed set of active agents
///
/// # Example
///
/// ```
/// use gate_domain::quorum::{AgentVerdict, ConsensusDecision, ConsensusPolicy, CyclePhase, ReviewCycle};
///
/// let mut cycle = ReviewCycle::new("cycle-1", ["data-agent", "doc-agent"]);
/// cycle.record(AgentVerdict::approve("data-agent", "ok")).unwrap();
/// assert_eq!(cycle.phase(), CyclePhase::Collecting);
///
/// let synthesized = cycle.expire();
/// assert_eq!(synthesized.len(), 1);
///
/// let result = cycle.decide(&ConsensusPolicy::default(), false).unwrap();
/// assert_eq!(result.decision, ConsensusDecision::Blocked);
/// ```
#[derive(Debug, Clone)]
pub struct ReviewCycle {
    id: String,
    pending: BTreeSet<String>,
    active: BTreeSet<String>,
    verdicts: Vec<AgentVerdict>,
    phase: CyclePhase,
    result: Option<ConsensusResult>,
}

impl ReviewCycle {
    pub fn new<I, S>(id: impl Into<String>, active_agents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let active: BTreeSet<String> = active_agents.into_iter().map(Into::into).collect();
        let phase = if active.is_empty() {
            CyclePhase::AllReceived
        } else {
            CyclePhase::Collecting
        };

        Self {
            id: id.into(),
            pending: active.clone(),
            active,
            verdicts: Vec::new(),
            phase,
            result: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    /// Verdicts in the order they were received (synthesized ones last)
    pub fn verdicts(&self) -> &[AgentVerdict] {
        &self.verdicts
    }

    /// Agents that have not answered yet, sorted by id
    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.pending.iter().map(String::as_str)
    }

    pub fn is_collecting(&self) -> bool {
        self.phase == CyclePhase::Collecting
    }

    /// The decision, once the cycle is decided
    pub fn result(&self) -> Option<&ConsensusResult> {
        self.result.as_ref()
    }

    /// Record a verdict from an active agent
    pub fn record(&mut self, verdict: AgentVerdict) -> Result<RecordOutcome, CycleError> {
        if self.phase != CyclePhase::Collecting {
            return Ok(RecordOutcome::Discarded);
        }
        if !self.active.contains(&verdict.agent_id) {
            return Err(CycleError::UnknownAgent(verdict.agent_id));
        }
        if !self.pending.remove(&verdict.agent_id) {
            return Err(CycleError::DuplicateVerdict(verdict.agent_id));
        }

        self.verdicts.push(verdict);

        if self.pending.is_empty() {
            self.phase = CyclePhase::AllReceived;
            Ok(RecordOutcome::Completed)
        } else {
            Ok(RecordOutcome::Accepted)
        }
    }

    /// Close collection at the deadline
    ///
    /// Every pending agent gets a timeout VETO. Returns the synthesized
    /// verdicts (empty if nothing was pending or collection already ended).
    pub fn expire(&mut self) -> Vec<AgentVerdict> {
        if self.phase != CyclePhase::Collecting {
            return Vec::new();
        }

        let synthesized: Vec<AgentVerdict> = std::mem::take(&mut self.pending)
            .into_iter()
            .map(AgentVerdict::timeout)
            .collect();
        self.verdicts.extend(synthesized.iter().cloned());
        self.phase = CyclePhase::AllReceived;
        synthesized
    }

    /// Apply the decision rule and move to `Decided`
    pub fn decide(
        &mut self,
        policy: &ConsensusPolicy,
        override_requested: bool,
    ) -> Result<ConsensusResult, CycleError> {
        match self.phase {
            CyclePhase::Collecting => {
                return Err(CycleError::StillCollecting {
                    pending: self.pending.len(),
                });
            }
            CyclePhase::Deciding | CyclePhase::Decided => return Err(CycleError::AlreadyDecided),
            CyclePhase::AllReceived => {}
        }

        self.phase = CyclePhase::Deciding;
        let result = decide(&self.verdicts, policy, override_requested);
        self.result = Some(result.clone());
        self.phase = CyclePhase::Decided;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quorum::consensus::ConsensusDecision;
    use crate::quorum::verdict::{Severity, TIMEOUT_REASON};

    #[test]
    fn test_completes_when_all_received() {
        let mut cycle = ReviewCycle::new("c1", ["a", "b"]);

        assert_eq!(
            cycle.record(AgentVerdict::approve("a", "ok")),
            Ok(RecordOutcome::Accepted)
        );
        assert_eq!(
            cycle.record(AgentVerdict::approve("b", "ok")),
            Ok(RecordOutcome::Completed)
        );
        assert_eq!(cycle.phase(), CyclePhase::AllReceived);

        let result = cycle.decide(&ConsensusPolicy::default(), false).unwrap();
        assert_eq!(result.decision, ConsensusDecision::Approved);
        assert_eq!(cycle.phase(), CyclePhase::Decided);
        assert!(cycle.result().is_some());
    }

    #[test]
    fn test_unknown_agent_rejected() {
        let mut cycle = ReviewCycle::new("c1", ["a"]);
        assert_eq!(
            cycle.record(AgentVerdict::approve("z", "ok")),
            Err(CycleError::UnknownAgent("z".to_string()))
        );
    }

    #[test]
    fn test_duplicate_verdict_rejected() {
        let mut cycle = ReviewCycle::new("c1", ["a", "b"]);
        cycle.record(AgentVerdict::approve("a", "ok")).unwrap();
        assert_eq!(
            cycle.record(AgentVerdict::veto("a", "changed my mind", Severity::Low)),
            Err(CycleError::DuplicateVerdict("a".to_string()))
        );
        assert_eq!(cycle.verdicts().len(), 1);
    }

    #[test]
    fn test_expire_synthesizes_timeout_vetoes() {
        let mut cycle = ReviewCycle::new("c1", ["a", "c", "b"]);
        cycle.record(AgentVerdict::approve("a", "ok")).unwrap();

        let synthesized = cycle.expire();
        let ids: Vec<_> = synthesized.iter().map(|v| v.agent_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
        assert!(synthesized.iter().all(|v| v.reason == TIMEOUT_REASON));
        assert_eq!(cycle.pending().count(), 0);

        let result = cycle.decide(&ConsensusPolicy::default(), false).unwrap();
        assert_eq!(result.decision, ConsensusDecision::Blocked);
        assert_eq!(result.timeouts().count(), 2);
    }

    #[test]
    fn test_timeout_cannot_be_approved() {
        // Even a lenient policy cannot approve a cycle with two timeouts
        let mut cycle = ReviewCycle::new("c1", ["a", "b", "c"]);
        cycle.record(AgentVerdict::approve("a", "ok")).unwrap();
        cycle.expire();

        let result = cycle.decide(&ConsensusPolicy::new(0), true).unwrap();
        assert_ne!(result.decision, ConsensusDecision::Approved);
        assert!(result.is_blocked());
    }

    #[test]
    fn test_late_verdict_discarded() {
        let mut cycle = ReviewCycle::new("c1", ["a", "b"]);
        cycle.record(AgentVerdict::approve("a", "ok")).unwrap();
        cycle.expire();

        assert_eq!(
            cycle.record(AgentVerdict::approve("b", "finally")),
            Ok(RecordOutcome::Discarded)
        );

        let b = cycle
            .verdicts()
            .iter()
            .find(|v| v.agent_id == "b")
            .unwrap();
        assert!(b.is_timeout());
    }

    #[test]
    fn test_expire_after_completion_is_noop() {
        let mut cycle = ReviewCycle::new("c1", ["a"]);
        cycle.record(AgentVerdict::approve("a", "ok")).unwrap();
        assert!(cycle.expire().is_empty());
    }

    #[test]
    fn test_decide_requires_all_received() {
        let mut cycle = ReviewCycle::new("c1", ["a", "b"]);
        cycle.record(AgentVerdict::approve("a", "ok")).unwrap();

        assert_eq!(
            cycle.decide(&ConsensusPolicy::default(), false),
            Err(CycleError::StillCollecting { pending: 1 })
        );
    }

    #[test]
    fn test_decide_only_once() {
        let mut cycle = ReviewCycle::new("c1", ["a"]);
        cycle.record(AgentVerdict::approve("a", "ok")).unwrap();
        cycle.decide(&ConsensusPolicy::default(), false).unwrap();

        assert_eq!(
            cycle.decide(&ConsensusPolicy::default(), false),
            Err(CycleError::AlreadyDecided)
        );
    }

    #[test]
    fn test_empty_cycle_skips_collection() {
        let cycle = ReviewCycle::new("c1", Vec::<String>::new());
        assert_eq!(cycle.phase(), CyclePhase::AllReceived);
    }
}
