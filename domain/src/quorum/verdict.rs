//! Verdict types for the consensus gate
//!
//! This module defines the per-agent decision primitives that the
//! consensus engine aggregates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reason attached to verdicts synthesized for agents that never answered
pub const TIMEOUT_REASON: &str = "timeout";

/// Reason attached to verdicts synthesized for agents whose validation failed
pub const AGENT_ERROR_REASON: &str = "agent error";

/// Decision of a single agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerdictStatus {
    Approve,
    Veto,
    Warn,
}

impl VerdictStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictStatus::Approve => "APPROVE",
            VerdictStatus::Veto => "VETO",
            VerdictStatus::Warn => "WARN",
        }
    }
}

impl fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerdictStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "APPROVE" | "APPROVED" => Ok(VerdictStatus::Approve),
            "VETO" => Ok(VerdictStatus::Veto),
            "WARN" | "WARNING" => Ok(VerdictStatus::Warn),
            other => Err(format!(
                "Unknown verdict status: {}. Valid: APPROVE, VETO, WARN",
                other
            )),
        }
    }
}

/// How serious a verdict is
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => Err(format!(
                "Unknown severity: {}. Valid: low, medium, high, critical",
                other
            )),
        }
    }
}

/// Where a verdict came from
///
/// Lets reports tell a timeout or a crashed validator apart from a
/// substantive veto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictOrigin {
    /// Returned by the agent's own validation
    #[default]
    Agent,
    /// Synthesized because the agent did not answer before the deadline
    Timeout,
    /// Synthesized because the agent's validation failed
    AgentError,
}

/// A single agent's decision for one review cycle
///
/// # Example
///
/// ```
/// use gate_domain::quorum::{AgentVerdict, Severity, VerdictStatus};
///
/// let approval = AgentVerdict::approve("test-agent", "Coverage at 91%");
/// assert!(approval.is_approve());
///
/// let veto = AgentVerdict::veto("security-agent", "Hardcoded secret", Severity::Critical)
///     .with_evidence("src/config.rs:12");
/// assert_eq!(veto.status, VerdictStatus::Veto);
/// assert_eq!(veto.evidence.as_deref(), Some("src/config.rs:12"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentVerdict {
    pub agent_id: String,
    pub status: VerdictStatus,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub origin: VerdictOrigin,
}

impl AgentVerdict {
    pub fn new(
        agent_id: impl Into<String>,
        status: VerdictStatus,
        reason: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            status,
            reason: reason.into(),
            evidence: None,
            severity,
            origin: VerdictOrigin::Agent,
        }
    }

    pub fn approve(agent_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(agent_id, VerdictStatus::Approve, reason, Severity::Low)
    }

    pub fn veto(agent_id: impl Into<String>, reason: impl Into<String>, severity: Severity) -> Self {
        Self::new(agent_id, VerdictStatus::Veto, reason, severity)
    }

    pub fn warn(agent_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(agent_id, VerdictStatus::Warn, reason, Severity::Medium)
    }

    /// Fail-closed verdict for an agent that missed the deadline
    pub fn timeout(agent_id: impl Into<String>) -> Self {
        Self {
            origin: VerdictOrigin::Timeout,
            ..Self::veto(agent_id, TIMEOUT_REASON, Severity::High)
        }
    }

    /// Fail-closed verdict for an agent whose validation failed
    pub fn agent_error(agent_id: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            origin: VerdictOrigin::AgentError,
            ..Self::veto(agent_id, AGENT_ERROR_REASON, Severity::High).with_evidence(detail)
        }
    }

    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = Some(evidence.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn is_approve(&self) -> bool {
        self.status == VerdictStatus::Approve
    }

    pub fn is_veto(&self) -> bool {
        self.status == VerdictStatus::Veto
    }

    pub fn is_warn(&self) -> bool {
        self.status == VerdictStatus::Warn
    }

    pub fn is_timeout(&self) -> bool {
        self.origin == VerdictOrigin::Timeout
    }

    /// Whether this verdict was synthesized rather than returned by the agent
    pub fn is_synthesized(&self) -> bool {
        self.origin != VerdictOrigin::Agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_creation() {
        let verdict = AgentVerdict::approve("logic-agent", "Looks good!");
        assert!(verdict.is_approve());
        assert_eq!(verdict.agent_id, "logic-agent");
        assert_eq!(verdict.reason, "Looks good!");
        assert_eq!(verdict.origin, VerdictOrigin::Agent);
    }

    #[test]
    fn test_timeout_verdict_is_high_severity_veto() {
        let verdict = AgentVerdict::timeout("doc-agent");
        assert!(verdict.is_veto());
        assert!(verdict.is_timeout());
        assert!(verdict.is_synthesized());
        assert_eq!(verdict.reason, TIMEOUT_REASON);
        assert_eq!(verdict.severity, Severity::High);
    }

    #[test]
    fn test_agent_error_verdict_keeps_detail() {
        let verdict = AgentVerdict::agent_error("infra-agent", "exit status 127");
        assert!(verdict.is_veto());
        assert!(!verdict.is_timeout());
        assert_eq!(verdict.origin, VerdictOrigin::AgentError);
        assert_eq!(verdict.reason, AGENT_ERROR_REASON);
        assert_eq!(verdict.evidence.as_deref(), Some("exit status 127"));
    }

    #[test]
    fn test_parse_status() {
        assert_eq!("approve".parse::<VerdictStatus>(), Ok(VerdictStatus::Approve));
        assert_eq!("VETO".parse::<VerdictStatus>(), Ok(VerdictStatus::Veto));
        assert_eq!(" warning ".parse::<VerdictStatus>(), Ok(VerdictStatus::Warn));
        assert!("maybe".parse::<VerdictStatus>().is_err());
    }

    #[test]
    fn test_severity_ordering_and_parse() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::Low < Severity::Medium);
        assert_eq!("CRITICAL".parse::<Severity>(), Ok(Severity::Critical));
        assert!("severe".parse::<Severity>().is_err());
    }

    #[test]
    fn test_serialize_wire_format() {
        let verdict = AgentVerdict::warn("doc-agent", "README outdated");
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["status"], "WARN");
        assert_eq!(json["severity"], "medium");
        assert_eq!(json["origin"], "agent");
        assert!(json.get("evidence").is_none());
    }

    #[test]
    fn test_deserialize_minimal_verdict() {
        let verdict: AgentVerdict = serde_json::from_str(
            r#"{"agent_id": "test-agent", "status": "APPROVE", "reason": "ok"}"#,
        )
        .unwrap();
        assert!(verdict.is_approve());
        assert_eq!(verdict.severity, Severity::Medium);
        assert_eq!(verdict.origin, VerdictOrigin::Agent);
    }
}
