//! Override policy for the consensus gate
//!
//! The gate requires unanimous approval. The only exception is an explicitly
//! requested override of a single veto, allowed when enough other agents
//! approve.

use serde::{Deserialize, Serialize};

/// Default number of approvals needed to override a single veto
pub const DEFAULT_VETO_OVERRIDE_THRESHOLD: usize = 6;

/// Rule for deciding whether a veto may be overridden
///
/// The threshold is an absolute approval count. It does not scale with the
/// number of active agents.
///
/// # Example
///
/// ```
/// use gate_domain::quorum::ConsensusPolicy;
///
/// let policy = ConsensusPolicy::default();
/// assert!(policy.override_allowed(1, 6));
/// assert!(!policy.override_allowed(1, 5));
/// assert!(!policy.override_allowed(2, 10)); // never more than one veto
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusPolicy {
    /// Approvals required for an override
    pub veto_override_threshold: usize,
}

impl Default for ConsensusPolicy {
    fn default() -> Self {
        Self {
            veto_override_threshold: DEFAULT_VETO_OVERRIDE_THRESHOLD,
        }
    }
}

impl ConsensusPolicy {
    pub fn new(veto_override_threshold: usize) -> Self {
        Self {
            veto_override_threshold,
        }
    }

    /// Check whether an override may be granted
    ///
    /// Only a lone veto can be overridden, and only when `approvals` reaches
    /// the threshold. Warnings are not approvals.
    pub fn override_allowed(&self, vetoes: usize, approvals: usize) -> bool {
        vetoes == 1 && approvals >= self.veto_override_threshold
    }

    /// Get a human-readable description of this policy
    pub fn description(&self) -> String {
        format!(
            "unanimous; a single veto can be overridden with at least {} approvals",
            self.veto_override_threshold
        )
    }
}

impl std::fmt::Display for ConsensusPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold() {
        assert_eq!(ConsensusPolicy::default().veto_override_threshold, 6);
    }

    #[test]
    fn test_single_veto_threshold() {
        let policy = ConsensusPolicy::default();

        assert!(!policy.override_allowed(1, 5));
        assert!(policy.override_allowed(1, 6));
        assert!(policy.override_allowed(1, 12));
    }

    #[test]
    fn test_multiple_vetoes_never_overridable() {
        let policy = ConsensusPolicy::new(1);

        assert!(!policy.override_allowed(2, 100));
        assert!(!policy.override_allowed(3, 3));
    }

    #[test]
    fn test_no_veto_is_not_an_override() {
        assert!(!ConsensusPolicy::new(0).override_allowed(0, 10));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ConsensusPolicy::new(4).to_string(),
            "unanimous; a single veto can be overridden with at least 4 approvals"
        );
    }
}
