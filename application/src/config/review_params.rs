//! Review parameters for cycle control
//!
//! [`ReviewParams`] groups the static parameters of a review cycle. They are
//! loaded from configuration once and passed to the use cases explicitly.

use gate_domain::ConsensusPolicy;
use gate_domain::quorum::DEFAULT_VETO_OVERRIDE_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default deadline for collecting verdicts.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 300;

/// Quality bar shared with every agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewStandards {
    /// Minimum test coverage, in percent.
    pub test_coverage_minimum: u32,
    /// Maximum cyclomatic complexity per function.
    pub max_complexity: u32,
    /// Maximum changed lines per pull request.
    pub max_pr_lines: u32,
}

impl Default for ReviewStandards {
    fn default() -> Self {
        Self {
            test_coverage_minimum: 80,
            max_complexity: 10,
            max_pr_lines: 500,
        }
    }
}

/// Review cycle control parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewParams {
    pub standards: ReviewStandards,
    /// Approvals needed to override a single veto.
    pub veto_override_threshold: usize,
    /// How long to wait for verdicts before synthesizing timeout vetoes.
    pub timeout: Duration,
}

impl Default for ReviewParams {
    fn default() -> Self {
        Self {
            standards: ReviewStandards::default(),
            veto_override_threshold: DEFAULT_VETO_OVERRIDE_THRESHOLD,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }
}

impl ReviewParams {
    // ==================== Builder Methods ====================

    pub fn with_standards(mut self, standards: ReviewStandards) -> Self {
        self.standards = standards;
        self
    }

    pub fn with_veto_override_threshold(mut self, threshold: usize) -> Self {
        self.veto_override_threshold = threshold;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_timeout_seconds(self, seconds: u64) -> Self {
        self.with_timeout(Duration::from_secs(seconds))
    }

    /// The consensus policy these parameters describe
    pub fn policy(&self) -> ConsensusPolicy {
        ConsensusPolicy::new(self.veto_override_threshold)
    }
}
