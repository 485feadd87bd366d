//! Review gate configuration from TOML (`[review]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [review]
//! test_coverage_minimum = 80
//! max_complexity = 10
//! max_pr_lines = 500
//! veto_override_threshold = 6
//! timeout_seconds = 300
//! ```

use gate_application::config::review_params::DEFAULT_TIMEOUT_SECONDS;
use gate_application::{ReviewParams, ReviewStandards};
use gate_domain::quorum::DEFAULT_VETO_OVERRIDE_THRESHOLD;
use gate_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Review standards and consensus settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReviewConfig {
    /// Minimum test coverage in percent
    pub test_coverage_minimum: u32,
    /// Maximum cyclomatic complexity per function
    pub max_complexity: u32,
    /// Maximum changed lines per pull request
    pub max_pr_lines: u32,
    /// Approvals required to override a single veto
    pub veto_override_threshold: usize,
    /// Deadline for collecting verdicts
    pub timeout_seconds: u64,
}

impl Default for FileReviewConfig {
    fn default() -> Self {
        let standards = ReviewStandards::default();
        Self {
            test_coverage_minimum: standards.test_coverage_minimum,
            max_complexity: standards.max_complexity,
            max_pr_lines: standards.max_pr_lines,
            veto_override_threshold: DEFAULT_VETO_OVERRIDE_THRESHOLD,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl FileReviewConfig {
    pub fn to_standards(&self) -> ReviewStandards {
        ReviewStandards {
            test_coverage_minimum: self.test_coverage_minimum,
            max_complexity: self.max_complexity,
            max_pr_lines: self.max_pr_lines,
        }
    }

    pub fn to_params(&self) -> ReviewParams {
        ReviewParams::default()
            .with_standards(self.to_standards())
            .with_veto_override_threshold(self.veto_override_threshold)
            .with_timeout(Duration::from_secs(self.timeout_seconds))
    }

    pub(super) fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.timeout_seconds == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout,
                "review.timeout_seconds is 0: every agent would time out immediately",
            ));
        }
        if self.veto_override_threshold == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroOverrideThreshold,
                "review.veto_override_threshold is 0: any single veto can be overridden",
            ));
        }
        if self.test_coverage_minimum > 100 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::CoverageOutOfRange,
                format!(
                    "review.test_coverage_minimum is {}%, above 100%",
                    self.test_coverage_minimum
                ),
            ));
        }

        issues
    }
}
