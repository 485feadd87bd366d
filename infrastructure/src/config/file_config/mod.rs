//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod agents;
mod metrics;
mod review;

pub use agents::{FileAgentDefinition, FileAgentsConfig};
pub use metrics::{DEFAULT_METRICS_DIR, FileMetricsConfig};
pub use review::FileReviewConfig;

use gate_application::ReviewParams;
use gate_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Review standards, override threshold, and deadline
    pub review: FileReviewConfig,
    /// Agent selection, validator commands, and extra definitions
    pub agents: FileAgentsConfig,
    /// Metrics storage
    pub metrics: FileMetricsConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.review.validate();
        issues.extend(self.agents.validate());
        issues
    }

    /// Review parameters for the consensus cycle
    pub fn review_params(&self) -> ReviewParams {
        self.review.to_params()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[review]
timeout_seconds = 120

[agents]
active = ["security-agent"]

[metrics]
dir = "/tmp/metrics"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let params = config.review_params();
        assert_eq!(params.timeout, Duration::from_secs(120));
        assert_eq!(config.agents.active, Some(vec!["security-agent".to_string()]));
        assert_eq!(config.metrics.dir.to_str(), Some("/tmp/metrics"));
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config, FileConfig::default());
        assert!(config.agents.active.is_none());
        assert_eq!(config.review_params(), ReviewParams::default());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let config: FileConfig = toml::from_str("[review]\nlegacy_mode = true\n").unwrap();
        assert_eq!(config.review, FileReviewConfig::default());
    }
}
