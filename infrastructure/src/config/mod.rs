//! Configuration file loading for review-gate
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `REVIEW_GATE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `review-gate.toml` or `.review-gate.toml`
//! 4. Global: `$XDG_CONFIG_HOME/review-gate/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    DEFAULT_METRICS_DIR, FileAgentDefinition, FileAgentsConfig, FileConfig, FileMetricsConfig,
    FileReviewConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
