//! Infrastructure layer for review-gate
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the filesystem signal scanner, the JSONL metrics
//! store, validator adapters, and configuration file loading.

pub mod agents;
pub mod config;
pub mod metrics;
pub mod scanner;

// Re-export commonly used types
pub use agents::{
    RecordedVerdictAgent, RecordedVerdicts, RecordedVerdictsError, ScriptReviewAgent,
    build_review_agents,
};
pub use config::{
    ConfigLoader, DEFAULT_METRICS_DIR, ENV_PREFIX, FileAgentDefinition, FileAgentsConfig,
    FileConfig, FileMetricsConfig, FileReviewConfig,
};
pub use metrics::JsonlMetricsStore;
pub use scanner::FsSignalScanner;
