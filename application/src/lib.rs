//! Application layer for review-gate
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ReviewParams, ReviewStandards};
pub use ports::{
    metrics_store::{MetricsReadError, MetricsStore, MetricsWriteError},
    progress::{CycleProgressNotifier, NoProgress},
    review_agent::{AgentError, ReviewAgent, ReviewAgentRegistry, ReviewRequest},
    signal_scanner::{ScanError, SignalScanner},
};
pub use use_cases::detect_agents::{
    DetectAgentsInput, DetectAgentsUseCase, DetectError, DetectionReport, InactiveAgent,
};
pub use use_cases::record_metrics::{MetricsRecorder, RecordReport};
pub use use_cases::run_consensus::{
    CycleOutcome, ReviewError, ReviewReport, RunConsensusInput, RunConsensusUseCase,
};
