//! Metrics store port
//!
//! Durable storage for review metrics: an append-only event log plus a
//! derived aggregate that can be rebuilt from the log at any time.

use gate_domain::{MetricsAggregate, MetricsEvent};
use thiserror::Error;

/// A failed metrics write
///
/// Never fatal for a review cycle.
#[derive(Error, Debug)]
pub enum MetricsWriteError {
    #[error("Metrics I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Metrics serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A failed metrics read
#[derive(Error, Debug)]
pub enum MetricsReadError {
    #[error("Cannot read metrics: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable metrics storage
///
/// Implementations serialize writes (single writer) and must make
/// `append_events` durable before returning, so a crash loses at most the
/// cycle being written. A failed append leaves the log as it was.
pub trait MetricsStore: Send + Sync {
    /// Append verdict events to the log
    fn append_events(&self, events: &[MetricsEvent]) -> Result<(), MetricsWriteError>;

    /// Persist the derived aggregate
    fn persist_aggregate(&self, aggregate: &MetricsAggregate) -> Result<(), MetricsWriteError>;

    /// Load the aggregate, applying any log events it does not cover yet
    ///
    /// Rebuilds from the log when the aggregate is missing or unreadable.
    fn load_aggregate(&self) -> Result<MetricsAggregate, MetricsReadError>;

    /// Read every well-formed event in the log, in append order
    fn read_events(&self) -> Result<Vec<MetricsEvent>, MetricsReadError>;
}
