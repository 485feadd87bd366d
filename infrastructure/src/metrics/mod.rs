//! Metrics persistence
//!
//! Provides [`JsonlMetricsStore`], the file-backed implementation of the
//! [`MetricsStore`](gate_application::ports::metrics_store::MetricsStore) port.

mod jsonl_store;

pub use jsonl_store::{AGGREGATE_FILE, EVENTS_FILE, JsonlMetricsStore};
