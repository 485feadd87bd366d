//! Port definitions (interfaces) for external dependencies
//!
//! Ports define the boundary between the application layer and the outside
//! world. Adapters in the infrastructure and presentation layers implement
//! these traits.

pub mod metrics_store;
pub mod progress;
pub mod review_agent;
pub mod signal_scanner;
