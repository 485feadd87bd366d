//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod detect_agents;
pub mod record_metrics;
pub mod run_consensus;
