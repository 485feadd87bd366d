//! Core domain concepts shared across all subdomains.
//!
//! - [`error::RuleEvaluationError`]: broken agent definitions or explicit lists
//! - [`error::CycleError`]: misuse of the review cycle state machine
//! - [`string`]: display helpers

pub mod error;
pub mod string;
