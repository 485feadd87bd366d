//! Configuration value objects for the domain layer
//!
//! These are domain concepts related to configuration that are
//! used across multiple layers.

mod issue;
mod report_format;

pub use issue::{ConfigIssue, ConfigIssueCode, IssueLevel};
pub use report_format::ReportFormat;
