//! Presentation layer for review-gate
//!
//! This crate contains the CLI definition, report formatters,
//! and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, DetectArgs, ProjectArgs, ReviewArgs, StatsArgs};
pub use output::console::ConsoleFormatter;
pub use output::formatter::{JsonFormatter, ReportFormatter, StatsReport, formatter_for};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
