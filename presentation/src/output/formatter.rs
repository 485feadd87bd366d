//! Report formatter trait

use crate::output::console::ConsoleFormatter;
use gate_application::{DetectionReport, ReviewReport};
use gate_domain::{AgentStats, ReasonCount, ReportFormat};
use serde::Serialize;

/// Statistics shown by the `stats` command
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub agents: Vec<AgentStats>,
    pub top_veto_reasons: Vec<ReasonCount>,
}

/// Trait for rendering review-gate reports
pub trait ReportFormatter {
    fn detection(&self, report: &DetectionReport) -> String;

    fn review(&self, report: &ReviewReport) -> String;

    fn stats(&self, report: &StatsReport) -> String;
}

/// Pretty-printed JSON for every report
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn to_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl ReportFormatter for JsonFormatter {
    fn detection(&self, report: &DetectionReport) -> String {
        Self::to_json(report)
    }

    fn review(&self, report: &ReviewReport) -> String {
        Self::to_json(report)
    }

    fn stats(&self, report: &StatsReport) -> String {
        Self::to_json(report)
    }
}

/// Formatter for the requested report format
pub fn formatter_for(format: ReportFormat) -> Box<dyn ReportFormatter> {
    match format {
        ReportFormat::Text => Box::new(ConsoleFormatter),
        ReportFormat::Json => Box::new(JsonFormatter),
    }
}
