//! Console output formatter for review-gate reports

use crate::output::formatter::{ReportFormatter, StatsReport};
use colored::{ColoredString, Colorize};
use gate_application::{DetectionReport, RecordReport, ReviewReport};
use gate_domain::{
    AgentVerdict, ConfigIssue, ConsensusDecision, ConsensusResult, ProjectSignals, VerdictOrigin,
    VerdictStatus,
};

/// Languages listed in the detection summary
const TOP_LANGUAGES: usize = 5;

/// Formats reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a detection report
    pub fn format_detection(report: &DetectionReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Agent Detection"));
        output.push('\n');
        output.push_str(&format!(
            "{} {}\n",
            "Project:".cyan().bold(),
            report.root.display()
        ));
        output.push_str(&Self::signals(&report.signals));

        let title = if report.active.is_explicit() {
            format!("Active Agents ({}, explicit list)", report.active.len())
        } else {
            format!("Active Agents ({})", report.active.len())
        };
        output.push_str(&Self::section_header(&title));
        for agent in report.active.iter() {
            let marker = if agent.always_active {
                "*".green()
            } else {
                "+".yellow()
            };
            output.push_str(&format!(
                "  {} {:<26} {}\n",
                marker,
                agent.id.bold(),
                agent.reason.to_string().dimmed()
            ));
        }

        if !report.inactive.is_empty() {
            output.push_str(&Self::section_header(&format!(
                "Inactive Agents ({})",
                report.inactive.len()
            )));
            for agent in &report.inactive {
                output.push_str(&format!(
                    "  {} {:<26} {}\n",
                    "-".dimmed(),
                    agent.id,
                    format!("needs {}", agent.rule).dimmed()
                ));
            }
        }

        output.push_str(&format!(
            "\n{}\n",
            format!("Registry version {}", report.active.registry_version()).dimmed()
        ));
        output
    }

    /// Format a review report
    pub fn format_review(report: &ReviewReport) -> String {
        let mut output = String::new();
        let outcome = &report.outcome;

        output.push_str(&Self::header("Review Gate"));
        output.push('\n');
        output.push_str(&format!(
            "{} {}\n{} {}\n",
            "Cycle:".cyan().bold(),
            outcome.cycle_id,
            "Project:".cyan().bold(),
            report.detection.root.display()
        ));

        output.push_str(&Self::section_header("Verdicts"));
        let mut verdicts: Vec<&AgentVerdict> = outcome.verdicts.iter().collect();
        verdicts.sort_by(|a, b| a.agent_id.cmp(&b.agent_id));
        for verdict in verdicts {
            output.push_str(&Self::verdict_line(verdict));
        }

        output.push_str(&Self::decision(&outcome.result));

        if let Some(metrics) = &report.metrics {
            output.push_str(&Self::metrics_note(metrics));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format agent statistics
    pub fn format_stats(report: &StatsReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Agent Statistics"));
        output.push('\n');

        if report.agents.iter().all(|s| s.reviews == 0) {
            output.push_str(&format!("{}\n", "No reviews recorded yet.".dimmed()));
        } else {
            output.push_str(&format!(
                "{:<28} {:>8} {:>9} {:>7} {:>9}\n",
                "Agent".bold(),
                "Reviews".bold(),
                "Approved".bold(),
                "Vetoed".bold(),
                "Veto rate".bold()
            ));
            for stats in &report.agents {
                output.push_str(&format!(
                    "{:<28} {:>8} {:>9} {:>7} {:>9}\n",
                    stats.agent_id,
                    stats.reviews,
                    stats.approvals,
                    stats.vetoes,
                    Self::percent(stats.veto_rate)
                ));
            }
        }

        if !report.top_veto_reasons.is_empty() {
            output.push_str(&Self::section_header("Top Veto Reasons"));
            for (rank, reason) in report.top_veto_reasons.iter().enumerate() {
                output.push_str(&format!(
                    "  {}. {} {}\n",
                    rank + 1,
                    reason.reason,
                    format!("({})", reason.count).dimmed()
                ));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format configuration issues, one per line
    pub fn format_issues(issues: &[ConfigIssue]) -> String {
        issues
            .iter()
            .map(|issue| {
                if issue.is_error() {
                    format!("{} {}", "error:".red().bold(), issue.message)
                } else {
                    format!("{} {}", "warning:".yellow().bold(), issue.message)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn signals(signals: &ProjectSignals) -> String {
        let languages = signals
            .languages_by_count()
            .into_iter()
            .take(TOP_LANGUAGES)
            .map(|(ext, count)| format!("{} ({})", ext, count))
            .collect::<Vec<_>>();

        let mut output = String::new();
        output.push_str(&format!(
            "{} {} files, {} contributor(s)\n",
            "Size:".cyan().bold(),
            signals.file_count(),
            signals.contributor_count()
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Languages:".cyan().bold(),
            Self::list_or_none(&languages)
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Frameworks:".cyan().bold(),
            Self::list_or_none(&signals.frameworks().iter().cloned().collect::<Vec<_>>())
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Patterns:".cyan().bold(),
            Self::list_or_none(&signals.patterns().iter().cloned().collect::<Vec<_>>())
        ));
        output
    }

    fn verdict_line(verdict: &AgentVerdict) -> String {
        let mut line = format!(
            "  {} {:<26} {}",
            Self::status_label(verdict.status),
            verdict.agent_id,
            verdict.reason
        );
        match verdict.origin {
            VerdictOrigin::Agent if verdict.is_veto() => {
                line.push_str(&format!(" {}", format!("[{}]", verdict.severity).dimmed()));
            }
            VerdictOrigin::Agent => {}
            VerdictOrigin::Timeout => line.push_str(&format!(" {}", "[no answer]".dimmed())),
            VerdictOrigin::AgentError => {
                line.push_str(&format!(" {}", "[validator failed]".dimmed()))
            }
        }
        line.push('\n');
        if let Some(evidence) = &verdict.evidence {
            line.push_str(&Self::indent(evidence, "      "));
            line.push('\n');
        }
        line
    }

    fn decision(result: &ConsensusResult) -> String {
        let label = match result.decision {
            ConsensusDecision::Approved => "APPROVED".green().bold(),
            ConsensusDecision::ApprovedWithOverride => "APPROVED (override)".yellow().bold(),
            ConsensusDecision::Blocked => "BLOCKED".red().bold(),
        };

        let mut output = format!(
            "\n{} {}  {}\n",
            "Decision:".cyan().bold(),
            label,
            result.summary().dimmed()
        );
        if result.overridden {
            output.push_str(&format!(
                "  {}\n",
                "A single veto was overridden; review it before merging.".yellow()
            ));
        } else if result.override_requested && result.is_blocked() {
            output.push_str(&format!(
                "  {}\n",
                "Override requested but not permitted for this cycle.".red()
            ));
        }
        output
    }

    fn metrics_note(metrics: &RecordReport) -> String {
        match &metrics.error {
            None => format!(
                "{}\n",
                format!("Recorded {} verdicts to metrics.", metrics.events_written).dimmed()
            ),
            Some(error) => format!(
                "{} {}\n",
                "Metrics not fully recorded:".yellow(),
                error
            ),
        }
    }

    fn status_label(status: VerdictStatus) -> ColoredString {
        match status {
            VerdictStatus::Approve => "APPROVE".green(),
            VerdictStatus::Veto => "VETO   ".red().bold(),
            VerdictStatus::Warn => "WARN   ".yellow(),
        }
    }

    fn percent(rate: Option<f64>) -> String {
        rate.map(|r| format!("{:.0}%", r * 100.0))
            .unwrap_or_else(|| "-".to_string())
    }

    fn list_or_none(items: &[String]) -> String {
        if items.is_empty() {
            "none".dimmed().to_string()
        } else {
            items.join(", ")
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ReportFormatter for ConsoleFormatter {
    fn detection(&self, report: &DetectionReport) -> String {
        Self::format_detection(report)
    }

    fn review(&self, report: &ReviewReport) -> String {
        Self::format_review(report)
    }

    fn stats(&self, report: &StatsReport) -> String {
        Self::format_stats(report)
    }
}
