//! Progress reporting for review cycles

use colored::Colorize;
use gate_application::CycleProgressNotifier;
use gate_domain::{AgentVerdict, ConsensusResult, VerdictOrigin, VerdictStatus};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports cycle progress with a progress bar on stderr
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn cycle_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn verdict_mark(verdict: &AgentVerdict) -> String {
        match (verdict.status, verdict.origin) {
            (_, VerdictOrigin::Timeout) => format!("{} {} (timeout)", "x".red(), verdict.agent_id),
            (_, VerdictOrigin::AgentError) => {
                format!("{} {} (error)", "x".red(), verdict.agent_id)
            }
            (VerdictStatus::Approve, _) => format!("{} {}", "v".green(), verdict.agent_id),
            (VerdictStatus::Warn, _) => format!("{} {}", "!".yellow(), verdict.agent_id),
            (VerdictStatus::Veto, _) => format!("{} {}", "x".red(), verdict.agent_id),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleProgressNotifier for ProgressReporter {
    fn on_cycle_start(&self, cycle_id: &str, total_agents: usize) {
        let pb = ProgressBar::new(total_agents as u64);
        pb.set_style(Self::cycle_style());
        pb.set_prefix(format!("Cycle {}", cycle_id));
        pb.set_message("Waiting for verdicts...");

        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_verdict(&self, verdict: &AgentVerdict) {
        if let Ok(bar) = self.bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            pb.set_message(Self::verdict_mark(verdict));
            pb.inc(1);
        }
    }

    fn on_timeout(&self, pending: &[String]) {
        if let Ok(bar) = self.bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            pb.println(format!(
                "{} no answer from {}",
                "timeout:".yellow().bold(),
                pending.join(", ")
            ));
        }
    }

    fn on_cycle_complete(&self, result: &ConsensusResult) {
        if let Ok(mut bar) = self.bar.lock()
            && let Some(pb) = bar.take()
        {
            let message = if result.is_approved() {
                result.decision.to_string().green()
            } else {
                result.decision.to_string().red()
            };
            pb.finish_with_message(message.to_string());
        }
    }
}

/// Simple line-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl CycleProgressNotifier for SimpleProgress {
    fn on_cycle_start(&self, cycle_id: &str, total_agents: usize) {
        eprintln!(
            "{} {} ({} agents)",
            "->".cyan(),
            format!("Cycle {}", cycle_id).bold(),
            total_agents
        );
    }

    fn on_verdict(&self, verdict: &AgentVerdict) {
        eprintln!("  {}", ProgressReporter::verdict_mark(verdict));
    }

    fn on_timeout(&self, pending: &[String]) {
        eprintln!("  {} {}", "timeout:".yellow(), pending.join(", "));
    }

    fn on_cycle_complete(&self, result: &ConsensusResult) {
        eprintln!("  {} {}", result.decision, result.summary().dimmed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gate_domain::Severity;

    #[test]
    fn test_verdict_marks() {
        colored::control::set_override(false);

        assert_eq!(
            ProgressReporter::verdict_mark(&AgentVerdict::approve("test-agent", "ok")),
            "v test-agent"
        );
        assert_eq!(
            ProgressReporter::verdict_mark(&AgentVerdict::veto("doc-agent", "stale", Severity::Low)),
            "x doc-agent"
        );
        assert_eq!(
            ProgressReporter::verdict_mark(&AgentVerdict::timeout("cost-agent")),
            "x cost-agent (timeout)"
        );
        assert_eq!(
            ProgressReporter::verdict_mark(&AgentVerdict::agent_error("data-agent", "crashed")),
            "x data-agent (error)"
        );
    }

    #[test]
    fn test_reporter_tracks_cycle() {
        let reporter = ProgressReporter::new();
        reporter.on_cycle_start("c1", 2);
        reporter.on_verdict(&AgentVerdict::approve("test-agent", "ok"));

        let position = reporter
            .bar
            .lock()
            .unwrap()
            .as_ref()
            .map(|pb| pb.position());
        assert_eq!(position, Some(1));

        let result = gate_domain::decide(
            &[AgentVerdict::approve("test-agent", "ok")],
            &gate_domain::ConsensusPolicy::default(),
            false,
        );
        reporter.on_cycle_complete(&result);
        assert!(reporter.bar.lock().unwrap().is_none());
    }
}
