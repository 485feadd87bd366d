//! Progress notification port
//!
//! Defines the interface for reporting progress during a review cycle.

use gate_domain::{AgentVerdict, ConsensusResult};

/// Callback for progress updates during a review cycle
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain logs, nothing).
pub trait CycleProgressNotifier: Send + Sync {
    /// Called once the active agents have been dispatched
    fn on_cycle_start(&self, cycle_id: &str, total_agents: usize);

    /// Called when a verdict is recorded (including synthesized ones)
    fn on_verdict(&self, verdict: &AgentVerdict);

    /// Called when the deadline fires with agents still pending
    fn on_timeout(&self, _pending: &[String]) {}

    /// Called after the decision is made
    fn on_cycle_complete(&self, result: &ConsensusResult);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl CycleProgressNotifier for NoProgress {
    fn on_cycle_start(&self, _cycle_id: &str, _total_agents: usize) {}
    fn on_verdict(&self, _verdict: &AgentVerdict) {}
    fn on_cycle_complete(&self, _result: &ConsensusResult) {}
}
