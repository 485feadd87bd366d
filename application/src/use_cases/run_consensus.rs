//! Run Consensus use case
//!
//! Fans a review out to every active agent, waits for their verdicts up to
//! the deadline, and applies the consensus policy.

use crate::config::ReviewParams;
use crate::ports::progress::{CycleProgressNotifier, NoProgress};
use crate::ports::review_agent::{AgentError, ReviewAgentRegistry, ReviewRequest};
use crate::use_cases::detect_agents::DetectionReport;
use crate::use_cases::record_metrics::RecordReport;
use futures::FutureExt;
use gate_domain::{
    ActiveAgentSet, AgentVerdict, ConsensusResult, CycleError, ProjectSignals, RecordOutcome,
    ReviewCycle,
};
use serde::Serialize;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Errors that can occur while running a review cycle
#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Review cycle error: {0}")]
    Cycle(#[from] CycleError),
}

/// Input for the RunConsensus use case
#[derive(Debug, Clone)]
pub struct RunConsensusInput {
    pub cycle_id: String,
    pub root: PathBuf,
    pub signals: Arc<ProjectSignals>,
    pub active: ActiveAgentSet,
    pub override_requested: bool,
}

impl RunConsensusInput {
    pub fn new(
        cycle_id: impl Into<String>,
        root: impl Into<PathBuf>,
        signals: Arc<ProjectSignals>,
        active: ActiveAgentSet,
    ) -> Self {
        Self {
            cycle_id: cycle_id.into(),
            root: root.into(),
            signals,
            active,
            override_requested: false,
        }
    }

    /// Build the input from a detection report
    pub fn from_detection(cycle_id: impl Into<String>, report: &DetectionReport) -> Self {
        Self::new(
            cycle_id,
            report.root.clone(),
            Arc::new(report.signals.clone()),
            report.active.clone(),
        )
    }

    pub fn with_override(mut self, requested: bool) -> Self {
        self.override_requested = requested;
        self
    }
}

/// Verdicts and decision of one cycle
#[derive(Debug, Clone, Serialize)]
pub struct CycleOutcome {
    pub cycle_id: String,
    /// Every verdict, in the order it was recorded
    pub verdicts: Vec<AgentVerdict>,
    pub result: ConsensusResult,
}

/// Full report of a review run
#[derive(Debug, Clone, Serialize)]
pub struct ReviewReport {
    pub detection: DetectionReport,
    pub outcome: CycleOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<RecordReport>,
}

impl ReviewReport {
    pub fn new(detection: DetectionReport, outcome: CycleOutcome) -> Self {
        Self {
            detection,
            outcome,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: RecordReport) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

/// Use case for running one consensus cycle
pub struct RunConsensusUseCase {
    agents: ReviewAgentRegistry,
    params: ReviewParams,
}

impl RunConsensusUseCase {
    pub fn new(agents: ReviewAgentRegistry, params: ReviewParams) -> Self {
        Self { agents, params }
    }

    pub fn params(&self) -> &ReviewParams {
        &self.params
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunConsensusInput) -> Result<CycleOutcome, ReviewError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunConsensusInput,
        progress: &dyn CycleProgressNotifier,
    ) -> Result<CycleOutcome, ReviewError> {
        let mut cycle = ReviewCycle::new(input.cycle_id.clone(), input.active.ids());
        info!(
            "Starting review cycle {} with {} agents (timeout {}s)",
            input.cycle_id,
            input.active.len(),
            self.params.timeout.as_secs()
        );
        progress.on_cycle_start(&input.cycle_id, input.active.len());

        let request = Arc::new(ReviewRequest {
            cycle_id: input.cycle_id.clone(),
            root: input.root.clone(),
            signals: Arc::clone(&input.signals),
            standards: self.params.standards.clone(),
        });

        let mut join_set = JoinSet::new();
        let mut unassigned = Vec::new();

        for agent_id in input.active.ids() {
            let Some(agent) = self.agents.get(agent_id) else {
                unassigned.push(agent_id.to_string());
                continue;
            };
            let request = Arc::clone(&request);
            let agent_id = agent_id.to_string();

            join_set.spawn(async move {
                // A panicking validator must still yield a verdict for its agent
                let result = AssertUnwindSafe(agent.validate(&request))
                    .catch_unwind()
                    .await;
                (agent_id, result)
            });
        }

        for agent_id in unassigned {
            warn!("No validator configured for {}", agent_id);
            let verdict = AgentVerdict::agent_error(&agent_id, "no validator configured");
            Self::accept(&mut cycle, verdict, progress)?;
        }

        let deadline = tokio::time::sleep(self.params.timeout);
        tokio::pin!(deadline);

        while cycle.is_collecting() {
            tokio::select! {
                joined = join_set.join_next() => match joined {
                    Some(Ok((agent_id, result))) => {
                        let verdict = Self::into_verdict(&agent_id, result);
                        Self::accept(&mut cycle, verdict, progress)?;
                    }
                    Some(Err(e)) => warn!("Agent task join error: {}", e),
                    None => {
                        let pending: Vec<String> = cycle.pending().map(str::to_string).collect();
                        for agent_id in pending {
                            let verdict = AgentVerdict::agent_error(
                                &agent_id,
                                "validator task ended without a verdict",
                            );
                            Self::accept(&mut cycle, verdict, progress)?;
                        }
                    }
                },
                _ = &mut deadline => {
                    let pending: Vec<String> = cycle.pending().map(str::to_string).collect();
                    warn!(
                        "Review deadline reached; {} agents did not answer: {}",
                        pending.len(),
                        pending.join(", ")
                    );
                    progress.on_timeout(&pending);
                    for verdict in cycle.expire() {
                        progress.on_verdict(&verdict);
                    }
                }
            }
        }

        // Outstanding validators are cancelled; anything they would still
        // produce is discarded.
        join_set.abort_all();

        let result = cycle.decide(&self.params.policy(), input.override_requested)?;
        if result.overridden {
            warn!(
                "Veto from {} overridden with {} approvals",
                result
                    .vetoes
                    .first()
                    .map(|v| v.agent_id.as_str())
                    .unwrap_or("?"),
                result.approvals
            );
        }
        info!("Cycle {}: {}", input.cycle_id, result.summary());
        progress.on_cycle_complete(&result);

        Ok(CycleOutcome {
            cycle_id: input.cycle_id,
            verdicts: cycle.verdicts().to_vec(),
            result,
        })
    }

    fn accept(
        cycle: &mut ReviewCycle,
        verdict: AgentVerdict,
        progress: &dyn CycleProgressNotifier,
    ) -> Result<(), ReviewError> {
        match cycle.record(verdict.clone())? {
            RecordOutcome::Discarded => {
                debug!("Discarding late verdict from {}", verdict.agent_id);
            }
            RecordOutcome::Accepted | RecordOutcome::Completed => {
                debug!("{} -> {}", verdict.agent_id, verdict.status);
                progress.on_verdict(&verdict);
            }
        }
        Ok(())
    }

    /// Turn a validator's result into the verdict recorded for `agent_id`
    ///
    /// Errors, panics and verdicts for the wrong agent all become
    /// `agent error` vetoes.
    fn into_verdict(
        agent_id: &str,
        result: Result<Result<AgentVerdict, AgentError>, Box<dyn Any + Send>>,
    ) -> AgentVerdict {
        match result {
            Ok(Ok(verdict)) if verdict.agent_id == agent_id => verdict,
            Ok(Ok(verdict)) => {
                let error = AgentError::WrongAgent {
                    expected: agent_id.to_string(),
                    actual: verdict.agent_id,
                };
                warn!("{}", error);
                AgentVerdict::agent_error(agent_id, error.to_string())
            }
            Ok(Err(e)) => {
                warn!("Agent {} failed: {}", agent_id, e);
                AgentVerdict::agent_error(agent_id, e.to_string())
            }
            Err(panic) => {
                let detail = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "validator panicked".to_string());
                warn!("Agent {} panicked: {}", agent_id, detail);
                AgentVerdict::agent_error(agent_id, detail)
            }
        }
    }
}
