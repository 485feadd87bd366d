//! Record Metrics use case
//!
//! Appends every verdict of a decided cycle to the metrics log and keeps the
//! aggregate counters current. Metrics failures are reported, never raised:
//! they must not change the consensus decision.

use crate::ports::metrics_store::{MetricsReadError, MetricsStore, MetricsWriteError};
use chrono::Utc;
use gate_domain::{
    AgentStats, AgentVerdict, ConsensusResult, MetricsAggregate, MetricsEvent, ReasonCount,
};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// What happened to the metrics of one cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordReport {
    pub events_written: usize,
    pub aggregate_persisted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RecordReport {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-agent review metrics backed by a [`MetricsStore`]
///
/// The aggregate lives behind a mutex so concurrent cycles in one process
/// apply their updates one at a time.
pub struct MetricsRecorder {
    store: Arc<dyn MetricsStore>,
    aggregate: Mutex<MetricsAggregate>,
}

impl MetricsRecorder {
    /// Open the recorder, loading (or rebuilding) the persisted aggregate
    pub fn open(store: Arc<dyn MetricsStore>) -> Result<Self, MetricsReadError> {
        let aggregate = store.load_aggregate()?;
        debug!(
            "Loaded metrics for {} agents ({} reviews)",
            aggregate.agents.len(),
            aggregate.total_reviews()
        );
        Ok(Self {
            store,
            aggregate: Mutex::new(aggregate),
        })
    }

    fn aggregate(&self) -> MutexGuard<'_, MetricsAggregate> {
        self.aggregate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the verdicts of a decided cycle
    ///
    /// The log is written first. If it cannot be written even after one
    /// retry, the counters are left untouched so they stay derivable from
    /// the log.
    pub fn record(
        &self,
        cycle_id: &str,
        verdicts: &[AgentVerdict],
        result: &ConsensusResult,
    ) -> RecordReport {
        let timestamp = Utc::now();
        let events: Vec<MetricsEvent> = verdicts
            .iter()
            .map(|v| MetricsEvent::from_verdict(cycle_id, timestamp, v))
            .collect();

        let mut aggregate = self.aggregate();

        if let Err(e) = retry_once("append events", || self.store.append_events(&events)) {
            warn!("Dropping metrics for cycle {}: {}", cycle_id, e);
            return RecordReport {
                error: Some(e.to_string()),
                ..RecordReport::default()
            };
        }

        for event in &events {
            aggregate.apply(event);
        }

        let persisted = retry_once("persist aggregate", || {
            self.store.persist_aggregate(&aggregate)
        });
        info!(
            "Recorded {} verdicts for cycle {} ({})",
            events.len(),
            cycle_id,
            result.decision
        );

        match persisted {
            Ok(()) => RecordReport {
                events_written: events.len(),
                aggregate_persisted: true,
                error: None,
            },
            Err(e) => {
                warn!("Metrics aggregate not persisted (rebuildable from log): {}", e);
                RecordReport {
                    events_written: events.len(),
                    aggregate_persisted: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    pub fn get_agent_stats(&self, agent_id: &str) -> AgentStats {
        self.aggregate().stats(agent_id)
    }

    pub fn all_stats(&self) -> Vec<AgentStats> {
        self.aggregate().all_stats()
    }

    pub fn top_veto_reasons(&self, limit: usize) -> Vec<ReasonCount> {
        self.aggregate().top_veto_reasons(limit)
    }

    /// Rebuild the aggregate by replaying the event log, then persist it
    pub fn rebuild(&self) -> Result<MetricsAggregate, MetricsReadError> {
        let events = self.store.read_events()?;
        let rebuilt = MetricsAggregate::replay(&events);
        info!("Rebuilt metrics aggregate from {} events", events.len());

        let mut aggregate = self.aggregate();
        *aggregate = rebuilt.clone();
        if let Err(e) = retry_once("persist aggregate", || {
            self.store.persist_aggregate(&aggregate)
        }) {
            warn!("Rebuilt aggregate not persisted: {}", e);
        }
        Ok(rebuilt)
    }
}

fn retry_once(
    operation: &str,
    mut op: impl FnMut() -> Result<(), MetricsWriteError>,
) -> Result<(), MetricsWriteError> {
    op().or_else(|e| {
        warn!("Metrics write failed ({}), retrying once: {}", operation, e);
        op()
    })
}
