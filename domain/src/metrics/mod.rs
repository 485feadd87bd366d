//! Review metrics
//!
//! Each verdict becomes one immutable [`MetricsEvent`]. The
//! [`MetricsAggregate`] is a pure fold over those events, so it can always be
//! rebuilt by replaying the log.

use crate::quorum::{AgentVerdict, VerdictStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One verdict, as written to the append-only event log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsEvent {
    pub cycle_id: String,
    pub timestamp: DateTime<Utc>,
    pub agent_id: String,
    pub status: VerdictStatus,
    pub reason: String,
}

impl MetricsEvent {
    pub fn from_verdict(
        cycle_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        verdict: &AgentVerdict,
    ) -> Self {
        Self {
            cycle_id: cycle_id.into(),
            timestamp,
            agent_id: verdict.agent_id.clone(),
            status: verdict.status,
            reason: verdict.reason.clone(),
        }
    }
}

/// Raw per-agent counters
///
/// WARN verdicts count as a review but land in neither bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCounters {
    pub reviews: u64,
    pub approvals: u64,
    pub vetoes: u64,
}

impl AgentCounters {
    fn apply(&mut self, status: VerdictStatus) {
        self.reviews += 1;
        match status {
            VerdictStatus::Approve => self.approvals += 1,
            VerdictStatus::Veto => self.vetoes += 1,
            VerdictStatus::Warn => {}
        }
    }
}

/// Reported statistics for one agent
///
/// Rates are `None` until the agent has reviewed at least once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStats {
    pub agent_id: String,
    pub reviews: u64,
    pub approvals: u64,
    pub vetoes: u64,
    pub approval_rate: Option<f64>,
    pub veto_rate: Option<f64>,
}

impl AgentStats {
    fn from_counters(agent_id: &str, counters: AgentCounters) -> Self {
        let rate = |n: u64| (counters.reviews > 0).then(|| n as f64 / counters.reviews as f64);
        Self {
            agent_id: agent_id.to_string(),
            reviews: counters.reviews,
            approvals: counters.approvals,
            vetoes: counters.vetoes,
            approval_rate: rate(counters.approvals),
            veto_rate: rate(counters.vetoes),
        }
    }
}

/// A veto reason and how often it occurred
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasonCount {
    pub reason: String,
    pub count: u64,
}

/// Aggregate derived from the event log
///
/// `veto_reasons` keeps first-seen order so ties in
/// [`top_veto_reasons`](Self::top_veto_reasons) resolve deterministically.
/// `events_applied` is the length of the log prefix folded in so far; a
/// persisted aggregate catches up by applying the events after it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsAggregate {
    #[serde(default)]
    pub agents: BTreeMap<String, AgentCounters>,
    #[serde(default)]
    pub veto_reasons: Vec<ReasonCount>,
    #[serde(default)]
    pub events_applied: u64,
}

impl MetricsAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild an aggregate from scratch
    pub fn replay<'a>(events: impl IntoIterator<Item = &'a MetricsEvent>) -> Self {
        let mut aggregate = Self::new();
        for event in events {
            aggregate.apply(event);
        }
        aggregate
    }

    pub fn apply(&mut self, event: &MetricsEvent) {
        self.events_applied += 1;
        self.agents
            .entry(event.agent_id.clone())
            .or_default()
            .apply(event.status);

        if event.status == VerdictStatus::Veto {
            match self
                .veto_reasons
                .iter_mut()
                .find(|r| r.reason == event.reason)
            {
                Some(entry) => entry.count += 1,
                None => self.veto_reasons.push(ReasonCount {
                    reason: event.reason.clone(),
                    count: 1,
                }),
            }
        }
    }

    /// Statistics for one agent; an unseen agent reports zero reviews
    pub fn stats(&self, agent_id: &str) -> AgentStats {
        let counters = self.agents.get(agent_id).copied().unwrap_or_default();
        AgentStats::from_counters(agent_id, counters)
    }

    /// Statistics for every agent seen so far, sorted by id
    pub fn all_stats(&self) -> Vec<AgentStats> {
        self.agents
            .iter()
            .map(|(id, counters)| AgentStats::from_counters(id, *counters))
            .collect()
    }

    /// Most frequent veto reasons, count descending, ties in first-seen order
    pub fn top_veto_reasons(&self, limit: usize) -> Vec<ReasonCount> {
        let mut reasons = self.veto_reasons.clone();
        // sort_by is stable
        reasons.sort_by(|a, b| b.count.cmp(&a.count));
        reasons.truncate(limit);
        reasons
    }

    pub fn total_reviews(&self) -> u64 {
        self.agents.values().map(|c| c.reviews).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quorum::Severity;

    fn event(cycle: &str, verdict: &AgentVerdict) -> MetricsEvent {
        MetricsEvent::from_verdict(cycle, Utc::now(), verdict)
    }

    fn sample_events() -> Vec<MetricsEvent> {
        vec![
            event("c1", &AgentVerdict::approve("test-agent", "ok")),
            event("c1", &AgentVerdict::veto("security-agent", "hardcoded secret", Severity::Critical)),
            event("c1", &AgentVerdict::warn("doc-agent", "README stale")),
            event("c2", &AgentVerdict::timeout("test-agent")),
            event("c2", &AgentVerdict::veto("security-agent", "hardcoded secret", Severity::Critical)),
            event("c2", &AgentVerdict::approve("doc-agent", "ok")),
        ]
    }

    #[test]
    fn test_counters() {
        let aggregate = MetricsAggregate::replay(&sample_events());

        let security = aggregate.stats("security-agent");
        assert_eq!((security.reviews, security.approvals, security.vetoes), (2, 0, 2));
        assert_eq!(security.veto_rate, Some(1.0));

        let doc = aggregate.stats("doc-agent");
        assert_eq!((doc.reviews, doc.approvals, doc.vetoes), (2, 1, 0));
        assert_eq!(doc.approval_rate, Some(0.5));
    }

    #[test]
    fn test_unseen_agent_has_undefined_rates() {
        let stats = MetricsAggregate::new().stats("cost-agent");
        assert_eq!(stats.reviews, 0);
        assert_eq!(stats.approval_rate, None);
        assert_eq!(stats.veto_rate, None);
    }

    #[test]
    fn test_buckets_never_exceed_reviews() {
        let aggregate = MetricsAggregate::replay(&sample_events());
        for stats in aggregate.all_stats() {
            assert!(stats.approvals + stats.vetoes <= stats.reviews);
        }
        assert_eq!(aggregate.total_reviews(), 6);
        assert_eq!(aggregate.events_applied, 6);
    }

    #[test]
    fn test_top_veto_reasons_ties_keep_first_seen_order() {
        let events = vec![
            event("c1", &AgentVerdict::veto("a", "missing tests", Severity::High)),
            event("c1", &AgentVerdict::veto("b", "timeout", Severity::High)),
            event("c2", &AgentVerdict::veto("c", "sql injection", Severity::Critical)),
            event("c2", &AgentVerdict::veto("b", "timeout", Severity::High)),
            event("c3", &AgentVerdict::veto("a", "missing tests", Severity::High)),
        ];
        let aggregate = MetricsAggregate::replay(&events);

        let top = aggregate.top_veto_reasons(10);
        let reasons: Vec<_> = top.iter().map(|r| (r.reason.as_str(), r.count)).collect();
        assert_eq!(
            reasons,
            vec![("missing tests", 2), ("timeout", 2), ("sql injection", 1)]
        );
        assert_eq!(aggregate.top_veto_reasons(1).len(), 1);
    }

    #[test]
    fn test_replay_matches_incremental_apply() {
        let events = sample_events();
        let mut incremental = MetricsAggregate::new();
        events.iter().for_each(|e| incremental.apply(e));

        assert_eq!(MetricsAggregate::replay(&events), incremental);
    }

    #[test]
    fn test_aggregate_json_shape() {
        let aggregate = MetricsAggregate::replay(&sample_events());
        let json = serde_json::to_value(&aggregate).unwrap();
        assert_eq!(json["agents"]["security-agent"]["vetoes"], 2);
        assert_eq!(json["veto_reasons"][0]["reason"], "hardcoded secret");
        assert_eq!(json["events_applied"], 6);

        let restored: MetricsAggregate = serde_json::from_value(json).unwrap();
        assert_eq!(restored, aggregate);
    }

    #[test]
    fn test_aggregate_without_event_count_loads_as_zero() {
        let restored: MetricsAggregate =
            serde_json::from_str(r#"{"agents": {}, "veto_reasons": []}"#).unwrap();
        assert_eq!(restored.events_applied, 0);
    }
}
