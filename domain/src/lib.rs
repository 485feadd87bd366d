//! Domain layer for review-gate
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Signals and agents
//!
//! A scan of a project produces [`ProjectSignals`]. The [`AgentRegistry`]
//! holds every known [`AgentDefinition`]; [`evaluate`] turns signals into the
//! [`ActiveAgentSet`] for the project. Default agents are always active,
//! optional ones join when their [`ActivationRule`] matches.
//!
//! ## Consensus gate
//!
//! Every active agent returns one [`AgentVerdict`]. A [`ReviewCycle`]
//! collects them, synthesizes timeout vetoes at the deadline, and applies the
//! [`ConsensusPolicy`]: unanimous approval, or a single veto overridden on
//! request when enough agents approved.
//!
//! ## Metrics
//!
//! Each verdict becomes a [`MetricsEvent`]; [`MetricsAggregate`] is a fold
//! over those events and can always be rebuilt by replay.

pub mod agent;
pub mod config;
pub mod core;
pub mod metrics;
pub mod quorum;
pub mod signals;

// Re-export commonly used types
pub use agent::{
    ActivationReason, ActivationRule, ActiveAgent, ActiveAgentSet, AgentDefinition,
    AgentRegistry, evaluate, select_explicit,
};
pub use config::{ConfigIssue, ConfigIssueCode, IssueLevel, ReportFormat};
pub use core::error::{CycleError, RuleEvaluationError};
pub use metrics::{AgentCounters, AgentStats, MetricsAggregate, MetricsEvent, ReasonCount};
pub use quorum::{
    AgentVerdict, ConsensusDecision, ConsensusPolicy, ConsensusResult, CyclePhase, RecordOutcome,
    ReviewCycle, Severity, VerdictOrigin, VerdictStatus, decide,
};
pub use signals::{ProjectSignals, SignalsBuilder};
