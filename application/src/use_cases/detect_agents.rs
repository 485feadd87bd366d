//! Detect Agents use case
//!
//! Scans a project and computes its active agent set.

use crate::ports::signal_scanner::{ScanError, SignalScanner};
use gate_domain::{
    ActiveAgentSet, AgentRegistry, ProjectSignals, RuleEvaluationError, evaluate, select_explicit,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that fail a detection run
///
/// No partial agent set is ever returned.
#[derive(Error, Debug)]
pub enum DetectError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Rules(#[from] RuleEvaluationError),
}

/// Input for the DetectAgents use case
#[derive(Debug, Clone)]
pub struct DetectAgentsInput {
    pub root: PathBuf,
    /// Explicit agent list; bypasses activation rules
    pub active_agents: Option<Vec<String>>,
}

impl DetectAgentsInput {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            active_agents: None,
        }
    }

    pub fn with_active_agents(mut self, agents: Option<Vec<String>>) -> Self {
        self.active_agents = agents;
        self
    }
}

/// An optional agent that did not activate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InactiveAgent {
    pub id: String,
    pub name: String,
    /// Human-readable activation rule
    pub rule: String,
}

/// Result of a detection run
#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
    pub root: PathBuf,
    pub signals: ProjectSignals,
    pub active: ActiveAgentSet,
    /// Registered agents left out, in registration order
    pub inactive: Vec<InactiveAgent>,
}

/// Use case for detecting the agents a project needs
pub struct DetectAgentsUseCase<S: SignalScanner + ?Sized> {
    scanner: Arc<S>,
    registry: Arc<AgentRegistry>,
}

impl<S: SignalScanner + ?Sized> DetectAgentsUseCase<S> {
    pub fn new(scanner: Arc<S>, registry: Arc<AgentRegistry>) -> Self {
        Self { scanner, registry }
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    pub fn execute(&self, input: DetectAgentsInput) -> Result<DetectionReport, DetectError> {
        info!("Scanning {}", input.root.display());
        let signals = self.scanner.scan(&input.root)?;
        debug!(
            "Scan found {} files, {} patterns, {} frameworks",
            signals.file_count(),
            signals.patterns().len(),
            signals.frameworks().len()
        );

        let active = match &input.active_agents {
            Some(ids) => {
                info!("Using explicit agent list ({} agents)", ids.len());
                select_explicit(ids, &self.registry)?
            }
            None => evaluate(&signals, &self.registry)?,
        };
        info!(
            "{} active agents (registry v{})",
            active.len(),
            active.registry_version()
        );

        let inactive = self
            .registry
            .iter()
            .filter(|def| !active.contains(&def.id))
            .map(|def| InactiveAgent {
                id: def.id.clone(),
                name: def.display_name(),
                rule: def.rule.description(),
            })
            .collect();

        Ok(DetectionReport {
            root: input.root,
            signals,
            active,
            inactive,
        })
    }
}
