//! Review agent port
//!
//! Each active agent validates a change independently and answers with one
//! [`AgentVerdict`]. Adapters (external scripts, recorded verdicts, test
//! doubles) implement [`ReviewAgent`] and are held in a
//! [`ReviewAgentRegistry`] keyed by agent id.

use crate::config::ReviewStandards;
use async_trait::async_trait;
use gate_domain::{AgentVerdict, ProjectSignals};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors from an agent's own validation step
///
/// The consensus use case turns any of these into an `agent error` veto.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Failed to start validator: {0}")]
    Spawn(String),

    #[error("Validator exited with {status}: {stderr}")]
    CommandFailed { status: String, stderr: String },

    #[error("Invalid validator output: {0}")]
    InvalidOutput(String),

    #[error("Verdict is for agent '{actual}', expected '{expected}'")]
    WrongAgent { expected: String, actual: String },

    #[error("{0}")]
    Other(String),
}

/// What an agent is asked to review
///
/// Shared read-only between all agents of a cycle.
#[derive(Debug, Clone)]
pub struct ReviewRequest {
    pub cycle_id: String,
    pub root: PathBuf,
    pub signals: Arc<ProjectSignals>,
    pub standards: ReviewStandards,
}

/// A single review agent
#[async_trait]
pub trait ReviewAgent: Send + Sync {
    /// Registry id this adapter answers for
    fn agent_id(&self) -> &str;

    /// Validate the change and return exactly one verdict
    ///
    /// Must not depend on any other agent's verdict.
    async fn validate(&self, request: &ReviewRequest) -> Result<AgentVerdict, AgentError>;
}

/// Typed registry of agent adapters keyed by agent id
#[derive(Clone, Default)]
pub struct ReviewAgentRegistry {
    agents: BTreeMap<String, Arc<dyn ReviewAgent>>,
}

impl ReviewAgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter, replacing any previous one for the same id
    pub fn register(&mut self, agent: Arc<dyn ReviewAgent>) {
        self.agents.insert(agent.agent_id().to_string(), agent);
    }

    pub fn with(mut self, agent: Arc<dyn ReviewAgent>) -> Self {
        self.register(agent);
        self
    }

    pub fn get(&self, agent_id: &str) -> Option<Arc<dyn ReviewAgent>> {
        self.agents.get(agent_id).cloned()
    }

    pub fn contains(&self, agent_id: &str) -> bool {
        self.agents.contains_key(agent_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.agents.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl std::fmt::Debug for ReviewAgentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewAgentRegistry")
            .field("agents", &self.agents.keys().collect::<Vec<_>>())
            .finish()
    }
}
