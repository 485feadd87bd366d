//! Domain error types

use thiserror::Error;

/// Errors raised while building a registry or selecting the active agent set
///
/// Every variant names the offending agent definition. A broken definition is
/// never dropped silently; the whole evaluation fails instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleEvaluationError {
    #[error("Agent definition has an empty id")]
    EmptyAgentId,

    #[error("Duplicate agent id in registry: {id}")]
    DuplicateAgent { id: String },

    #[error("Malformed activation rule for agent '{agent_id}': {reason}")]
    MalformedRule { agent_id: String, reason: String },

    #[error("Unknown agent in explicit active list: {id}")]
    UnknownAgent { id: String },

    #[error("Explicit active agent list is empty")]
    EmptyActiveList,
}

impl RuleEvaluationError {
    /// The agent id this error refers to, if any
    pub fn agent_id(&self) -> Option<&str> {
        match self {
            RuleEvaluationError::DuplicateAgent { id } | RuleEvaluationError::UnknownAgent { id } => {
                Some(id)
            }
            RuleEvaluationError::MalformedRule { agent_id, .. } => Some(agent_id),
            RuleEvaluationError::EmptyAgentId | RuleEvaluationError::EmptyActiveList => None,
        }
    }
}

/// Errors raised by the review cycle state machine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CycleError {
    #[error("Verdict from agent '{0}' which is not active in this cycle")]
    UnknownAgent(String),

    #[error("Agent '{0}' already submitted a verdict in this cycle")]
    DuplicateVerdict(String),

    #[error("Cycle is still collecting verdicts ({pending} pending)")]
    StillCollecting { pending: usize },

    #[error("Cycle has already been decided")]
    AlreadyDecided,
}
