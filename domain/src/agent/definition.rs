//! Agent definitions

use super::rule::ActivationRule;
use crate::core::string::display_name;
use crate::quorum::Severity;
use serde::{Deserialize, Serialize};

/// Static descriptor of a review agent
///
/// Default agents have `always_active = true` and their rule is ignored.
/// Optional agents join the active set when their rule matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDefinition {
    /// Unique identifier (e.g., "security-agent")
    pub id: String,
    /// Display name (e.g., "Security Agent")
    pub name: String,
    /// What the agent reviews; used as the activation reason for optional agents
    pub description: String,
    pub always_active: bool,
    pub rule: ActivationRule,
    pub veto_severity_default: Severity,
}

impl AgentDefinition {
    /// Create a default agent, active for every project
    pub fn default_agent(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        veto_severity_default: Severity,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            always_active: true,
            rule: ActivationRule::Always,
            veto_severity_default,
        }
    }

    /// Create an optional agent gated by an activation rule
    pub fn optional(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        rule: ActivationRule,
        veto_severity_default: Severity,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            always_active: false,
            rule,
            veto_severity_default,
        }
    }

    /// Display name, derived from the id when none was given
    pub fn display_name(&self) -> String {
        if self.name.trim().is_empty() {
            display_name(&self.id)
        } else {
            self.name.clone()
        }
    }
}
