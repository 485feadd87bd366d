//! Agent configuration from TOML (`[agents]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [agents]
//! active = ["security-agent", "test-agent"]
//!
//! [agents.commands]
//! security-agent = "python .claude/skills/security-agent/validate.py"
//!
//! [[agents.definitions]]
//! id = "i18n-agent"
//! name = "Internationalization Agent"
//! veto_severity = "medium"
//! rule = { pattern = "frontend" }
//! ```

use gate_domain::{
    ActivationRule, AgentDefinition, AgentRegistry, ConfigIssue, ConfigIssueCode,
    RuleEvaluationError, Severity,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Agent selection, validators, and registry extensions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentsConfig {
    /// Explicit agent list; bypasses activation rules when present
    pub active: Option<Vec<String>>,
    /// Validator command per agent id
    pub commands: BTreeMap<String, String>,
    /// Extra agent definitions appended to the built-in registry
    pub definitions: Vec<FileAgentDefinition>,
}

/// An agent definition supplied by configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAgentDefinition {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub always_active: bool,
    #[serde(default)]
    pub veto_severity: Severity,
    #[serde(default = "default_rule")]
    pub rule: ActivationRule,
}

fn default_rule() -> ActivationRule {
    ActivationRule::Always
}

impl FileAgentDefinition {
    pub fn to_definition(&self) -> AgentDefinition {
        if self.always_active {
            AgentDefinition::default_agent(
                &self.id,
                &self.name,
                &self.description,
                self.veto_severity,
            )
        } else {
            AgentDefinition::optional(
                &self.id,
                &self.name,
                &self.description,
                self.rule.clone(),
                self.veto_severity,
            )
        }
    }
}

impl FileAgentsConfig {
    /// Build the registry for this run
    ///
    /// Without extra definitions this is the built-in registry. Otherwise the
    /// built-in registry is extended, which bumps its version.
    pub fn build_registry(&self) -> Result<AgentRegistry, RuleEvaluationError> {
        let builtin = AgentRegistry::builtin();
        if self.definitions.is_empty() {
            return Ok(builtin);
        }
        builtin.extended(self.definitions.iter().map(FileAgentDefinition::to_definition))
    }

    pub(super) fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if let Some(active) = &self.active
            && active.is_empty()
        {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyActiveList,
                "agents.active is empty: remove it to use activation rules",
            ));
        }

        for def in &self.definitions {
            if def.id.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::UnnamedDefinition,
                    "agents.definitions: entry without an id",
                ));
            }
        }

        let builtin = AgentRegistry::builtin();
        for agent_id in self.commands.keys() {
            let known = builtin.contains(agent_id)
                || self.definitions.iter().any(|d| &d.id == agent_id);
            if !known {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::CommandForUnknownAgent,
                    format!("agents.commands: '{}' is not a registered agent", agent_id),
                ));
            }
        }

        issues
    }
}
