//! Agent rule evaluation
//!
//! Turns a [`ProjectSignals`] snapshot and an [`AgentRegistry`] into the
//! active agent set. Evaluation is a pure function of its inputs.

use super::definition::AgentDefinition;
use super::registry::AgentRegistry;
use crate::core::error::RuleEvaluationError;
use crate::quorum::Severity;
use crate::signals::ProjectSignals;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Why an agent is active
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum ActivationReason {
    /// A default agent, enabled for every codebase
    Default,
    /// An optional agent whose rule matched
    Matched(String),
    /// Listed in the explicit `active_agents` override
    Explicit,
}

impl std::fmt::Display for ActivationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivationReason::Default => write!(f, "Default agent (enabled for all codebases)"),
            ActivationReason::Matched(detail) => write!(f, "{}", detail),
            ActivationReason::Explicit => write!(f, "Listed in active_agents override"),
        }
    }
}

/// A member of the active agent set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveAgent {
    pub id: String,
    pub name: String,
    pub always_active: bool,
    pub reason: ActivationReason,
    pub veto_severity: Severity,
}

impl ActiveAgent {
    fn from_definition(def: &AgentDefinition, reason: ActivationReason) -> Self {
        Self {
            id: def.id.clone(),
            name: def.display_name(),
            always_active: def.always_active,
            reason,
            veto_severity: def.veto_severity_default,
        }
    }
}

/// The agents applicable to a project
///
/// Iteration is ordered lexicographically by agent id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveAgentSet {
    registry_version: u32,
    explicit: bool,
    agents: BTreeMap<String, ActiveAgent>,
}

impl ActiveAgentSet {
    pub fn registry_version(&self) -> u32 {
        self.registry_version
    }

    /// Whether the set came from an explicit override list
    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.agents.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&ActiveAgent> {
        self.agents.get(id)
    }

    /// Agent ids in lexicographic order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.agents.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveAgent> {
        self.agents.values()
    }
}

/// Compute the active agent set for a project
///
/// Default agents are always included. Each optional agent is included when
/// its activation rule matches; inclusion is binary and duplicate matches are
/// idempotent.
///
/// # Example
///
/// ```
/// use gate_domain::agent::{AgentRegistry, evaluate};
/// use gate_domain::signals::ProjectSignals;
///
/// let signals = ProjectSignals::builder().file_count(120).pattern("api").build();
/// let active = evaluate(&signals, &AgentRegistry::builtin()).unwrap();
///
/// assert_eq!(active.len(), 8);
/// assert!(active.contains("performance-agent"));
/// assert!(active.contains("refactor-agent"));
/// ```
pub fn evaluate(
    signals: &ProjectSignals,
    registry: &AgentRegistry,
) -> Result<ActiveAgentSet, RuleEvaluationError> {
    let mut agents = BTreeMap::new();

    for def in registry.iter() {
        if def.always_active {
            agents.insert(
                def.id.clone(),
                ActiveAgent::from_definition(def, ActivationReason::Default),
            );
            continue;
        }

        let explanation =
            def.rule
                .explain(signals)
                .map_err(|reason| RuleEvaluationError::MalformedRule {
                    agent_id: def.id.clone(),
                    reason,
                })?;

        if let Some(detail) = explanation {
            let reason = ActivationReason::Matched(format!("{} ({})", def.description, detail));
            agents.insert(def.id.clone(), ActiveAgent::from_definition(def, reason));
        }
    }

    Ok(ActiveAgentSet {
        registry_version: registry.version(),
        explicit: false,
        agents,
    })
}

/// Build the active set from an explicit list, bypassing predicates
///
/// Every id must exist in the registry; duplicates collapse.
pub fn select_explicit<S: AsRef<str>>(
    ids: &[S],
    registry: &AgentRegistry,
) -> Result<ActiveAgentSet, RuleEvaluationError> {
    if ids.is_empty() {
        return Err(RuleEvaluationError::EmptyActiveList);
    }

    let mut agents = BTreeMap::new();
    for id in ids {
        let id = id.as_ref();
        let def = registry
            .get(id)
            .ok_or_else(|| RuleEvaluationError::UnknownAgent { id: id.to_string() })?;
        agents.insert(
            def.id.clone(),
            ActiveAgent::from_definition(def, ActivationReason::Explicit),
        );
    }

    Ok(ActiveAgentSet {
        registry_version: registry.version(),
        explicit: true,
        agents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::builtin::DEFAULT_AGENT_IDS;
    use crate::agent::rule::ActivationRule;
    use crate::signals::patterns;

    #[test]
    fn test_defaults_only_for_empty_project() {
        let signals = ProjectSignals::builder().build();
        let active = evaluate(&signals, &AgentRegistry::builtin()).unwrap();

        assert_eq!(active.len(), 6);
        for id in DEFAULT_AGENT_IDS {
            assert!(active.contains(id));
            assert_eq!(active.get(id).unwrap().reason, ActivationReason::Default);
        }
    }

    #[test]
    fn test_api_project_with_120_files() {
        let signals = ProjectSignals::builder()
            .file_count(120)
            .pattern(patterns::API)
            .build();
        let active = evaluate(&signals, &AgentRegistry::builtin()).unwrap();

        let ids: Vec<_> = active.ids().collect();
        assert_eq!(
            ids,
            vec![
                "data-agent",
                "doc-agent",
                "infra-agent",
                "logic-agent",
                "performance-agent",
                "refactor-agent",
                "security-agent",
                "test-agent",
            ]
        );
        match &active.get("refactor-agent").unwrap().reason {
            ActivationReason::Matched(detail) => assert!(detail.contains("120 files")),
            other => panic!("unexpected reason: {other:?}"),
        }
    }

    #[test]
    fn test_team_and_ml_predicates() {
        let signals = ProjectSignals::builder()
            .contributor_count(3)
            .framework("PyTorch")
            .build();
        let active = evaluate(&signals, &AgentRegistry::builtin()).unwrap();

        assert!(active.contains("devex-agent"));
        assert!(active.contains("research-agent"));
        assert_eq!(active.len(), 8);
    }

    #[test]
    fn test_determinism() {
        let signals = ProjectSignals::builder()
            .file_count(75)
            .pattern(patterns::FRONTEND)
            .pattern(patterns::CI)
            .framework("react")
            .contributor_count(5)
            .build();
        let registry = AgentRegistry::builtin();

        let first = evaluate(&signals, &registry).unwrap();
        for _ in 0..10 {
            assert_eq!(evaluate(&signals, &registry).unwrap(), first);
        }
    }

    #[test]
    fn test_malformed_rule_fails_whole_evaluation() {
        // Bypass registry validation to model a rule that breaks at evaluation time
        let broken = AgentDefinition::optional(
            "broken-agent",
            "",
            "",
            ActivationRule::AnyOf(vec![]),
            Severity::Low,
        );
        let definitions = AgentRegistry::builtin().iter().cloned().chain([broken]).collect();
        let registry = AgentRegistry::unchecked(1, definitions);

        let err = evaluate(&ProjectSignals::builder().build(), &registry).unwrap_err();
        assert_eq!(err.agent_id(), Some("broken-agent"));
    }

    #[test]
    fn test_explicit_list_bypasses_predicates() {
        let registry = AgentRegistry::builtin();
        let active =
            select_explicit(&["security-agent", "cost-agent", "security-agent"], &registry)
                .unwrap();

        assert!(active.is_explicit());
        assert_eq!(active.ids().collect::<Vec<_>>(), vec!["cost-agent", "security-agent"]);
        assert_eq!(
            active.get("cost-agent").unwrap().reason,
            ActivationReason::Explicit
        );
    }

    #[test]
    fn test_explicit_list_unknown_agent() {
        let registry = AgentRegistry::builtin();
        assert_eq!(
            select_explicit(&["nonexistent-agent"], &registry).unwrap_err(),
            RuleEvaluationError::UnknownAgent {
                id: "nonexistent-agent".to_string()
            }
        );
        assert_eq!(
            select_explicit::<&str>(&[], &registry).unwrap_err(),
            RuleEvaluationError::EmptyActiveList
        );
    }
}
