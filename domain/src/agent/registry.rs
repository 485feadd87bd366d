//! Agent registry
//!
//! An immutable, versioned collection of [`AgentDefinition`]s. It is built
//! once per run and handed to the evaluator explicitly; extending it produces
//! a new registry with a bumped version instead of mutating shared state.

use super::builtin::{BUILTIN_REGISTRY_VERSION, builtin_definitions};
use super::definition::AgentDefinition;
use crate::core::error::RuleEvaluationError;
use std::collections::HashMap;

/// Immutable registry of agent definitions
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    version: u32,
    definitions: Vec<AgentDefinition>,
    index: HashMap<String, usize>,
}

impl AgentRegistry {
    /// Build a registry, rejecting empty ids, duplicate ids, and malformed rules
    pub fn new(
        version: u32,
        definitions: Vec<AgentDefinition>,
    ) -> Result<Self, RuleEvaluationError> {
        let mut index = HashMap::with_capacity(definitions.len());

        for (position, def) in definitions.iter().enumerate() {
            if def.id.trim().is_empty() {
                return Err(RuleEvaluationError::EmptyAgentId);
            }
            if index.insert(def.id.clone(), position).is_some() {
                return Err(RuleEvaluationError::DuplicateAgent { id: def.id.clone() });
            }
            if !def.always_active {
                def.rule
                    .validate()
                    .map_err(|reason| RuleEvaluationError::MalformedRule {
                        agent_id: def.id.clone(),
                        reason,
                    })?;
            }
        }

        Ok(Self {
            version,
            definitions,
            index,
        })
    }

    /// The built-in registry of six default and fourteen optional agents
    pub fn builtin() -> Self {
        let definitions = builtin_definitions();
        let index = definitions
            .iter()
            .enumerate()
            .map(|(i, d)| (d.id.clone(), i))
            .collect();

        Self {
            version: BUILTIN_REGISTRY_VERSION,
            definitions,
            index,
        }
    }

    #[cfg(test)]
    pub(crate) fn unchecked(version: u32, definitions: Vec<AgentDefinition>) -> Self {
        let index = definitions
            .iter()
            .enumerate()
            .map(|(i, d)| (d.id.clone(), i))
            .collect();
        Self {
            version,
            definitions,
            index,
        }
    }

    /// Return a new registry with extra definitions appended
    ///
    /// The version is incremented. `self` is left untouched.
    pub fn extended(
        &self,
        extra: impl IntoIterator<Item = AgentDefinition>,
    ) -> Result<Self, RuleEvaluationError> {
        let mut definitions = self.definitions.clone();
        definitions.extend(extra);
        Self::new(self.version + 1, definitions)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn get(&self, id: &str) -> Option<&AgentDefinition> {
        self.index.get(id).map(|&i| &self.definitions[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Definitions in registration order
    pub fn iter(&self) -> impl Iterator<Item = &AgentDefinition> {
        self.definitions.iter()
    }

    pub fn defaults(&self) -> impl Iterator<Item = &AgentDefinition> {
        self.definitions.iter().filter(|d| d.always_active)
    }

    pub fn optional(&self) -> impl Iterator<Item = &AgentDefinition> {
        self.definitions.iter().filter(|d| !d.always_active)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::rule::ActivationRule;
    use crate::quorum::Severity;

    fn optional(id: &str, rule: ActivationRule) -> AgentDefinition {
        AgentDefinition::optional(id, "", "", rule, Severity::Low)
    }

    #[test]
    fn test_builtin_matches_validated_construction() {
        let builtin = AgentRegistry::builtin();
        let validated = AgentRegistry::new(BUILTIN_REGISTRY_VERSION, builtin_definitions());

        assert!(validated.is_ok());
        assert_eq!(builtin.len(), 20);
        assert_eq!(builtin.defaults().count(), 6);
        assert_eq!(builtin.optional().count(), 14);
        assert_eq!(builtin.version(), 1);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let defs = vec![
            optional("a-agent", ActivationRule::FilesOver(1)),
            optional("a-agent", ActivationRule::FilesOver(2)),
        ];
        assert_eq!(
            AgentRegistry::new(1, defs).unwrap_err(),
            RuleEvaluationError::DuplicateAgent {
                id: "a-agent".to_string()
            }
        );
    }

    #[test]
    fn test_empty_id_rejected() {
        let defs = vec![optional(" ", ActivationRule::Always)];
        assert_eq!(
            AgentRegistry::new(1, defs).unwrap_err(),
            RuleEvaluationError::EmptyAgentId
        );
    }

    #[test]
    fn test_malformed_rule_names_agent() {
        let defs = vec![optional("ml-agent", ActivationRule::AnyFramework(vec![]))];
        let err = AgentRegistry::new(1, defs).unwrap_err();
        assert_eq!(err.agent_id(), Some("ml-agent"));
    }

    #[test]
    fn test_extended_bumps_version_and_keeps_original() {
        let base = AgentRegistry::builtin();
        let extended = base
            .extended([optional("i18n-agent", ActivationRule::Pattern("frontend".into()))])
            .unwrap();

        assert_eq!(extended.version(), base.version() + 1);
        assert!(extended.contains("i18n-agent"));
        assert!(!base.contains("i18n-agent"));
    }

    #[test]
    fn test_extended_rejects_builtin_collision() {
        let base = AgentRegistry::builtin();
        let result = base.extended([optional("security-agent", ActivationRule::Always)]);
        assert!(matches!(
            result,
            Err(RuleEvaluationError::DuplicateAgent { .. })
        ));
    }

    #[test]
    fn test_get() {
        let registry = AgentRegistry::builtin();
        let def = registry.get("security-agent").unwrap();
        assert_eq!(def.veto_severity_default, Severity::Critical);
        assert!(registry.get("missing-agent").is_none());
    }
}
