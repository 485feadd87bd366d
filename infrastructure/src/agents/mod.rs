//! Review agent adapters
//!
//! - [`ScriptReviewAgent`]: runs a configured validator command
//! - [`RecordedVerdictAgent`]: replays a pre-computed verdict file

mod recorded;
mod script;

pub use recorded::{RecordedVerdictAgent, RecordedVerdicts, RecordedVerdictsError};
pub use script::{ScriptOutput, ScriptReviewAgent};

use gate_application::ports::review_agent::ReviewAgentRegistry;
use gate_domain::AgentRegistry;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Wire an adapter for every registered agent that has a verdict source
///
/// A configured command wins. With a verdicts file, every remaining agent
/// replays its recorded verdict (or waits for the deadline when it has
/// none). Agents left without an adapter are vetoed by the cycle.
pub fn build_review_agents(
    registry: &AgentRegistry,
    commands: &BTreeMap<String, String>,
    recorded: Option<&RecordedVerdicts>,
) -> ReviewAgentRegistry {
    let mut agents = ReviewAgentRegistry::new();

    for definition in registry.iter() {
        if let Some(command) = commands.get(&definition.id) {
            agents.register(Arc::new(
                ScriptReviewAgent::new(&definition.id, command)
                    .with_veto_severity(definition.veto_severity_default),
            ));
        }
    }

    if let Some(recorded) = recorded {
        let remaining = registry
            .iter()
            .map(|definition| definition.id.as_str())
            .filter(|id| !commands.contains_key(*id));
        for agent in recorded.agents(remaining) {
            agents.register(agent);
        }
    }

    debug!(
        "Wired {} of {} agents to a verdict source",
        agents.len(),
        registry.len()
    );
    agents
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_win_over_recorded_verdicts() {
        let registry = AgentRegistry::builtin();
        let commands = BTreeMap::from([(
            "test-agent".to_string(),
            "python validate.py".to_string(),
        )]);
        let recorded = RecordedVerdicts::parse(
            r#"[{"agent_id": "test-agent", "status": "APPROVE", "reason": "ok"}]"#,
        )
        .unwrap();

        let agents = build_review_agents(&registry, &commands, Some(&recorded));
        assert_eq!(agents.len(), registry.len());
        assert!(agents.contains("test-agent"));
    }

    #[test]
    fn test_only_commands_without_verdicts_file() {
        let registry = AgentRegistry::builtin();
        let commands = BTreeMap::from([("doc-agent".to_string(), "true".to_string())]);

        let agents = build_review_agents(&registry, &commands, None);
        assert_eq!(agents.ids().collect::<Vec<_>>(), vec!["doc-agent"]);
    }

    #[tokio::test]
    async fn test_recorded_verdicts_answer_for_agents_without_commands() {
        use gate_application::ReviewStandards;
        use gate_application::ports::review_agent::ReviewRequest;
        use gate_domain::{ProjectSignals, VerdictStatus};
        use std::path::PathBuf;

        let registry = AgentRegistry::builtin();
        let recorded = RecordedVerdicts::parse(
            r#"[{"agent_id": "security-agent", "status": "VETO", "reason": "hardcoded secret"}]"#,
        )
        .unwrap();

        let agents = build_review_agents(&registry, &BTreeMap::new(), Some(&recorded));
        let request = ReviewRequest {
            cycle_id: "c1".to_string(),
            root: PathBuf::from("."),
            signals: Arc::new(ProjectSignals::builder().build()),
            standards: ReviewStandards::default(),
        };

        let verdict = agents
            .get("security-agent")
            .unwrap()
            .validate(&request)
            .await
            .unwrap();
        assert_eq!(verdict.status, VerdictStatus::Veto);
        assert_eq!(verdict.reason, "hardcoded secret");
    }
}
