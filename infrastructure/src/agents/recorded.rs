//! Pre-computed verdicts.
//!
//! A verdicts file is a JSON array of verdict objects:
//!
//! ```json
//! [
//!   { "agent_id": "test-agent", "status": "APPROVE", "reason": "coverage 91%" },
//!   { "agent_id": "security-agent", "status": "VETO", "reason": "hardcoded secret",
//!     "severity": "critical", "evidence": "src/config.rs:12" }
//! ]
//! ```
//!
//! An active agent with no entry never answers, so the cycle's deadline turns
//! it into a timeout veto.

use async_trait::async_trait;
use gate_application::ports::review_agent::{AgentError, ReviewAgent, ReviewRequest};
use gate_domain::{AgentVerdict, VerdictOrigin};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors loading a verdicts file
#[derive(Error, Debug)]
pub enum RecordedVerdictsError {
    #[error("Cannot read verdicts file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid verdicts file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Verdicts file lists agent '{0}' more than once")]
    Duplicate(String),
}

/// Verdicts loaded from a file, keyed by agent id
#[derive(Debug, Clone, Default)]
pub struct RecordedVerdicts {
    verdicts: BTreeMap<String, AgentVerdict>,
}

impl RecordedVerdicts {
    pub fn load(path: &Path) -> Result<Self, RecordedVerdictsError> {
        let content = std::fs::read_to_string(path).map_err(|source| RecordedVerdictsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|e| match e {
            RecordedVerdictsError::Parse { source, .. } => RecordedVerdictsError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn parse(json: &str) -> Result<Self, RecordedVerdictsError> {
        let list: Vec<AgentVerdict> =
            serde_json::from_str(json).map_err(|source| RecordedVerdictsError::Parse {
                path: PathBuf::new(),
                source,
            })?;

        let mut verdicts = BTreeMap::new();
        for verdict in list {
            let id = verdict.agent_id.clone();
            if verdicts.insert(id.clone(), verdict).is_some() {
                return Err(RecordedVerdictsError::Duplicate(id));
            }
        }
        Ok(Self { verdicts })
    }

    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    pub fn get(&self, agent_id: &str) -> Option<&AgentVerdict> {
        self.verdicts.get(agent_id)
    }

    /// One adapter per agent id, answering with its recorded verdict if any
    pub fn agents<'a>(
        &self,
        agent_ids: impl IntoIterator<Item = &'a str>,
    ) -> Vec<Arc<dyn ReviewAgent>> {
        agent_ids
            .into_iter()
            .map(|id| {
                Arc::new(RecordedVerdictAgent::new(id, self.get(id).cloned()))
                    as Arc<dyn ReviewAgent>
            })
            .collect()
    }
}

/// Review agent that replays a recorded verdict
#[derive(Debug, Clone)]
pub struct RecordedVerdictAgent {
    agent_id: String,
    verdict: Option<AgentVerdict>,
}

impl RecordedVerdictAgent {
    pub fn new(agent_id: impl Into<String>, verdict: Option<AgentVerdict>) -> Self {
        Self {
            agent_id: agent_id.into(),
            verdict,
        }
    }
}

#[async_trait]
impl ReviewAgent for RecordedVerdictAgent {
    fn agent_id(&self) -> &str {
        &self.agent_id
    }

    async fn validate(&self, _request: &ReviewRequest) -> Result<AgentVerdict, AgentError> {
        match &self.verdict {
            Some(verdict) => Ok(AgentVerdict {
                // Only the cycle may synthesize timeouts and agent errors
                origin: VerdictOrigin::Agent,
                ..verdict.clone()
            }),
            None => {
                debug!("{}: no recorded verdict, waiting for deadline", self.agent_id);
                std::future::pending().await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gate_application::config::ReviewStandards;
    use gate_domain::{ProjectSignals, Severity, VerdictStatus};
    use std::time::Duration;

    const FILE: &str = r#"[
        {"agent_id": "test-agent", "status": "APPROVE", "reason": "coverage 91%"},
        {"agent_id": "security-agent", "status": "VETO", "reason": "hardcoded secret",
         "severity": "critical", "evidence": "src/config.rs:12", "origin": "timeout"}
    ]"#;

    fn request() -> ReviewRequest {
        ReviewRequest {
            cycle_id: "c1".to_string(),
            root: PathBuf::from("."),
            signals: Arc::new(ProjectSignals::builder().build()),
            standards: ReviewStandards::default(),
        }
    }

    #[test]
    fn test_parse() {
        let recorded = RecordedVerdicts::parse(FILE).unwrap();
        assert_eq!(recorded.len(), 2);

        let veto = recorded.get("security-agent").unwrap();
        assert_eq!(veto.status, VerdictStatus::Veto);
        assert_eq!(veto.severity, Severity::Critical);
    }

    #[test]
    fn test_duplicate_agent_is_rejected() {
        let json = r#"[
            {"agent_id": "test-agent", "status": "APPROVE", "reason": "ok"},
            {"agent_id": "test-agent", "status": "VETO", "reason": "no"}
        ]"#;
        assert!(matches!(
            RecordedVerdicts::parse(json),
            Err(RecordedVerdictsError::Duplicate(id)) if id == "test-agent"
        ));
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("verdicts.json");
        std::fs::write(&path, "{ not a list").unwrap();

        let err = RecordedVerdicts::load(&path).unwrap_err();
        assert!(err.to_string().contains("verdicts.json"));
        assert!(matches!(
            RecordedVerdicts::load(&dir.path().join("missing.json")),
            Err(RecordedVerdictsError::Read { .. })
        ));
    }

    #[tokio::test]
    async fn test_replays_recorded_verdict_as_agent_origin() {
        let recorded = RecordedVerdicts::parse(FILE).unwrap();
        let agents = recorded.agents(["security-agent"]);

        let verdict = agents[0].validate(&request()).await.unwrap();
        assert_eq!(verdict.reason, "hardcoded secret");
        assert_eq!(verdict.origin, VerdictOrigin::Agent);
    }

    #[tokio::test]
    async fn test_missing_entry_never_answers() {
        let recorded = RecordedVerdicts::parse(FILE).unwrap();
        let agents = recorded.agents(["doc-agent"]);

        let answered =
            tokio::time::timeout(Duration::from_millis(50), agents[0].validate(&request())).await;
        assert!(answered.is_err());
    }
}
