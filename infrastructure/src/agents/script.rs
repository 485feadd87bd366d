//! Validator command adapter.
//!
//! Runs `sh -c <command>` in the project root and reads one JSON verdict
//! from stdout:
//!
//! ```json
//! { "status": "VETO", "errors": ["..."], "warnings": [], "severity": "high" }
//! ```
//!
//! Validators conventionally exit non-zero on a veto, so the exit status is
//! only consulted when stdout is not a verdict.

use async_trait::async_trait;
use gate_application::ports::review_agent::{AgentError, ReviewAgent, ReviewRequest};
use gate_domain::core::string::truncate;
use gate_domain::{AgentVerdict, Severity, VerdictStatus};
use serde::Deserialize;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Longest stderr excerpt carried in a [`AgentError::CommandFailed`]
const MAX_STDERR_BYTES: usize = 2000;

/// Verdict JSON as written by a validator script
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptOutput {
    pub status: String,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub evidence: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    /// Agent id, when the script reports one
    #[serde(default)]
    pub agent: Option<String>,
}

impl ScriptOutput {
    /// Convert to a verdict for `agent_id`
    ///
    /// Without an explicit reason, the first error (veto) or first warning
    /// (warn) becomes the reason and the rest becomes evidence.
    pub fn into_verdict(
        self,
        agent_id: &str,
        veto_severity: Severity,
    ) -> Result<AgentVerdict, AgentError> {
        if let Some(actual) = self.agent.filter(|a| a != agent_id) {
            return Err(AgentError::WrongAgent {
                expected: agent_id.to_string(),
                actual,
            });
        }

        let status: VerdictStatus = self.status.parse().map_err(AgentError::InvalidOutput)?;
        let severity: Severity = match self.severity.as_deref() {
            Some(s) => s.parse().map_err(AgentError::InvalidOutput)?,
            None => match status {
                VerdictStatus::Veto => veto_severity,
                VerdictStatus::Warn => Severity::Medium,
                VerdictStatus::Approve => Severity::Low,
            },
        };

        let findings = match status {
            VerdictStatus::Veto => self.errors,
            VerdictStatus::Warn => self.warnings,
            VerdictStatus::Approve => Vec::new(),
        };
        let reason = self
            .reason
            .or_else(|| findings.first().cloned())
            .unwrap_or_else(|| match status {
                VerdictStatus::Approve => "all checks passed".to_string(),
                VerdictStatus::Veto => "validation failed".to_string(),
                VerdictStatus::Warn => "validation passed with warnings".to_string(),
            });
        let evidence = self
            .evidence
            .or_else(|| (findings.len() > 1).then(|| findings[1..].join("; ")));

        let mut verdict = AgentVerdict::new(agent_id, status, reason, severity);
        verdict.evidence = evidence;
        Ok(verdict)
    }
}

/// Review agent backed by an external validator command
#[derive(Debug, Clone)]
pub struct ScriptReviewAgent {
    agent_id: String,
    command: String,
    veto_severity: Severity,
}

impl ScriptReviewAgent {
    pub fn new(agent_id: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            command: command.into(),
            veto_severity: Severity::default(),
        }
    }

    /// Severity for vetoes that do not state one
    pub fn with_veto_severity(mut self, severity: Severity) -> Self {
        self.veto_severity = severity;
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    fn build_command(&self, request: &ReviewRequest) -> Command {
        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", self.command.as_str()]);
            c
        } else {
            let mut c = Command::new("sh");
            c.args(["-c", self.command.as_str()]);
            c
        };

        let standards = &request.standards;
        cmd.current_dir(&request.root)
            .env("REVIEW_GATE_AGENT_ID", &self.agent_id)
            .env("REVIEW_GATE_CYCLE_ID", &request.cycle_id)
            .env("REVIEW_GATE_ROOT", &request.root)
            .env(
                "REVIEW_GATE_TEST_COVERAGE_MINIMUM",
                standards.test_coverage_minimum.to_string(),
            )
            .env("REVIEW_GATE_MAX_COMPLEXITY", standards.max_complexity.to_string())
            .env("REVIEW_GATE_MAX_PR_LINES", standards.max_pr_lines.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Cancelled cycles must not leave validators running
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl ReviewAgent for ScriptReviewAgent {
    fn agent_id(&self) -> &str {
        &self.agent_id
    }

    async fn validate(&self, request: &ReviewRequest) -> Result<AgentVerdict, AgentError> {
        debug!("{}: running `{}`", self.agent_id, self.command);

        let output = self
            .build_command(request)
            .output()
            .await
            .map_err(|e| AgentError::Spawn(format!("{}: {}", self.command, e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        match serde_json::from_str::<ScriptOutput>(stdout.trim()) {
            Ok(parsed) => parsed.into_verdict(&self.agent_id, self.veto_severity),
            Err(_) if !output.status.success() => Err(AgentError::CommandFailed {
                status: output.status.to_string(),
                stderr: truncate(String::from_utf8_lossy(&output.stderr).trim(), MAX_STDERR_BYTES),
            }),
            Err(e) => Err(AgentError::InvalidOutput(format!(
                "expected a JSON verdict on stdout: {}",
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gate_application::config::ReviewStandards;
    use gate_domain::ProjectSignals;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn request(dir: &TempDir) -> ReviewRequest {
        ReviewRequest {
            cycle_id: "cycle-1".to_string(),
            root: dir.path().to_path_buf(),
            signals: Arc::new(ProjectSignals::builder().build()),
            standards: ReviewStandards::default(),
        }
    }

    fn output(json: &str) -> ScriptOutput {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_veto_uses_first_error_as_reason() {
        let verdict = output(
            r#"{"status": "VETO", "errors": ["hardcoded secret", "weak hash"], "warnings": []}"#,
        )
        .into_verdict("security-agent", Severity::Critical)
        .unwrap();

        assert_eq!(verdict.status, VerdictStatus::Veto);
        assert_eq!(verdict.reason, "hardcoded secret");
        assert_eq!(verdict.evidence.as_deref(), Some("weak hash"));
        assert_eq!(verdict.severity, Severity::Critical);
    }

    #[test]
    fn test_explicit_fields_win() {
        let verdict = output(
            r#"{"status": "warn", "warnings": ["w"], "reason": "README stale", "severity": "low"}"#,
        )
        .into_verdict("doc-agent", Severity::High)
        .unwrap();

        assert_eq!(verdict.status, VerdictStatus::Warn);
        assert_eq!(verdict.reason, "README stale");
        assert_eq!(verdict.severity, Severity::Low);
    }

    #[test]
    fn test_approve_without_findings() {
        let verdict = output(r#"{"status": "APPROVE", "errors": [], "warnings": []}"#)
            .into_verdict("test-agent", Severity::High)
            .unwrap();
        assert_eq!(verdict.reason, "all checks passed");
        assert_eq!(verdict.evidence, None);
    }

    #[test]
    fn test_unknown_status_is_invalid() {
        let err = output(r#"{"status": "MAYBE"}"#)
            .into_verdict("test-agent", Severity::High)
            .unwrap_err();
        assert!(matches!(err, AgentError::InvalidOutput(_)));
    }

    #[test]
    fn test_foreign_agent_is_rejected() {
        let err = output(r#"{"status": "APPROVE", "agent": "doc-agent"}"#)
            .into_verdict("test-agent", Severity::High)
            .unwrap_err();
        assert!(matches!(err, AgentError::WrongAgent { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_runs_command_in_project_root() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("marker"), "").unwrap();
        let agent = ScriptReviewAgent::new(
            "test-agent",
            r#"test -f marker && echo '{"status":"APPROVE","errors":[],"warnings":[]}'"#,
        );

        let verdict = agent.validate(&request(&dir)).await.unwrap();
        assert!(verdict.is_approve());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_with_verdict_is_a_veto() {
        let dir = TempDir::new().unwrap();
        let agent = ScriptReviewAgent::new(
            "security-agent",
            r#"echo '{"status":"VETO","errors":["sql injection"],"warnings":[]}'; exit 1"#,
        )
        .with_veto_severity(Severity::Critical);

        let verdict = agent.validate(&request(&dir)).await.unwrap();
        assert!(verdict.is_veto());
        assert_eq!(verdict.reason, "sql injection");
        assert_eq!(verdict.severity, Severity::Critical);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_without_verdict_fails() {
        let dir = TempDir::new().unwrap();
        let agent = ScriptReviewAgent::new("test-agent", "echo boom >&2; exit 3");

        let err = agent.validate(&request(&dir)).await.unwrap_err();
        match err {
            AgentError::CommandFailed { stderr, .. } => assert_eq!(stderr, "boom"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_garbage_output_is_invalid() {
        let dir = TempDir::new().unwrap();
        let agent = ScriptReviewAgent::new("test-agent", "echo looks good to me");

        let err = agent.validate(&request(&dir)).await.unwrap_err();
        assert!(matches!(err, AgentError::InvalidOutput(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_standards_are_exported() {
        let dir = TempDir::new().unwrap();
        let agent = ScriptReviewAgent::new(
            "test-agent",
            r#"echo "{\"status\":\"APPROVE\",\"reason\":\"min $REVIEW_GATE_TEST_COVERAGE_MINIMUM\"}""#,
        );

        let verdict = agent.validate(&request(&dir)).await.unwrap();
        assert_eq!(verdict.reason, "min 80");
    }
}
