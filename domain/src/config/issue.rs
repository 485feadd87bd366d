//! Structured configuration issues
//!
//! Configuration validation never fails outright. It returns a list of
//! [`ConfigIssue`]s and lets the caller decide whether to abort on errors
//! or just print warnings.

use std::fmt;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueLevel {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// `timeout_seconds` is zero: every agent would time out immediately.
    ZeroTimeout,
    /// `veto_override_threshold` is zero: any single veto could be overridden.
    ZeroOverrideThreshold,
    /// `test_coverage_minimum` exceeds 100 percent.
    CoverageOutOfRange,
    /// `active_agents` is present but empty.
    EmptyActiveList,
    /// An extra agent definition has no id.
    UnnamedDefinition,
    /// A command is configured for an agent that is not registered.
    CommandForUnknownAgent,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub level: IssueLevel,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == IssueLevel::Error
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.level {
            IssueLevel::Error => "error",
            IssueLevel::Warning => "warning",
        };
        write!(f, "{}: {}", label, self.message)
    }
}
