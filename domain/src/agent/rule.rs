//! Activation rules
//!
//! An [`ActivationRule`] is the activation predicate of an optional agent:
//! a pure boolean function over [`ProjectSignals`]. Rules are data, so the
//! registry can be loaded from configuration and compared between runs.

use crate::signals::ProjectSignals;
use serde::{Deserialize, Serialize};

/// Declarative activation predicate
///
/// # Example
///
/// ```
/// use gate_domain::agent::ActivationRule;
/// use gate_domain::signals::ProjectSignals;
///
/// let rule = ActivationRule::AnyOf(vec![
///     ActivationRule::Pattern("api".to_string()),
///     ActivationRule::FilesOver(50),
/// ]);
///
/// let signals = ProjectSignals::builder().file_count(120).build();
/// assert_eq!(rule.evaluate(&signals), Ok(true));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationRule {
    /// Always matches
    Always,
    /// Size-based: `file_count > n`
    FilesOver(usize),
    /// Pattern-based: the pattern was detected
    Pattern(String),
    /// Team-based: `contributor_count >= n`
    MinContributors(usize),
    /// Framework-based: at least one listed framework was detected
    AnyFramework(Vec<String>),
    /// Language-based: at least one file with a listed extension exists
    AnyLanguage(Vec<String>),
    /// At least one nested rule matches
    AnyOf(Vec<ActivationRule>),
    /// Every nested rule matches
    AllOf(Vec<ActivationRule>),
}

impl ActivationRule {
    /// Check the rule is well formed
    ///
    /// Empty lists and blank names are rejected; they would silently never
    /// (or always) match.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            ActivationRule::Always
            | ActivationRule::FilesOver(_)
            | ActivationRule::MinContributors(_) => Ok(()),
            ActivationRule::Pattern(name) => {
                if name.trim().is_empty() {
                    Err("pattern name is empty".to_string())
                } else {
                    Ok(())
                }
            }
            ActivationRule::AnyFramework(names) => validate_names("framework", names),
            ActivationRule::AnyLanguage(names) => validate_names("language", names),
            ActivationRule::AnyOf(rules) | ActivationRule::AllOf(rules) => {
                if rules.is_empty() {
                    return Err("composite rule has no members".to_string());
                }
                rules.iter().try_for_each(ActivationRule::validate)
            }
        }
    }

    /// Evaluate the predicate
    ///
    /// Fails only for malformed rules. Evaluation has no side effects and
    /// does not depend on anything but `signals`.
    pub fn evaluate(&self, signals: &ProjectSignals) -> Result<bool, String> {
        self.validate()?;
        Ok(self.matches(signals))
    }

    /// Explain why the rule matched, naming the first satisfied condition
    ///
    /// Returns `Ok(None)` when the rule does not match.
    pub fn explain(&self, signals: &ProjectSignals) -> Result<Option<String>, String> {
        self.validate()?;
        Ok(self.explain_match(signals))
    }

    fn matches(&self, signals: &ProjectSignals) -> bool {
        match self {
            ActivationRule::Always => true,
            ActivationRule::FilesOver(n) => signals.file_count() > *n,
            ActivationRule::Pattern(name) => signals.has_pattern(name),
            ActivationRule::MinContributors(n) => signals.contributor_count() >= *n,
            ActivationRule::AnyFramework(names) => names.iter().any(|f| signals.has_framework(f)),
            ActivationRule::AnyLanguage(exts) => exts.iter().any(|e| signals.language_count(e) > 0),
            ActivationRule::AnyOf(rules) => rules.iter().any(|r| r.matches(signals)),
            ActivationRule::AllOf(rules) => rules.iter().all(|r| r.matches(signals)),
        }
    }

    fn explain_match(&self, signals: &ProjectSignals) -> Option<String> {
        match self {
            ActivationRule::Always => Some("always active".to_string()),
            ActivationRule::FilesOver(n) => self
                .matches(signals)
                .then(|| format!("{} files (more than {})", signals.file_count(), n)),
            ActivationRule::Pattern(name) => self
                .matches(signals)
                .then(|| format!("'{}' pattern detected", name)),
            ActivationRule::MinContributors(n) => self.matches(signals).then(|| {
                format!(
                    "{} contributors (at least {})",
                    signals.contributor_count(),
                    n
                )
            }),
            ActivationRule::AnyFramework(names) => names
                .iter()
                .find(|f| signals.has_framework(f))
                .map(|f| format!("framework '{}' detected", f.to_lowercase())),
            ActivationRule::AnyLanguage(exts) => exts
                .iter()
                .find(|e| signals.language_count(e) > 0)
                .map(|e| format!("{} .{} files", signals.language_count(e), e.trim_start_matches('.'))),
            ActivationRule::AnyOf(rules) => rules.iter().find_map(|r| r.explain_match(signals)),
            ActivationRule::AllOf(rules) => {
                let parts: Option<Vec<String>> =
                    rules.iter().map(|r| r.explain_match(signals)).collect();
                parts.map(|p| p.join(" and "))
            }
        }
    }

    /// Get a human-readable description of this rule
    pub fn description(&self) -> String {
        match self {
            ActivationRule::Always => "always".to_string(),
            ActivationRule::FilesOver(n) => format!("more than {} files", n),
            ActivationRule::Pattern(name) => format!("pattern '{}'", name),
            ActivationRule::MinContributors(n) => format!("at least {} contributors", n),
            ActivationRule::AnyFramework(names) => format!("any framework of [{}]", names.join(", ")),
            ActivationRule::AnyLanguage(exts) => format!("any language of [{}]", exts.join(", ")),
            ActivationRule::AnyOf(rules) => format!(
                "({})",
                rules
                    .iter()
                    .map(ActivationRule::description)
                    .collect::<Vec<_>>()
                    .join(" or ")
            ),
            ActivationRule::AllOf(rules) => format!(
                "({})",
                rules
                    .iter()
                    .map(ActivationRule::description)
                    .collect::<Vec<_>>()
                    .join(" and ")
            ),
        }
    }
}

impl std::fmt::Display for ActivationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

fn validate_names(kind: &str, names: &[String]) -> Result<(), String> {
    if names.is_empty() {
        return Err(format!("{} list is empty", kind));
    }
    if names.iter().any(|n| n.trim().is_empty()) {
        return Err(format!("{} list contains an empty name", kind));
    }
    Ok(())
}
