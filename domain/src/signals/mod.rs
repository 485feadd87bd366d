//! Project signals
//!
//! A [`ProjectSignals`] value is the read-only snapshot produced by a scan of
//! a project tree. Every agent activation decision is derived from it.
//!
//! Signals use ordered collections so that two scans of an unchanged tree
//! serialize to identical bytes.

pub mod patterns;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Contributor count assumed when version-control history is unavailable.
pub const SINGLE_AUTHOR: usize = 1;

/// Immutable snapshot of facts about a project
///
/// Built once per scan through [`SignalsBuilder`] and never mutated afterward.
///
/// # Example
///
/// ```
/// use gate_domain::signals::{ProjectSignals, patterns};
///
/// let signals = ProjectSignals::builder()
///     .file_count(120)
///     .pattern(patterns::API)
///     .extension("RS")
///     .build();
///
/// assert!(signals.has_pattern("api"));
/// assert_eq!(signals.language_count("rs"), 1);
/// assert_eq!(signals.contributor_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSignals {
    languages: BTreeMap<String, usize>,
    frameworks: BTreeSet<String>,
    patterns: BTreeSet<String>,
    file_count: usize,
    contributor_count: usize,
}

impl ProjectSignals {
    pub fn builder() -> SignalsBuilder {
        SignalsBuilder::default()
    }

    /// File counts keyed by lower-cased extension (without the dot)
    pub fn languages(&self) -> &BTreeMap<String, usize> {
        &self.languages
    }

    pub fn frameworks(&self) -> &BTreeSet<String> {
        &self.frameworks
    }

    pub fn patterns(&self) -> &BTreeSet<String> {
        &self.patterns
    }

    pub fn file_count(&self) -> usize {
        self.file_count
    }

    pub fn contributor_count(&self) -> usize {
        self.contributor_count
    }

    pub fn has_pattern(&self, pattern: &str) -> bool {
        self.patterns.contains(pattern)
    }

    /// Case-insensitive framework lookup
    pub fn has_framework(&self, framework: &str) -> bool {
        self.frameworks.contains(&framework.to_lowercase())
    }

    /// Number of files with the given extension (case-insensitive, leading dot optional)
    pub fn language_count(&self, extension: &str) -> usize {
        self.languages
            .get(&normalize_extension(extension))
            .copied()
            .unwrap_or(0)
    }

    /// Extensions ordered by file count, most common first
    pub fn languages_by_count(&self) -> Vec<(&str, usize)> {
        let mut langs: Vec<_> = self
            .languages
            .iter()
            .map(|(ext, count)| (ext.as_str(), *count))
            .collect();
        langs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        langs
    }
}

/// Builder for [`ProjectSignals`]
///
/// The contributor count starts at [`SINGLE_AUTHOR`].
#[derive(Debug, Clone)]
pub struct SignalsBuilder {
    languages: BTreeMap<String, usize>,
    frameworks: BTreeSet<String>,
    patterns: BTreeSet<String>,
    file_count: usize,
    contributor_count: usize,
}

impl Default for SignalsBuilder {
    fn default() -> Self {
        Self {
            languages: BTreeMap::new(),
            frameworks: BTreeSet::new(),
            patterns: BTreeSet::new(),
            file_count: 0,
            contributor_count: SINGLE_AUTHOR,
        }
    }
}

impl SignalsBuilder {
    /// Count one file with the given extension
    pub fn extension(mut self, extension: &str) -> Self {
        self.record_extension(extension);
        self
    }

    /// Set the file count for an extension
    pub fn language(mut self, extension: &str, count: usize) -> Self {
        self.languages.insert(normalize_extension(extension), count);
        self
    }

    pub fn framework(mut self, framework: impl AsRef<str>) -> Self {
        self.add_framework(framework);
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.add_pattern(pattern);
        self
    }

    pub fn file_count(mut self, count: usize) -> Self {
        self.file_count = count;
        self
    }

    pub fn contributor_count(mut self, count: usize) -> Self {
        self.contributor_count = count;
        self
    }

    // ==================== In-place variants (used while walking) ====================

    pub fn record_extension(&mut self, extension: &str) {
        let ext = normalize_extension(extension);
        if !ext.is_empty() {
            *self.languages.entry(ext).or_insert(0) += 1;
        }
    }

    pub fn add_framework(&mut self, framework: impl AsRef<str>) {
        self.frameworks.insert(framework.as_ref().to_lowercase());
    }

    pub fn add_pattern(&mut self, pattern: impl Into<String>) {
        self.patterns.insert(pattern.into());
    }

    pub fn increment_files(&mut self) {
        self.file_count += 1;
    }

    pub fn set_contributor_count(&mut self, count: usize) {
        self.contributor_count = count;
    }

    pub fn build(self) -> ProjectSignals {
        ProjectSignals {
            languages: self.languages,
            frameworks: self.frameworks,
            patterns: self.patterns,
            file_count: self.file_count,
            contributor_count: self.contributor_count,
        }
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_counting_is_case_insensitive() {
        let signals = ProjectSignals::builder()
            .extension("RS")
            .extension(".rs")
            .extension("Py")
            .build();

        assert_eq!(signals.language_count("rs"), 2);
        assert_eq!(signals.language_count(".RS"), 2);
        assert_eq!(signals.language_count("py"), 1);
        assert_eq!(signals.language_count("go"), 0);
    }

    #[test]
    fn test_empty_extension_ignored() {
        let signals = ProjectSignals::builder().extension("").extension(".").build();
        assert!(signals.languages().is_empty());
    }

    #[test]
    fn test_frameworks_are_a_set() {
        let signals = ProjectSignals::builder()
            .framework("React")
            .framework("react")
            .build();

        assert_eq!(signals.frameworks().len(), 1);
        assert!(signals.has_framework("REACT"));
    }

    #[test]
    fn test_default_contributor_sentinel() {
        let signals = ProjectSignals::builder().build();
        assert_eq!(signals.contributor_count(), SINGLE_AUTHOR);
    }

    #[test]
    fn test_languages_by_count() {
        let signals = ProjectSignals::builder()
            .language("py", 3)
            .language("rs", 7)
            .language("go", 3)
            .build();

        let ordered = signals.languages_by_count();
        assert_eq!(ordered, vec![("rs", 7), ("go", 3), ("py", 3)]);
    }

    #[test]
    fn test_serialization_is_stable() {
        let a = ProjectSignals::builder()
            .pattern("tests")
            .pattern("api")
            .framework("tokio")
            .framework("actix")
            .extension("rs")
            .build();
        let b = ProjectSignals::builder()
            .framework("actix")
            .pattern("api")
            .extension("rs")
            .framework("tokio")
            .pattern("tests")
            .build();

        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
