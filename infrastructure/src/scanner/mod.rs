//! Filesystem signal scanner
//!
//! Walks a project tree once and produces a [`ProjectSignals`] snapshot.
//! Dependency, build and VCS directories are pruned before descent.

pub mod git;
pub mod manifests;
pub mod patterns;

use gate_application::ports::signal_scanner::{ScanError, SignalScanner};
use gate_domain::signals::patterns as pattern;
use gate_domain::{ProjectSignals, SignalsBuilder};
use manifests::ManifestKind;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Directories never descended into
pub const SKIPPED_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "vendor",
    "target",
    "__pycache__",
    ".pytest_cache",
    "venv",
    ".venv",
    "env",
    "dist",
    "build",
    ".next",
    ".cache",
    "coverage",
    ".tox",
    ".idea",
    ".vscode",
    // Our own metrics and state
    ".review-gate",
];

const SKIPPED_FILES: &[&str] = &[".DS_Store"];

/// [`SignalScanner`] over the local filesystem
#[derive(Debug, Clone)]
pub struct FsSignalScanner {
    git_history: bool,
}

impl Default for FsSignalScanner {
    fn default() -> Self {
        Self { git_history: true }
    }
}

impl FsSignalScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether to consult `git log` for the contributor count
    pub fn with_git_history(mut self, enabled: bool) -> Self {
        self.git_history = enabled;
        self
    }

    fn check_root(root: &Path) -> Result<(), ScanError> {
        let metadata = fs::metadata(root).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ScanError::RootNotFound(root.to_path_buf()),
            _ => ScanError::Unreadable {
                path: root.to_path_buf(),
                source: e,
            },
        })?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }
        fs::read_dir(root).map_err(|e| ScanError::Unreadable {
            path: root.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }

    fn visit(builder: &mut SignalsBuilder, root: &Path, entry: &DirEntry) {
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());

        if entry.file_type().is_dir() {
            for found in patterns::for_directory(relative) {
                builder.add_pattern(found);
            }
            return;
        }

        let name = entry.file_name().to_string_lossy();
        if SKIPPED_FILES.contains(&name.as_ref()) {
            return;
        }

        builder.increment_files();
        if let Some(ext) = relative.extension().and_then(|e| e.to_str()) {
            builder.record_extension(ext);
        }
        for found in patterns::for_file(relative) {
            builder.add_pattern(found);
        }

        if let Some(kind) = ManifestKind::from_file_name(&name) {
            builder.add_pattern(pattern::DEPENDENCIES);
            for framework in manifests::detect(entry.path(), kind) {
                builder.add_framework(framework);
            }
        }
    }
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

impl SignalScanner for FsSignalScanner {
    fn scan(&self, root: &Path) -> Result<ProjectSignals, ScanError> {
        Self::check_root(root)?;

        let mut builder = ProjectSignals::builder();
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_skipped_dir(e));

        for entry in walker {
            match entry {
                Ok(entry) if entry.depth() == 0 => {}
                Ok(entry) => Self::visit(&mut builder, root, &entry),
                Err(e) => warn!("Skipping unreadable entry: {}", e),
            }
        }

        if self.git_history {
            builder.set_contributor_count(git::contributor_count(root));
        }

        let signals = builder.build();
        debug!(
            "Scanned {}: {} files, patterns {:?}",
            root.display(),
            signals.file_count(),
            signals.patterns()
        );
        Ok(signals)
    }
}
