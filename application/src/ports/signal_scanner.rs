//! Signal scanner port
//!
//! Defines how the application obtains a [`ProjectSignals`] snapshot for a
//! project tree.

use gate_domain::ProjectSignals;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that abort a scan
///
/// A scan error is fatal for the cycle: no agent is evaluated.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Project root does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("Project root is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Cannot read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read-only scanner producing project signals
///
/// Implementations must not modify the tree and must produce identical
/// signals for an unchanged tree.
pub trait SignalScanner: Send + Sync {
    fn scan(&self, root: &Path) -> Result<ProjectSignals, ScanError>;
}
