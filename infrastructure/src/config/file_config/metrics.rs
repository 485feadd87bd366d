//! Metrics configuration from TOML (`[metrics]` section)
//!
//! ```toml
//! [metrics]
//! dir = ".review-gate/metrics"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default metrics directory, relative to the project root
pub const DEFAULT_METRICS_DIR: &str = ".review-gate/metrics";

/// Where review metrics are stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMetricsConfig {
    /// Metrics directory; relative paths resolve against the project root
    pub dir: PathBuf,
    /// Set to false to skip recording metrics
    pub enabled: bool,
}

impl Default for FileMetricsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_METRICS_DIR),
            enabled: true,
        }
    }
}

impl FileMetricsConfig {
    /// Resolve the metrics directory for a project root
    pub fn resolve_dir(&self, root: &Path) -> PathBuf {
        if self.dir.is_absolute() {
            self.dir.clone()
        } else {
            root.join(&self.dir)
        }
    }
}
