//! JSONL event log plus JSON aggregate snapshot.
//!
//! Every [`MetricsEvent`] is one line of `events.jsonl`. The aggregate in
//! `aggregate.json` is replaced atomically (temp file + rename). On load it
//! catches up with log events it does not cover yet, and it is rebuilt from
//! the log whenever it is missing, unreadable, or ahead of the log.

use gate_application::ports::metrics_store::{MetricsReadError, MetricsStore, MetricsWriteError};
use gate_domain::{MetricsAggregate, MetricsEvent};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

/// Append-only verdict log
pub const EVENTS_FILE: &str = "events.jsonl";

/// Derived counters snapshot
pub const AGGREGATE_FILE: &str = "aggregate.json";

/// File-backed metrics store rooted at a directory.
///
/// Writes go through one mutex, so a store instance is the single writer
/// for its directory within the process.
pub struct JsonlMetricsStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlMetricsStore {
    /// Create a store for `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn events_path(&self) -> PathBuf {
        self.dir.join(EVENTS_FILE)
    }

    pub fn aggregate_path(&self) -> PathBuf {
        self.dir.join(AGGREGATE_FILE)
    }

    fn read_aggregate_file(&self) -> Option<MetricsAggregate> {
        let path = self.aggregate_path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Cannot read {}: {}", path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(aggregate) => Some(aggregate),
            Err(e) => {
                warn!("Corrupt metrics aggregate {}: {}", path.display(), e);
                None
            }
        }
    }
}

impl MetricsStore for JsonlMetricsStore {
    fn append_events(&self, events: &[MetricsEvent]) -> Result<(), MetricsWriteError> {
        if events.is_empty() {
            return Ok(());
        }

        let mut buffer = String::new();
        for event in events {
            buffer.push_str(&serde_json::to_string(event)?);
            buffer.push('\n');
        }

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        fs::create_dir_all(&self.dir)?;
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(self.events_path())?;
        // A torn final line from an interrupted write must not swallow this batch
        if ends_mid_line(&mut file)? {
            buffer.insert(0, '\n');
        }
        append_or_rollback(&mut file, |file| {
            file.write_all(buffer.as_bytes())?;
            file.sync_data()
        })?;

        debug!("Appended {} metrics events", events.len());
        Ok(())
    }

    fn persist_aggregate(&self, aggregate: &MetricsAggregate) -> Result<(), MetricsWriteError> {
        let json = serde_json::to_string_pretty(aggregate)?;

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        fs::create_dir_all(&self.dir)?;
        let target = self.aggregate_path();
        let tmp = self.dir.join(format!("{}.tmp", AGGREGATE_FILE));
        {
            let mut file = File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &target)?;
        Ok(())
    }

    fn load_aggregate(&self) -> Result<MetricsAggregate, MetricsReadError> {
        let events = self.read_events()?;
        let logged = events.len() as u64;

        match self.read_aggregate_file() {
            Some(mut aggregate) if aggregate.events_applied <= logged => {
                let missing = &events[aggregate.events_applied as usize..];
                if !missing.is_empty() {
                    debug!("Applying {} events missing from the aggregate", missing.len());
                }
                for event in missing {
                    aggregate.apply(event);
                }
                Ok(aggregate)
            }
            Some(aggregate) => {
                warn!(
                    "Metrics aggregate covers {} events but the log holds {}; rebuilding",
                    aggregate.events_applied, logged
                );
                Ok(MetricsAggregate::replay(&events))
            }
            None => {
                if !events.is_empty() {
                    debug!("Rebuilding metrics aggregate from {} events", events.len());
                }
                Ok(MetricsAggregate::replay(&events))
            }
        }
    }

    fn read_events(&self) -> Result<Vec<MetricsEvent>, MetricsReadError> {
        let path = self.events_path();
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut events = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<MetricsEvent>(&line) {
                Ok(event) => events.push(event),
                Err(e) => warn!(
                    "Skipping corrupt metrics line {} in {}: {}",
                    index + 1,
                    path.display(),
                    e
                ),
            }
        }
        Ok(events)
    }
}

/// Run `write` against the log, cutting the file back to its previous
/// length if it fails so a retried batch is never logged twice
fn append_or_rollback(
    file: &mut File,
    write: impl FnOnce(&mut File) -> std::io::Result<()>,
) -> std::io::Result<()> {
    let start = file.metadata()?.len();
    if let Err(e) = write(file) {
        if let Err(rollback) = file.set_len(start) {
            warn!("Cannot roll back partial metrics write: {}", rollback);
        }
        return Err(e);
    }
    Ok(())
}

fn ends_mid_line(file: &mut File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}
