//! Contributor count from git history
//!
//! Best effort: any failure (no `git`, not a repository, timeout) means a
//! single author.

use gate_domain::signals::SINGLE_AUTHOR;
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Upper bound for `git log`
pub const GIT_LOG_TIMEOUT: Duration = Duration::from_secs(5);

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Distinct author emails in the history of `root`, or [`SINGLE_AUTHOR`]
pub fn contributor_count(root: &Path) -> usize {
    match author_emails(root, GIT_LOG_TIMEOUT) {
        Ok(emails) if !emails.is_empty() => emails.len(),
        Ok(_) => {
            debug!("git history is empty, assuming a single author");
            SINGLE_AUTHOR
        }
        Err(e) => {
            debug!("git history unavailable ({}), assuming a single author", e);
            SINGLE_AUTHOR
        }
    }
}

fn author_emails(root: &Path, timeout: Duration) -> Result<BTreeSet<String>, String> {
    let git = which::which("git").map_err(|e| format!("git not found: {}", e))?;

    let mut child = Command::new(git)
        .args(["log", "--format=%ae"])
        .current_dir(root)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| format!("failed to spawn git: {}", e))?;

    // Drain stdout on its own thread so a long history cannot fill the pipe
    let mut stdout = child.stdout.take().ok_or("git stdout not captured")?;
    let reader = thread::spawn(move || {
        let mut buf = String::new();
        stdout.read_to_string(&mut buf).map(|_| buf)
    });

    let start = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if start.elapsed() > timeout => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(format!("git log timed out after {:?}", timeout));
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => return Err(format!("failed to wait for git: {}", e)),
        }
    };

    if !status.success() {
        return Err(format!("git log exited with {}", status));
    }

    let output = reader
        .join()
        .map_err(|_| "git output reader panicked".to_string())?
        .map_err(|e| format!("failed to read git output: {}", e))?;

    Ok(output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_lowercase)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_not_a_repository_is_single_author() {
        let dir = TempDir::new().unwrap();
        assert_eq!(contributor_count(dir.path()), SINGLE_AUTHOR);
    }

    #[test]
    fn test_counts_distinct_authors() {
        if which::which("git").is_err() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let git = |args: &[&str]| {
            Command::new("git")
                .args(args)
                .current_dir(dir.path())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .map(|s| s.success())
                .unwrap_or(false)
        };
        assert!(git(&["init", "-q"]));
        for email in ["a@example.com", "b@example.com", "A@example.com"] {
            let author = format!("user.email={email}");
            assert!(git(&[
                "-c",
                &author,
                "-c",
                "user.name=dev",
                "commit",
                "-q",
                "--allow-empty",
                "-m",
                "change",
            ]));
        }

        assert_eq!(contributor_count(dir.path()), 2);
    }
}
