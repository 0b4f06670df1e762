//! Last-modified timestamps for pages.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Supplies a page's last-modified time in epoch milliseconds
#[async_trait]
pub trait TimestampSource: Send + Sync {
    async fn timestamp(&self, file: &Path) -> Option<i64>;
}

/// Reads the last commit time of a file from git
///
/// Found timestamps are memoized per path for the lifetime of the source.
/// Misses are queried again, so a page committed mid-session picks up its
/// time on the next compile.
#[derive(Debug, Default)]
pub struct GitTimestamps {
    memo: Mutex<HashMap<PathBuf, i64>>,
}

impl GitTimestamps {
    pub fn new() -> Self {
        Self::default()
    }

    async fn query(file: &Path) -> Option<i64> {
        let dir = file.parent()?;
        let name = file.file_name()?;

        let output = Command::new("git")
            .current_dir(dir)
            .args(["log", "-1", "--pretty=%at", "--"])
            .arg(name)
            .output()
            .await
            .map_err(|err| tracing::debug!(file = %file.display(), error = %err, "failed to run git"))
            .ok()?;

        if !output.status.success() {
            tracing::debug!(
                file = %file.display(),
                code = output.status.code().unwrap_or(-1),
                "git log failed"
            );
            return None;
        }

        parse_epoch_seconds(&String::from_utf8_lossy(&output.stdout)).map(|secs| secs * 1000)
    }
}

#[async_trait]
impl TimestampSource for GitTimestamps {
    async fn timestamp(&self, file: &Path) -> Option<i64> {
        let cached = self.memo.lock().get(file).copied();
        if cached.is_some() {
            return cached;
        }

        let value = Self::query(file).await?;
        self.memo.lock().insert(file.to_path_buf(), value);
        Some(value)
    }
}

/// Untracked files produce empty output, which is a miss
fn parse_epoch_seconds(stdout: &str) -> Option<i64> {
    stdout.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_epoch_seconds() {
        assert_eq!(parse_epoch_seconds("1700000000\n"), Some(1_700_000_000));
        assert_eq!(parse_epoch_seconds(""), None);
        assert_eq!(parse_epoch_seconds("fatal: not a git repository"), None);
    }

    #[tokio::test]
    async fn test_untracked_file_has_no_timestamp() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("page.md");
        std::fs::write(&file, "# Page").unwrap();

        let source = GitTimestamps::new();
        assert_eq!(source.timestamp(&file).await, None);
        assert_eq!(source.timestamp(&file).await, None);
        assert!(source.memo.lock().is_empty());
    }

    #[tokio::test]
    async fn test_memoized_hit_is_reused() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("page.md");
        std::fs::write(&file, "# Page").unwrap();

        let source = GitTimestamps::new();
        source.memo.lock().insert(file.clone(), 1_700_000_000_000);
        assert_eq!(source.timestamp(&file).await, Some(1_700_000_000_000));
    }
}
