//! Creating, listing and pruning backups of one target file

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::Result;

/// One existing backup file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupFile {
    pub path: PathBuf,
    /// Unix timestamp parsed from the file name.
    pub timestamp: i64,
}

/// Outcome of a prune pass.
#[derive(Debug, Default)]
pub struct PruneReport {
    pub removed: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, io::Error)>,
}

/// Deletes one backup file while pruning.
pub type RemoveFn = fn(&Path) -> io::Result<()>;

/// The default [`RemoveFn`].
pub fn remove_backup(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}

/// Manages the backups that sit next to one target file.
#[derive(Debug, Clone)]
pub struct BackupManager {
    target: PathBuf,
    remove: RemoveFn,
}

impl BackupManager {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            remove: remove_backup,
        }
    }

    /// Use `remove` to delete pruned backups.
    pub fn with_remover(mut self, remove: RemoveFn) -> Self {
        self.remove = remove;
        self
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    fn directory(&self) -> &Path {
        match self.target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// `{file name}.` with which every backup name starts.
    fn prefix(&self) -> String {
        let name = self
            .target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{}.", name)
    }

    /// Path of the backup taken at `at`.
    pub fn backup_path(&self, at: DateTime<Utc>) -> PathBuf {
        let mut name = self.target.clone().into_os_string();
        name.push(format!(".{}", at.timestamp()));
        PathBuf::from(name)
    }

    /// Write `content` as the backup taken at `at`.
    ///
    /// A backup from the same second is overwritten.
    pub fn create(&self, content: &[u8], at: DateTime<Utc>) -> Result<BackupFile> {
        let path = self.backup_path(at);
        ec2hosts_fs::io::write_truncate(&path, content)?;
        tracing::info!(backup = %path.display(), "Backed up original");
        Ok(BackupFile {
            path,
            timestamp: at.timestamp(),
        })
    }

    /// Existing backups, oldest first.
    pub fn list(&self) -> Result<Vec<BackupFile>> {
        let prefix = self.prefix();
        let mut backups = Vec::new();

        for entry in fs::read_dir(self.directory())? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            let Some(suffix) = file_name.strip_prefix(&prefix) else {
                continue;
            };
            if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
                continue;
            }
            let Ok(timestamp) = suffix.parse::<i64>() else {
                continue;
            };
            if entry.file_type()?.is_file() {
                backups.push(BackupFile {
                    path: entry.path(),
                    timestamp,
                });
            }
        }

        backups.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.path.cmp(&b.path)));
        Ok(backups)
    }

    /// Delete the oldest backups so that at most `keep` remain.
    ///
    /// A file that cannot be deleted is reported and skipped; the
    /// remaining deletions still happen. Only a failure to list the
    /// directory is an error.
    pub fn prune(&self, keep: usize) -> Result<PruneReport> {
        let backups = self.list()?;
        let excess = backups.len().saturating_sub(keep);
        let mut report = PruneReport::default();

        for backup in backups.into_iter().take(excess) {
            match (self.remove)(&backup.path) {
                Ok(()) => {
                    tracing::info!(backup = %backup.path.display(), "Pruned old backup");
                    report.removed.push(backup.path);
                }
                Err(e) => {
                    tracing::warn!(backup = %backup.path.display(), error = %e, "Failed to prune backup");
                    report.failed.push((backup.path, e));
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn at(ts: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(ts, 0).unwrap()
    }

    fn setup() -> (TempDir, BackupManager) {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("hosts");
        fs::write(&target, "current\n").unwrap();
        (temp, BackupManager::new(target))
    }

    #[test]
    fn test_backup_path_appends_timestamp() {
        let manager = BackupManager::new("/etc/hosts");
        assert_eq!(
            manager.backup_path(at(1_700_000_000)),
            PathBuf::from("/etc/hosts.1700000000")
        );
    }

    #[test]
    fn test_create_writes_content() {
        let (_temp, manager) = setup();
        let backup = manager.create(b"old\n", at(100)).unwrap();
        assert_eq!(backup.timestamp, 100);
        assert_eq!(fs::read(&backup.path).unwrap(), b"old\n");
    }

    #[test]
    fn test_list_sorts_by_timestamp_not_name() {
        let (temp, manager) = setup();
        manager.create(b"b", at(900)).unwrap();
        manager.create(b"c", at(1000)).unwrap();
        manager.create(b"a", at(50)).unwrap();
        // Not backups: wrong prefix, non-numeric suffix, directory
        fs::write(temp.path().join("hosts.bak"), "x").unwrap();
        fs::write(temp.path().join("hostsx.123"), "x").unwrap();
        fs::create_dir(temp.path().join("hosts.777")).unwrap();

        let stamps: Vec<_> = manager.list().unwrap().iter().map(|b| b.timestamp).collect();
        assert_eq!(stamps, vec![50, 900, 1000]);
    }

    #[test]
    fn test_prune_keeps_newest() {
        let (_temp, manager) = setup();
        for ts in [10, 20, 30, 40] {
            manager.create(b"x", at(ts)).unwrap();
        }

        let report = manager.prune(2).unwrap();
        assert_eq!(report.removed.len(), 2);
        assert!(report.failed.is_empty());

        let stamps: Vec<_> = manager.list().unwrap().iter().map(|b| b.timestamp).collect();
        assert_eq!(stamps, vec![30, 40]);
    }

    fn refuse_ts_20(path: &Path) -> io::Result<()> {
        if path.to_string_lossy().ends_with(".20") {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "busy"));
        }
        remove_backup(path)
    }

    #[test]
    fn test_prune_continues_past_a_failed_delete() {
        let (_temp, manager) = setup();
        let manager = manager.with_remover(refuse_ts_20);
        for ts in [10, 20, 30, 40] {
            manager.create(b"x", at(ts)).unwrap();
        }

        let report = manager.prune(1).unwrap();

        assert_eq!(report.removed, vec![manager.backup_path(at(10)), manager.backup_path(at(30))]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, manager.backup_path(at(20)));
        let stamps: Vec<_> = manager.list().unwrap().iter().map(|b| b.timestamp).collect();
        assert_eq!(stamps, vec![20, 40]);
    }

    #[test]
    fn test_prune_below_limit_is_noop() {
        let (_temp, manager) = setup();
        manager.create(b"x", at(10)).unwrap();
        let report = manager.prune(5).unwrap();
        assert!(report.removed.is_empty());
        assert_eq!(manager.list().unwrap().len(), 1);
    }
}
