//! Change-gated writes.
//!
//! New content only reaches the disk when it differs from what was read.
//! A changed write optionally snapshots the original first and prunes
//! old snapshots, then replaces the target.

use chrono::{DateTime, Utc};
use ec2hosts_fs::{WriteMode, checksum::compute_checksum};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::Result;
use crate::backup::{BackupManager, BackupPolicy, RemoveFn, remove_backup};

/// A backup that could not be deleted during pruning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PruneFailure {
    pub path: PathBuf,
    pub error: String,
}

/// What a gated write did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteOutcome {
    /// False when the content was identical and nothing was touched.
    pub changed: bool,
    pub previous_checksum: String,
    pub checksum: String,
    pub backup: Option<PathBuf>,
    pub pruned: Vec<PathBuf>,
    pub prune_failures: Vec<PruneFailure>,
}

impl WriteOutcome {
    fn unchanged(checksum: String) -> Self {
        Self {
            changed: false,
            previous_checksum: checksum.clone(),
            checksum,
            backup: None,
            pruned: Vec::new(),
            prune_failures: Vec::new(),
        }
    }
}

/// Writes a target file only when its content changes.
#[derive(Debug, Clone, Copy)]
pub struct GatedWriter {
    backup: BackupPolicy,
    mode: WriteMode,
    remove: RemoveFn,
}

impl Default for GatedWriter {
    fn default() -> Self {
        Self::new(BackupPolicy::default(), WriteMode::default())
    }
}

impl GatedWriter {
    pub fn new(backup: BackupPolicy, mode: WriteMode) -> Self {
        Self {
            backup,
            mode,
            remove: remove_backup,
        }
    }

    /// Use `remove` to delete backups beyond the retention count.
    pub fn with_remover(mut self, remove: RemoveFn) -> Self {
        self.remove = remove;
        self
    }

    pub fn backup_policy(&self) -> BackupPolicy {
        self.backup
    }

    pub fn write_mode(&self) -> WriteMode {
        self.mode
    }

    /// Apply `updated` to `path`, given the `original` bytes it was built from.
    pub fn apply(&self, path: &Path, original: &[u8], updated: &[u8]) -> Result<WriteOutcome> {
        self.apply_at(path, original, updated, Utc::now())
    }

    /// As [`GatedWriter::apply`], stamping any backup with `now`.
    pub fn apply_at(
        &self,
        path: &Path,
        original: &[u8],
        updated: &[u8],
        now: DateTime<Utc>,
    ) -> Result<WriteOutcome> {
        if original == updated {
            tracing::debug!(path = %path.display(), "Content unchanged, skipping write");
            return Ok(WriteOutcome::unchanged(compute_checksum(original)));
        }

        let mut outcome = WriteOutcome {
            changed: true,
            previous_checksum: compute_checksum(original),
            checksum: compute_checksum(updated),
            backup: None,
            pruned: Vec::new(),
            prune_failures: Vec::new(),
        };

        if self.backup.is_enabled() {
            let manager = BackupManager::new(path).with_remover(self.remove);
            outcome.backup = Some(manager.create(original, now)?.path);

            if let Some(keep) = self.backup.retain() {
                let report = manager.prune(keep)?;
                outcome.pruned = report.removed;
                outcome.prune_failures = report
                    .failed
                    .into_iter()
                    .map(|(path, e)| PruneFailure {
                        path,
                        error: e.to_string(),
                    })
                    .collect();
            }
        }

        self.mode.write(path, updated)?;
        tracing::info!(
            path = %path.display(),
            mode = %self.mode,
            bytes = updated.len(),
            "Wrote updated file"
        );

        Ok(outcome)
    }
}
