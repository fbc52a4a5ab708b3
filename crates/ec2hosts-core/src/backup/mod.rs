//! Timestamped backups of the target file
//!
//! Before a changed file is replaced, its previous content can be copied
//! next to it as `{path}.{unix_timestamp}`. Older copies beyond the
//! retention count are pruned, oldest first.

mod backup_set;

pub use backup_set::{BackupFile, BackupManager, PruneReport, RemoveFn, remove_backup};

use std::num::NonZeroUsize;

/// Whether backups are written, and how many are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackupPolicy {
    /// Never write a backup.
    #[default]
    Disabled,
    /// Write a backup on every change and never prune.
    KeepAll,
    /// Write a backup on every change and keep only the newest `n`,
    /// counting the one just written.
    Keep(NonZeroUsize),
}

impl BackupPolicy {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    /// Retention limit, `None` for unlimited or disabled.
    pub fn retain(&self) -> Option<usize> {
        match self {
            Self::Keep(n) => Some(n.get()),
            _ => None,
        }
    }
}

impl std::fmt::Display for BackupPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => write!(f, "disabled"),
            Self::KeepAll => write!(f, "keep all"),
            Self::Keep(n) => write!(f, "keep {}", n),
        }
    }
}
