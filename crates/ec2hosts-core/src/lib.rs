//! Orchestration layer for ec2hosts
//!
//! Ties the block editor to its collaborators:
//!
//! - [`directory`]: where records come from, with pagination, host-name
//!   validation and exclusion
//! - [`filter`]: `KEY=VALUE` filter parsing
//! - [`writer`] and [`backup`]: the change-gated write with timestamped
//!   backups and retention
//! - [`config`]: file-backed settings
//! - [`sync`]: read, edit, compare, write

pub mod backup;
pub mod config;
pub mod directory;
pub mod error;
pub mod filter;
pub mod sync;
pub mod writer;

pub use backup::{BackupFile, BackupManager, BackupPolicy};
pub use config::{BackupSettings, Settings};
pub use directory::{Directory, Instance, InvalidNames, InventoryFile, Page, Query, fetch_records};
pub use error::{Error, Result};
pub use filter::FilterSet;
pub use sync::{Operation, Plan, SyncEngine, SyncReport};
pub use writer::{GatedWriter, PruneFailure, WriteOutcome};
