//! Read, edit, compare, write.
//!
//! A run reads the target once, hands the bytes to one block operation,
//! and passes the result to the [`GatedWriter`]. Any editor error stops
//! the run before the writer is reached, so a failed scan never touches
//! the file.

use std::path::{Path, PathBuf};

use ec2hosts_blocks::{AddressPolicy, RecordSet};
use serde::Serialize;
use similar::TextDiff;

use crate::Result;
use crate::writer::{GatedWriter, WriteOutcome};

/// One block operation.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Regenerate (or install) the block `name` from `records`.
    Synchronize {
        name: String,
        records: RecordSet,
        policy: AddressPolicy,
        columns: Vec<String>,
    },
    /// Delete the block `name`.
    Remove { name: String },
    /// Delete every managed block.
    RemoveAll,
}

impl Operation {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Synchronize { .. } => "sync",
            Self::Remove { .. } => "remove",
            Self::RemoveAll => "remove-all",
        }
    }

    /// Run the operation over `input`.
    pub fn edit(&self, input: &[u8]) -> Result<Vec<u8>> {
        let output = match self {
            Self::Synchronize {
                name,
                records,
                policy,
                columns,
            } => ec2hosts_blocks::synchronize(input, records, name, policy, columns)?,
            Self::Remove { name } => ec2hosts_blocks::remove(input, name)?,
            Self::RemoveAll => ec2hosts_blocks::remove_all(input)?,
        };
        Ok(output)
    }
}

/// The content of the target before and after an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub path: PathBuf,
    pub original: Vec<u8>,
    pub updated: Vec<u8>,
}

impl Plan {
    pub fn is_changed(&self) -> bool {
        self.original != self.updated
    }

    /// Unified diff of the change, empty when nothing changed.
    pub fn unified_diff(&self) -> String {
        if !self.is_changed() {
            return String::new();
        }
        let old = String::from_utf8_lossy(&self.original);
        let new = String::from_utf8_lossy(&self.updated);
        let path = self.path.display().to_string();
        TextDiff::from_lines(old.as_ref(), new.as_ref())
            .unified_diff()
            .context_radius(3)
            .header(&format!("a/{}", path), &format!("b/{}", path))
            .to_string()
    }
}

/// Summary of a run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub path: PathBuf,
    pub operation: String,
    pub dry_run: bool,
    pub changed: bool,
    /// Absent on dry runs.
    pub write: Option<WriteOutcome>,
}

impl SyncReport {
    /// Report for `plan`; `write` is `None` when nothing was applied.
    pub fn new(plan: &Plan, operation: &Operation, write: Option<WriteOutcome>) -> Self {
        Self {
            path: plan.path.clone(),
            operation: operation.label().to_string(),
            dry_run: write.is_none(),
            changed: plan.is_changed(),
            write,
        }
    }
}

/// Applies block operations to one target file.
#[derive(Debug, Clone)]
pub struct SyncEngine {
    target: PathBuf,
    writer: GatedWriter,
}

impl SyncEngine {
    pub fn new(target: impl Into<PathBuf>, writer: GatedWriter) -> Self {
        Self {
            target: target.into(),
            writer,
        }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Read the target and compute the new content without writing.
    pub fn plan(&self, operation: &Operation) -> Result<Plan> {
        let original = ec2hosts_fs::io::read_bytes(&self.target)?;
        let updated = operation.edit(&original)?;
        tracing::debug!(
            path = %self.target.display(),
            operation = operation.label(),
            changed = original != updated,
            "Planned operation"
        );
        Ok(Plan {
            path: self.target.clone(),
            original,
            updated,
        })
    }

    /// Persist a plan through the gated writer.
    pub fn apply(&self, plan: &Plan) -> Result<WriteOutcome> {
        self.writer.apply(&plan.path, &plan.original, &plan.updated)
    }

    /// Plan and, unless `dry_run`, apply.
    pub fn run(&self, operation: &Operation, dry_run: bool) -> Result<SyncReport> {
        let plan = self.plan(operation)?;
        let write = if dry_run {
            None
        } else {
            Some(self.apply(&plan)?)
        };
        Ok(SyncReport::new(&plan, operation, write))
    }
}
