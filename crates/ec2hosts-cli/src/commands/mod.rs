//! Command implementations for ec2hosts-cli

pub mod output;
pub mod remove;
pub mod sync;

pub use remove::{run_remove, run_remove_all};
pub use sync::{SyncArgs, run_sync};

use ec2hosts_core::{Operation, Settings, SyncEngine, SyncReport};
use ec2hosts_fs::WriteMode;

use crate::cli::GlobalArgs;
use crate::error::Result;

/// Load the settings file, if any, and apply the global flags on top.
pub fn resolve_settings(global: &GlobalArgs) -> Result<Settings> {
    let mut settings = match &global.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    if let Some(file) = &global.file {
        settings.file = Some(file.clone());
    }
    if global.backup {
        settings.backup.enabled = true;
    }
    if let Some(keep) = global.keep {
        settings.backup.enabled = true;
        settings.backup.keep = Some(keep);
    }
    if global.atomic {
        settings.write_mode = WriteMode::Atomic;
    }

    tracing::debug!(
        file = %settings.target_file().display(),
        mode = %settings.write_mode,
        "Resolved settings"
    );
    Ok(settings)
}

/// Plan `operation`, print what the flags ask for and apply unless dry-run.
pub fn execute(global: &GlobalArgs, settings: &Settings, operation: &Operation) -> Result<SyncReport> {
    let engine = SyncEngine::new(settings.target_file(), settings.writer()?);
    let plan = engine.plan(operation)?;

    if global.diff {
        output::print_diff(&plan)?;
    }

    let write = if global.dry_run {
        if !global.diff && !global.json {
            output::print_content(&plan)?;
        }
        None
    } else {
        Some(engine.apply(&plan)?)
    };

    let report = SyncReport::new(&plan, operation, write);
    if global.json {
        output::print_json(&report)?;
    } else if !global.dry_run {
        output::print_status(&report);
    }
    Ok(report)
}
