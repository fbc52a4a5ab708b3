//! Remove and remove-all commands

use ec2hosts_core::Operation;

use crate::cli::GlobalArgs;
use crate::error::{CliError, Result};

use super::{execute, resolve_settings};

/// Delete the block `name` (or the configured name).
pub fn run_remove(global: &GlobalArgs, name: Option<String>) -> Result<()> {
    let mut settings = resolve_settings(global)?;
    if let Some(name) = name {
        settings.name = Some(name);
    }
    let name = settings
        .block_name()
        .map_err(|_| CliError::user("a block name is required (use --name or set `name` in the config)"))?
        .to_string();

    execute(global, &settings, &Operation::Remove { name })?;
    Ok(())
}

/// Delete every managed block.
pub fn run_remove_all(global: &GlobalArgs) -> Result<()> {
    let settings = resolve_settings(global)?;
    execute(global, &settings, &Operation::RemoveAll)?;
    Ok(())
}
