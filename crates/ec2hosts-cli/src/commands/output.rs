//! Printing plans and reports

use std::io::Write;

use colored::Colorize;
use ec2hosts_core::{Plan, SyncReport};

use crate::error::Result;

/// Write the planned file content to stdout, byte for byte.
pub fn print_content(plan: &Plan) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&plan.updated)?;
    stdout.flush()?;
    Ok(())
}

pub fn print_diff(plan: &Plan) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(plan.unified_diff().as_bytes())?;
    stdout.flush()?;
    Ok(())
}

pub fn print_json(report: &SyncReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// One status line per run, plus any backup bookkeeping.
pub fn print_status(report: &SyncReport) {
    let path = report.path.display().to_string();

    if !report.changed {
        println!(
            "{} {} is up to date. No changes needed.",
            "OK".green().bold(),
            path.cyan()
        );
        return;
    }

    println!(
        "{} Updated {} ({})",
        "OK".green().bold(),
        path.cyan(),
        report.operation
    );

    let Some(write) = &report.write else {
        return;
    };
    if let Some(backup) = &write.backup {
        println!("   {} backup {}", "+".green(), backup.display());
    }
    for pruned in &write.pruned {
        println!("   {} pruned {}", "-".yellow(), pruned.display());
    }
    for failure in &write.prune_failures {
        println!(
            "   {} could not prune {}: {}",
            "!".red(),
            failure.path.display(),
            failure.error
        );
    }
}
