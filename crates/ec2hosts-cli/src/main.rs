//! ec2hosts CLI
//!
//! Keeps a marker-delimited block of instance records in a hosts file.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands, GlobalArgs};
use commands::SyncArgs;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose)?;
    execute_command(&cli.global, cli.command)
}

/// Logs go to stderr so stdout stays clean for --dry-run, --diff and --json.
fn init_tracing(verbose: bool) -> Result<()> {
    let result = if verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber).map_err(|e| e.to_string())
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber).map_err(|e| e.to_string())
    };
    result.map_err(|e| CliError::user(format!("Failed to set tracing subscriber: {}", e)))?;
    tracing::debug!("Verbose mode enabled");
    Ok(())
}

fn execute_command(global: &GlobalArgs, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Sync {
            name,
            inventory,
            public,
            tags,
            filters,
            tag_filters,
            exclude,
            allow_invalid_names,
        } => commands::run_sync(
            global,
            SyncArgs {
                name,
                inventory,
                public,
                tags,
                filters,
                tag_filters,
                exclude,
                allow_invalid_names,
            },
        ),
        Commands::Remove { name } => commands::run_remove(global, name),
        Commands::RemoveAll => commands::run_remove_all(global),
    }
}
