//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// ec2hosts - keep a named block of instance records in a hosts file
#[derive(Parser, Debug)]
#[command(name = "ec2hosts")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every command
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (TOML, JSON or YAML)
    #[arg(short, long, global = true, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Hosts file to edit [default: /etc/hosts]
    #[arg(short, long, global = true, env = "EC2HOSTS_FILE", value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Print the resulting file instead of writing it
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Print a unified diff of the change
    #[arg(long, global = true, conflicts_with = "json")]
    pub diff: bool,

    /// Print a JSON report for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Copy the file to FILE.<unix-time> before changing it
    #[arg(long, global = true)]
    pub backup: bool,

    /// Keep only the newest N backups (implies --backup)
    #[arg(long, global = true, value_name = "N")]
    pub keep: Option<usize>,

    /// Replace the file with a temp-file rename instead of truncating it
    #[arg(long, global = true)]
    pub atomic: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Regenerate a named block from an inventory
    ///
    /// Examples:
    ///   ec2hosts sync -n app -i instances.json
    ///   ec2hosts sync -n app -i instances.json --public bastion -t Role
    ///   ec2hosts --dry-run sync -n app -i instances.json --filter vpc-id=vpc-123
    Sync {
        /// Block name
        #[arg(short, long)]
        name: Option<String>,

        /// DescribeInstances JSON document to read instances from
        #[arg(short, long, value_name = "INVENTORY")]
        inventory: Option<PathBuf>,

        /// Use the public address for hosts whose name contains PAT
        #[arg(long, value_name = "PAT")]
        public: Option<String>,

        /// Tag value to append to each line (repeatable, in order)
        #[arg(short = 't', long = "tag", value_name = "TAG")]
        tags: Vec<String>,

        /// Instance filter (repeatable)
        #[arg(long = "filter", value_name = "KEY=VALUE")]
        filters: Vec<String>,

        /// Tag filter (repeatable)
        #[arg(long = "tag-filter", value_name = "KEY=VALUE")]
        tag_filters: Vec<String>,

        /// Drop hosts whose name contains PAT
        #[arg(long, value_name = "PAT")]
        exclude: Option<String>,

        /// Publish invalid host names under the instance id instead of skipping them
        #[arg(long)]
        allow_invalid_names: bool,
    },

    /// Delete a named block
    Remove {
        /// Block name
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Delete every managed block
    RemoveAll,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sync_with_repeated_flags() {
        let cli = Cli::try_parse_from([
            "ec2hosts",
            "-f",
            "/tmp/hosts",
            "sync",
            "-n",
            "app",
            "-i",
            "inv.json",
            "-t",
            "Role",
            "-t",
            "Env",
            "--filter",
            "vpc-id=vpc-1",
            "--dry-run",
        ])
        .unwrap();

        assert_eq!(cli.global.file, Some(PathBuf::from("/tmp/hosts")));
        assert!(cli.global.dry_run);
        match cli.command {
            Commands::Sync {
                name,
                tags,
                filters,
                ..
            } => {
                assert_eq!(name.as_deref(), Some("app"));
                assert_eq!(tags, vec!["Role", "Env"]);
                assert_eq!(filters, vec!["vpc-id=vpc-1"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_diff_conflicts_with_json() {
        let result = Cli::try_parse_from(["ec2hosts", "--diff", "--json", "remove-all"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_command_is_required() {
        assert!(Cli::try_parse_from(["ec2hosts"]).is_err());
    }
}
