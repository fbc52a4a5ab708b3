//! Settings for ec2hosts runs
//!
//! Settings come from an optional config file (TOML, JSON or YAML) and
//! are then overridden by command-line flags. Unset values fall back to
//! the defaults defined here.

mod settings;

pub use settings::{BackupSettings, DEFAULT_HOSTS_FILE, Settings};
