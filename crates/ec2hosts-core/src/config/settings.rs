//! File-backed settings

use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use ec2hosts_blocks::AddressPolicy;
use ec2hosts_fs::{ConfigStore, WriteMode};
use serde::{Deserialize, Serialize};

use crate::backup::BackupPolicy;
use crate::directory::{InvalidNames, Query};
use crate::writer::GatedWriter;
use crate::{Error, FilterSet, Result};

/// Target file when none is configured.
pub const DEFAULT_HOSTS_FILE: &str = "/etc/hosts";

/// `[backup]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackupSettings {
    pub enabled: bool,
    /// Backups to retain; unset keeps all. Zero is rejected.
    pub keep: Option<usize>,
}

impl BackupSettings {
    pub fn policy(&self) -> Result<BackupPolicy> {
        if !self.enabled {
            return Ok(BackupPolicy::Disabled);
        }
        match self.keep {
            None => Ok(BackupPolicy::KeepAll),
            Some(keep) => NonZeroUsize::new(keep)
                .map(BackupPolicy::Keep)
                .ok_or_else(|| Error::ConfigInvalid {
                    message: "backup.keep must be at least 1; set backup.enabled = false to disable backups".into(),
                }),
        }
    }
}

/// Everything one run needs to know.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// File holding the managed block.
    pub file: Option<PathBuf>,
    /// Block name.
    pub name: Option<String>,
    /// Records whose name contains this use their public address.
    pub public: Option<String>,
    /// Attribute columns appended to each line, in order.
    pub tags: Vec<String>,
    pub exclude: Option<String>,
    /// Inventory document to read records from.
    pub inventory: Option<PathBuf>,
    /// Publish invalid host names under the instance id instead of skipping them.
    pub allow_invalid_names: bool,
    pub write_mode: WriteMode,
    pub filters: BTreeMap<String, String>,
    pub tag_filters: BTreeMap<String, String>,
    pub backup: BackupSettings,
}

impl Settings {
    /// Load settings from a config file.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(ConfigStore::new().load(path)?)
    }

    pub fn target_file(&self) -> PathBuf {
        self.file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HOSTS_FILE))
    }

    /// The block name, which every name-scoped operation requires.
    pub fn block_name(&self) -> Result<&str> {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => Ok(name),
            _ => Err(Error::ConfigInvalid {
                message: "a block name is required".into(),
            }),
        }
    }

    pub fn address_policy(&self) -> AddressPolicy {
        match self.public.as_deref() {
            Some(pattern) => AddressPolicy::public_when_name_contains(pattern),
            None => AddressPolicy::private_only(),
        }
    }

    /// The directory query.
    ///
    /// # Errors
    /// [`Error::InvalidFilter`] when a configured filter has an empty key or value.
    pub fn query(&self) -> Result<Query> {
        Ok(Query {
            filters: FilterSet::from_map(&self.filters)?,
            tag_filters: FilterSet::from_map(&self.tag_filters)?,
            exclude: self.exclude.clone(),
            invalid_names: if self.allow_invalid_names {
                InvalidNames::UseId
            } else {
                InvalidNames::Skip
            },
        })
    }

    pub fn writer(&self) -> Result<GatedWriter> {
        Ok(GatedWriter::new(self.backup.policy()?, self.write_mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.target_file(), PathBuf::from("/etc/hosts"));
        assert_eq!(settings.write_mode, WriteMode::Truncate);
        assert_eq!(settings.backup.policy().unwrap(), BackupPolicy::Disabled);
        assert!(settings.block_name().is_err());
    }

    #[test]
    fn test_backup_policies() {
        let keep_all = BackupSettings {
            enabled: true,
            keep: None,
        };
        assert_eq!(keep_all.policy().unwrap(), BackupPolicy::KeepAll);

        let keep_three = BackupSettings {
            enabled: true,
            keep: Some(3),
        };
        assert_eq!(keep_three.policy().unwrap().retain(), Some(3));

        let disabled = BackupSettings {
            enabled: false,
            keep: Some(0),
        };
        assert_eq!(disabled.policy().unwrap(), BackupPolicy::Disabled);
    }

    #[test]
    fn test_zero_retention_is_rejected() {
        let settings = BackupSettings {
            enabled: true,
            keep: Some(0),
        };
        assert!(matches!(settings.policy(), Err(Error::ConfigInvalid { .. })));
    }

    #[test]
    fn test_load_full_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ec2hosts.toml");
        fs::write(
            &path,
            r#"
file = "/tmp/hosts"
name = "app"
public = "bastion"
tags = ["Role", "Env"]
exclude = "tmp"
inventory = "instances.json"
write_mode = "atomic"

[filters]
vpc-id = "vpc-123"

[tag_filters]
Env = "prod"

[backup]
enabled = true
keep = 5
"#,
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.block_name().unwrap(), "app");
        assert_eq!(settings.write_mode, WriteMode::Atomic);
        assert_eq!(settings.tags, vec!["Role", "Env"]);
        assert_eq!(settings.address_policy().public_pattern(), Some("bastion"));

        let query = settings.query().unwrap();
        assert_eq!(query.filters.get("vpc-id"), Some("vpc-123"));
        assert_eq!(query.tag_filters.get("Env"), Some("prod"));
        assert_eq!(query.exclude.as_deref(), Some("tmp"));
        assert_eq!(query.invalid_names, InvalidNames::Skip);

        let writer = settings.writer().unwrap();
        assert_eq!(writer.backup_policy().retain(), Some(5));
    }

    #[test]
    fn test_empty_configured_tag_filter_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ec2hosts.toml");
        fs::write(&path, "name = \"app\"\n\n[tag_filters]\nEnv = \"\"\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        let result = settings.query();
        assert!(matches!(result, Err(Error::InvalidFilter { ref filter, .. }) if filter == "Env="));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ec2hosts.toml");
        fs::write(&path, "nmae = \"typo\"\n").unwrap();
        assert!(matches!(Settings::load(&path), Err(Error::Fs(_))));
    }
}
