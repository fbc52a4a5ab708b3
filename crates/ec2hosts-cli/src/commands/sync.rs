//! Sync command implementation

use std::path::PathBuf;

use ec2hosts_core::{FilterSet, InventoryFile, Operation, Settings, fetch_records};

use crate::cli::GlobalArgs;
use crate::error::{CliError, Result};

use super::{execute, resolve_settings};

/// Sync-specific flags, applied over the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncArgs {
    pub name: Option<String>,
    pub inventory: Option<PathBuf>,
    pub public: Option<String>,
    pub tags: Vec<String>,
    pub filters: Vec<String>,
    pub tag_filters: Vec<String>,
    pub exclude: Option<String>,
    pub allow_invalid_names: bool,
}

impl SyncArgs {
    /// Merge into `settings`. Filters are validated here, before any file is read.
    fn apply(self, settings: &mut Settings) -> Result<()> {
        let filters = FilterSet::parse(&self.filters)?;
        let tag_filters = FilterSet::parse(&self.tag_filters)?;

        if let Some(name) = self.name {
            settings.name = Some(name);
        }
        if let Some(inventory) = self.inventory {
            settings.inventory = Some(inventory);
        }
        if let Some(public) = self.public {
            settings.public = Some(public);
        }
        if !self.tags.is_empty() {
            settings.tags = self.tags;
        }
        if let Some(exclude) = self.exclude {
            settings.exclude = Some(exclude);
        }
        if self.allow_invalid_names {
            settings.allow_invalid_names = true;
        }
        for (key, value) in filters.iter() {
            settings.filters.insert(key.to_string(), value.to_string());
        }
        for (key, value) in tag_filters.iter() {
            settings.tag_filters.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }
}

/// Regenerate the named block from the inventory.
pub fn run_sync(global: &GlobalArgs, args: SyncArgs) -> Result<()> {
    let mut settings = resolve_settings(global)?;
    args.apply(&mut settings)?;

    let name = settings
        .block_name()
        .map_err(|_| CliError::user("a block name is required (use --name or set `name` in the config)"))?
        .to_string();
    let inventory = settings.inventory.clone().ok_or_else(|| {
        CliError::user("an inventory is required (use --inventory or set `inventory` in the config)")
    })?;

    let directory = InventoryFile::load(&inventory)?;
    let records = fetch_records(&directory, &settings.query()?)?;
    tracing::debug!(name = %name, records = records.len(), "Fetched records");

    let operation = Operation::Synchronize {
        name,
        records,
        policy: settings.address_policy(),
        columns: settings.tags.clone(),
    };
    execute(global, &settings, &operation)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_extend_config_filters() {
        let mut settings = Settings::default();
        settings.filters.insert("vpc-id".into(), "vpc-old".into());
        settings.filters.insert("subnet-id".into(), "subnet-1".into());

        let args = SyncArgs {
            name: Some("app".into()),
            filters: vec!["vpc-id=vpc-new".into()],
            tag_filters: vec!["Env=prod".into()],
            ..Default::default()
        };
        args.apply(&mut settings).unwrap();

        assert_eq!(settings.name.as_deref(), Some("app"));
        assert_eq!(settings.filters["vpc-id"], "vpc-new");
        assert_eq!(settings.filters["subnet-id"], "subnet-1");
        assert_eq!(settings.tag_filters["Env"], "prod");
    }

    #[test]
    fn test_bad_filter_is_rejected() {
        let mut settings = Settings::default();
        let args = SyncArgs {
            filters: vec!["vpc-id".into()],
            ..Default::default()
        };
        let result = args.apply(&mut settings);
        assert!(matches!(
            result,
            Err(CliError::Core(ec2hosts_core::Error::InvalidFilter { .. }))
        ));
        assert!(settings.filters.is_empty());
    }

    #[test]
    fn test_tags_replace_configured_columns() {
        let mut settings = Settings {
            tags: vec!["Role".into()],
            ..Default::default()
        };
        let args = SyncArgs {
            tags: vec!["Env".into()],
            ..Default::default()
        };
        args.apply(&mut settings).unwrap();
        assert_eq!(settings.tags, vec!["Env"]);
    }
}
