//! Directory lookup: where block records come from.
//!
//! A [`Directory`] hands out raw [`Instance`] pages. [`fetch_records`]
//! follows continuation tokens until the directory runs dry, derives each
//! record's host name, drops what the query excludes and returns a
//! sorted [`RecordSet`].

mod inventory;

pub use inventory::InventoryFile;

use ec2hosts_blocks::{Record, RecordSet};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::{FilterSet, Result};

/// Host names must be plain DNS labels.
static HOST_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]+$").expect("Invalid host name regex"));

/// Tag holding the record's host name.
pub const NAME_TAG: &str = "Name";

/// What to do with an instance whose name is not a valid host name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidNames {
    /// Leave the instance out of the record set.
    #[default]
    Skip,
    /// Publish it under its identifier instead.
    UseId,
}

/// Parameters of one directory lookup.
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Directory-side filters such as `vpc-id` or `instance-type`.
    pub filters: FilterSet,
    /// Tag filters, matched as `tag:<key>`.
    pub tag_filters: FilterSet,
    /// Records whose name contains this substring are dropped.
    pub exclude: Option<String>,
    pub invalid_names: InvalidNames,
}

impl Query {
    fn excludes(&self, name: &str) -> bool {
        match self.exclude.as_deref() {
            Some(pattern) if !pattern.is_empty() => name.contains(pattern),
            _ => false,
        }
    }
}

/// One page of a directory listing.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub instances: Vec<Instance>,
    /// Present when more pages follow.
    pub next_token: Option<String>,
}

/// A source of instances.
pub trait Directory {
    /// Fetch the page identified by `token`, or the first page for `None`.
    ///
    /// Only running instances matching `query.filters` and
    /// `query.tag_filters` are returned.
    fn fetch_page(&self, query: &Query, token: Option<&str>) -> Result<Page>;
}

/// Runs a complete lookup and returns the sorted record set.
pub fn fetch_records<D: Directory + ?Sized>(directory: &D, query: &Query) -> Result<RecordSet> {
    let mut records = Vec::new();
    let mut token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = directory.fetch_page(query, token.as_deref())?;
        pages += 1;

        for instance in page.instances {
            if let Some(record) = instance.into_record(query) {
                records.push(record);
            }
        }

        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    tracing::debug!(pages, records = records.len(), "Directory lookup complete");
    Ok(RecordSet::new(records))
}

/// Escapes a tag value the way a URL query component is escaped.
fn query_escape(value: &str) -> String {
    urlencoding::encode(value).replace("%20", "+")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Placement {
    #[serde(default)]
    pub availability_zone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceState {
    pub name: String,
}

/// A raw directory entry, shaped like an EC2 `DescribeInstances` instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Instance {
    pub instance_id: String,
    #[serde(default)]
    pub instance_type: String,
    #[serde(default)]
    pub private_ip_address: Option<String>,
    #[serde(default)]
    pub public_ip_address: Option<String>,
    #[serde(default)]
    pub placement: Option<Placement>,
    #[serde(default)]
    pub state: Option<InstanceState>,
    #[serde(default)]
    pub vpc_id: Option<String>,
    #[serde(default)]
    pub subnet_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Instance {
    /// Escaped value of the first tag with this key, empty values excluded.
    pub fn tag(&self, key: &str) -> Option<String> {
        self.tags
            .iter()
            .find(|t| t.key == key)
            .map(|t| query_escape(&t.value))
            .filter(|v| !v.is_empty())
    }

    /// Raw, unescaped value of the first tag with this key.
    pub fn raw_tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.value.as_str())
    }

    /// The `Name` tag, or the instance id when there is none.
    pub fn name(&self) -> String {
        self.tag(NAME_TAG)
            .unwrap_or_else(|| self.instance_id.clone())
    }

    pub fn zone(&self) -> Option<&str> {
        self.placement
            .as_ref()
            .and_then(|p| p.availability_zone.as_deref())
            .filter(|z| !z.is_empty())
    }

    pub fn state_name(&self) -> Option<&str> {
        self.state.as_ref().map(|s| s.name.as_str())
    }

    /// Converts into a record, or `None` when the query filters it out.
    fn into_record(self, query: &Query) -> Option<Record> {
        let mut name = self.name();
        if !HOST_NAME_REGEX.is_match(&name) {
            match query.invalid_names {
                InvalidNames::Skip => {
                    tracing::debug!(id = %self.instance_id, name = %name, "Skipping invalid host name");
                    return None;
                }
                InvalidNames::UseId => name = self.instance_id.clone(),
            }
        }
        if query.excludes(&name) {
            tracing::debug!(id = %self.instance_id, name = %name, "Excluded by pattern");
            return None;
        }

        let mut record = Record::new(self.instance_id.as_str(), name, self.instance_type.as_str())
            .with_private_address(self.private_ip_address.clone().unwrap_or_default())
            .with_public_address(self.public_ip_address.clone().unwrap_or_default());
        if let Some(zone) = self.zone() {
            record = record.with_zone(zone);
        }
        for tag in &self.tags {
            if !record.attributes.contains_key(&tag.key) {
                record = record.with_attribute(tag.key.as_str(), query_escape(&tag.value));
            }
        }
        Some(record)
    }
}
