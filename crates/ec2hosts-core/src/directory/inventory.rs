//! Offline directory backed by a `DescribeInstances` JSON document.
//!
//! The file holds either one response object or an array of response
//! objects, one per page:
//!
//! ```json
//! {"Reservations": [{"Instances": [{"InstanceId": "i-1", "InstanceType": "t3.micro",
//!   "PrivateIpAddress": "10.0.0.1", "State": {"Name": "running"},
//!   "Tags": [{"Key": "Name", "Value": "web1"}]}]}]}
//! ```
//!
//! Filters are evaluated locally. Pages are addressed by their index, so
//! the continuation token is the next index and any `NextToken` in the
//! document itself is ignored.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{Directory, Instance, Page, Query};
use crate::{Error, Result};

/// Filter names understood by [`InventoryFile`].
pub const SUPPORTED_FILTERS: &[&str] = &[
    "instance-state-name",
    "instance-type",
    "instance-id",
    "availability-zone",
    "vpc-id",
    "subnet-id",
    "private-ip-address",
    "ip-address",
];

/// State every returned instance must be in.
const RUNNING: &str = "running";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Reservation {
    #[serde(default)]
    instances: Vec<Instance>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Response {
    #[serde(default)]
    reservations: Vec<Reservation>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Document {
    Paged(Vec<Response>),
    Single(Response),
}

/// A directory read from an inventory file.
#[derive(Debug, Clone)]
pub struct InventoryFile {
    path: PathBuf,
    pages: Vec<Vec<Instance>>,
}

impl InventoryFile {
    /// Read and parse the inventory at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = ec2hosts_fs::io::read_bytes(path)?;
        Self::from_slice(path, &bytes)
    }

    /// Parse an inventory document already in memory.
    ///
    /// `path` is only used in error messages.
    pub fn from_slice(path: impl Into<PathBuf>, bytes: &[u8]) -> Result<Self> {
        let path = path.into();
        let document: Document = serde_json::from_slice(bytes).map_err(|e| Error::Inventory {
            path: path.clone(),
            message: e.to_string(),
        })?;

        let responses = match document {
            Document::Paged(responses) => responses,
            Document::Single(response) => vec![response],
        };
        let pages = responses
            .into_iter()
            .map(|r| {
                r.reservations
                    .into_iter()
                    .flat_map(|res| res.instances)
                    .collect()
            })
            .collect::<Vec<Vec<Instance>>>();

        tracing::debug!(path = %path.display(), pages = pages.len(), "Loaded inventory");
        Ok(Self { path, pages })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn validate(query: &Query) -> Result<()> {
        for (name, _) in query.filters.iter() {
            if !SUPPORTED_FILTERS.contains(&name) {
                return Err(Error::InvalidFilter {
                    filter: name.to_string(),
                    reason: format!(
                        "unsupported filter name (supported: {})",
                        SUPPORTED_FILTERS.join(", ")
                    ),
                });
            }
        }
        Ok(())
    }

    fn attribute<'a>(instance: &'a Instance, filter: &str) -> Option<&'a str> {
        match filter {
            // Hand-written inventories often omit the state
            "instance-state-name" => Some(instance.state_name().unwrap_or(RUNNING)),
            "instance-type" => Some(instance.instance_type.as_str()),
            "instance-id" => Some(instance.instance_id.as_str()),
            "availability-zone" => instance.zone(),
            "vpc-id" => instance.vpc_id.as_deref(),
            "subnet-id" => instance.subnet_id.as_deref(),
            "private-ip-address" => instance.private_ip_address.as_deref(),
            "ip-address" => instance.public_ip_address.as_deref(),
            _ => None,
        }
    }

    fn matches(instance: &Instance, query: &Query) -> bool {
        if Self::attribute(instance, "instance-state-name") != Some(RUNNING) {
            return false;
        }
        let filters_match = query
            .filters
            .iter()
            .all(|(name, value)| Self::attribute(instance, name) == Some(value));
        let tags_match = query
            .tag_filters
            .iter()
            .all(|(key, value)| instance.raw_tag(key) == Some(value));
        filters_match && tags_match
    }
}

impl Directory for InventoryFile {
    fn fetch_page(&self, query: &Query, token: Option<&str>) -> Result<Page> {
        Self::validate(query)?;

        let index = match token {
            None => 0,
            Some(token) => token.parse::<usize>().map_err(|_| Error::Inventory {
                path: self.path.clone(),
                message: format!("invalid page token '{}'", token),
            })?,
        };

        // An empty document is one empty page
        let empty = Vec::new();
        let instances = match self.pages.get(index) {
            Some(page) => page,
            None if index == 0 => &empty,
            None => {
                return Err(Error::Inventory {
                    path: self.path.clone(),
                    message: format!("page {} out of range", index),
                });
            }
        };

        let instances: Vec<Instance> = instances
            .iter()
            .filter(|i| Self::matches(i, query))
            .cloned()
            .collect();
        let next_token = (index + 1 < self.pages.len()).then(|| (index + 1).to_string());

        Ok(Page {
            instances,
            next_token,
        })
    }
}
