//! `KEY=VALUE` filter sets

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Named filters passed to the directory.
///
/// Keys are unique; a later duplicate replaces an earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    entries: BTreeMap<String, String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `KEY=VALUE` strings.
    ///
    /// The value may itself contain `=`; only the first one splits.
    ///
    /// # Errors
    /// [`Error::InvalidFilter`] when a string has no `=`, or the key or
    /// value is empty.
    pub fn parse<I, S>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for item in items {
            let item = item.as_ref();
            let (key, value) = item.split_once('=').ok_or_else(|| Error::InvalidFilter {
                filter: item.to_string(),
                reason: "expected KEY=VALUE".into(),
            })?;
            let key = key.trim();
            check(item, key, value)?;
            set.insert(key, value);
        }
        Ok(set)
    }

    /// Build from a map read out of a settings file, applying the same
    /// key and value checks as [`FilterSet::parse`].
    pub fn from_map(entries: &BTreeMap<String, String>) -> Result<Self> {
        let mut set = Self::new();
        for (key, value) in entries {
            let key = key.trim();
            check(&format!("{}={}", key, value), key, value)?;
            set.insert(key, value.as_str());
        }
        Ok(set)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Adds every entry of `other`, replacing keys already present.
    pub fn extend(&mut self, other: FilterSet) {
        self.entries.extend(other.entries);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn check(filter: &str, key: &str, value: &str) -> Result<()> {
    let reason = if key.is_empty() {
        "empty key"
    } else if value.is_empty() {
        "empty value"
    } else {
        return Ok(());
    };
    Err(Error::InvalidFilter {
        filter: filter.to_string(),
        reason: reason.into(),
    })
}
