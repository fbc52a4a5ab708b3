//! Inventory records and the sorted set a block is rendered from

use std::collections::BTreeMap;

/// One inventory entry as supplied by the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Stable identifier, e.g. `i-0abc123`.
    pub id: String,
    /// Host name written into the block; also the sort key.
    pub name: String,
    /// Machine class, e.g. `t3.micro`.
    pub kind: String,
    pub private_address: String,
    pub public_address: String,
    /// Locality descriptor such as an availability zone.
    pub zone: Option<String>,
    /// Named string attributes (tags), available as optional columns.
    pub attributes: BTreeMap<String, String>,
}

impl Record {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: kind.into(),
            private_address: String::new(),
            public_address: String::new(),
            zone: None,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_private_address(mut self, address: impl Into<String>) -> Self {
        self.private_address = address.into();
        self
    }

    pub fn with_public_address(mut self, address: impl Into<String>) -> Self {
        self.public_address = address.into();
        self
    }

    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Value of a named attribute, treating empty values as absent.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// The requested columns that this record actually has, in request order.
    pub fn columns<'a, S: AsRef<str>>(&'a self, names: &'a [S]) -> Vec<(&'a str, &'a str)> {
        names
            .iter()
            .filter_map(|name| {
                let name = name.as_ref();
                self.attribute(name).map(|value| (name, value))
            })
            .collect()
    }
}

/// Records sorted ascending by name.
///
/// The sort is stable, so records sharing a name keep the order the
/// directory returned them in. There is no way to mutate a set after
/// construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    records: Vec<Record>,
}

impl RecordSet {
    pub fn new(mut records: Vec<Record>) -> Self {
        records.sort_by(|a, b| a.name.cmp(&b.name));
        Self { records }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn as_slice(&self) -> &[Record] {
        &self.records
    }
}

impl FromIterator<Record> for RecordSet {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_set_sorts_by_name() {
        let set = RecordSet::new(vec![
            Record::new("i-3", "web3", "t2.micro"),
            Record::new("i-1", "db1", "t2.micro"),
            Record::new("i-2", "web10", "t2.micro"),
        ]);
        let names: Vec<_> = set.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["db1", "web10", "web3"]);
    }

    #[test]
    fn test_record_set_sort_is_stable() {
        let set: RecordSet = vec![
            Record::new("i-b", "same", "t2.micro"),
            Record::new("i-a", "same", "t2.micro"),
        ]
        .into_iter()
        .collect();
        let ids: Vec<_> = set.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["i-b", "i-a"]);
    }

    #[test]
    fn test_empty_attribute_is_absent() {
        let record = Record::new("i-1", "web1", "t2.micro")
            .with_attribute("Role", "")
            .with_attribute("Env", "prod");
        assert_eq!(record.attribute("Role"), None);
        assert_eq!(record.attribute("Env"), Some("prod"));
        assert_eq!(record.attribute("Missing"), None);
    }

    #[test]
    fn test_columns_follow_request_order_and_skip_absent() {
        let record = Record::new("i-1", "web1", "t2.micro")
            .with_attribute("Env", "prod")
            .with_attribute("Role", "web");
        let columns = record.columns(&["Role", "Owner", "Env"]);
        assert_eq!(columns, vec![("Role", "web"), ("Env", "prod")]);
    }
}
