//! Record and inventory builders.

use ec2hosts_blocks::{Record, RecordSet};
use serde_json::{Value, json};

/// A record with a private address and type `t2.micro`.
pub fn record(id: &str, name: &str, private_address: &str) -> Record {
    Record::new(id, name, "t2.micro").with_private_address(private_address)
}

/// `web1`/`web2` with ids `i-1`/`i-2` at the given private addresses.
pub fn web_pair(first: &str, second: &str) -> RecordSet {
    RecordSet::new(vec![
        record("i-1", "web1", first),
        record("i-2", "web2", second),
    ])
}

/// One instance entry of a `DescribeInstances` document.
pub struct InventoryInstance<'a> {
    pub id: &'a str,
    pub name: Option<&'a str>,
    pub kind: &'a str,
    pub private_address: &'a str,
    pub public_address: Option<&'a str>,
    pub state: &'a str,
    pub tags: &'a [(&'a str, &'a str)],
}

impl<'a> InventoryInstance<'a> {
    /// A running `t2.micro` named `name`.
    pub fn running(id: &'a str, name: &'a str, private_address: &'a str) -> Self {
        Self {
            id,
            name: Some(name),
            kind: "t2.micro",
            private_address,
            public_address: None,
            state: "running",
            tags: &[],
        }
    }

    fn to_json(&self) -> Value {
        let mut tags: Vec<Value> = self
            .name
            .map(|n| vec![json!({"Key": "Name", "Value": n})])
            .unwrap_or_default();
        tags.extend(
            self.tags
                .iter()
                .map(|(k, v)| json!({"Key": k, "Value": v})),
        );

        let mut instance = json!({
            "InstanceId": self.id,
            "InstanceType": self.kind,
            "PrivateIpAddress": self.private_address,
            "State": {"Name": self.state},
            "Tags": tags,
        });
        if let Some(public) = self.public_address {
            instance["PublicIpAddress"] = json!(public);
        }
        instance
    }
}

/// A single-page `DescribeInstances` document.
pub fn inventory_json(instances: &[InventoryInstance<'_>]) -> String {
    let instances: Vec<Value> = instances.iter().map(InventoryInstance::to_json).collect();
    json!({"Reservations": [{"Instances": instances}]}).to_string()
}

/// A paged document, one page per slice.
pub fn paged_inventory_json(pages: &[&[InventoryInstance<'_>]]) -> String {
    let pages: Vec<Value> = pages
        .iter()
        .map(|page| {
            let instances: Vec<Value> = page.iter().map(InventoryInstance::to_json).collect();
            json!({"Reservations": [{"Instances": instances}]})
        })
        .collect();
    Value::Array(pages).to_string()
}
