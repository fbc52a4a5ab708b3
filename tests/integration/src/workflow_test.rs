//! Inventory to hosts file and back, across all library crates.

use ec2hosts_blocks::AddressPolicy;
use ec2hosts_core::{
    BackupPolicy, GatedWriter, InventoryFile, Operation, Query, SyncEngine, fetch_records,
};
use ec2hosts_fs::WriteMode;
use ec2hosts_test_utils::hosts::TestHosts;
use ec2hosts_test_utils::inventory::{InventoryInstance, inventory_json};
use pretty_assertions::assert_eq;
use std::num::NonZeroUsize;

const BASE: &str = "127.0.0.1 localhost\n::1 localhost\n";

fn sync_from(hosts: &TestHosts, instances: &[InventoryInstance<'_>]) -> Operation {
    let path = hosts.write_file("instances.json", &inventory_json(instances));
    let inventory = InventoryFile::load(&path).unwrap();
    Operation::Synchronize {
        name: "cluster".into(),
        records: fetch_records(&inventory, &Query::default()).unwrap(),
        policy: AddressPolicy::private_only(),
        columns: Vec::new(),
    }
}

#[test]
fn test_full_lifecycle_with_atomic_writes() {
    let hosts = TestHosts::with_content(BASE);
    let engine = SyncEngine::new(
        hosts.path(),
        GatedWriter::new(
            BackupPolicy::Keep(NonZeroUsize::new(5).unwrap()),
            WriteMode::Atomic,
        ),
    );

    let install = sync_from(
        &hosts,
        &[
            InventoryInstance::running("i-1", "node1", "10.1.0.1"),
            InventoryInstance::running("i-2", "node2", "10.1.0.2"),
        ],
    );
    assert!(engine.run(&install, false).unwrap().changed);
    assert_eq!(
        hosts.read(),
        format!(
            "{BASE}\n# START EC2HOSTS - cluster #\n10.1.0.1 node1 # i-1 t2.micro\n10.1.0.2 node2 # i-2 t2.micro\n# END EC2HOSTS - cluster #\n"
        )
    );

    // Hand edits after the block are preserved by later syncs
    hosts.overwrite(&format!("{}10.9.9.9 manual\n", hosts.read()));
    let update = sync_from(
        &hosts,
        &[InventoryInstance::running("i-3", "node3", "10.1.0.3")],
    );
    engine.run(&update, false).unwrap();
    assert_eq!(
        hosts.read(),
        format!(
            "{BASE}\n# START EC2HOSTS - cluster #\n10.1.0.3 node3 # i-3 t2.micro\n# END EC2HOSTS - cluster #\n10.9.9.9 manual\n"
        )
    );

    engine.run(&Operation::RemoveAll, false).unwrap();
    assert_eq!(hosts.read(), format!("{BASE}\n10.9.9.9 manual\n"));
    // Backups taken within the same second share a name
    let backups = hosts.backups();
    assert!(!backups.is_empty() && backups.len() <= 3);
}
