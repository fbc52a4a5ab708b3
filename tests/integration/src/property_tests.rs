//! Properties of the block operations over generated hosts files.

use ec2hosts_blocks::{
    AddressPolicy, Error, Record, RecordSet, end_marker, remove, remove_all, start_marker,
    synchronize,
};
use proptest::prelude::*;

const NO_COLUMNS: [&str; 0] = [];

/// Unmanaged lines: no `#`, so never a marker.
fn plain_lines() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z0-9. ]{0,24}", 0..12)
}

fn to_file(lines: &[String]) -> String {
    lines.iter().map(|l| format!("{}\n", l)).collect()
}

fn records() -> impl Strategy<Value = RecordSet> {
    prop::collection::vec(("[a-z][a-z0-9-]{0,8}", 1u8..255, 1u8..255), 0..6).prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(i, (name, a, b))| {
                Record::new(format!("i-{}", i), name, "t3.micro")
                    .with_private_address(format!("10.0.{}.{}", a, b))
                    .with_public_address(format!("54.0.{}.{}", a, b))
            })
            .collect()
    })
}

fn sync(input: &[u8], records: &RecordSet, name: &str) -> Vec<u8> {
    synchronize(input, records, name, &AddressPolicy::private_only(), &NO_COLUMNS).unwrap()
}

proptest! {
    #[test]
    fn test_synchronize_is_idempotent(lines in plain_lines(), set in records(), name in "[a-z]{1,6}") {
        let input = to_file(&lines);
        let once = sync(input.as_bytes(), &set, &name);
        let twice = sync(&once, &set, &name);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_lines_outside_block_survive(lines in plain_lines(), set in records(), name in "[a-z]{1,6}") {
        let input = to_file(&lines);
        let output = String::from_utf8(sync(input.as_bytes(), &set, &name)).unwrap();

        // Everything before the appended block is the input, untouched
        let closes_with_end_marker = output.ends_with(&format!("{}\n", end_marker(&name)));
        prop_assert!(output.starts_with(&input));
        prop_assert!(closes_with_end_marker);
    }

    #[test]
    fn test_remove_all_undoes_synchronize(lines in plain_lines(), set in records(), name in "[a-z]{1,6}") {
        let input = to_file(&lines);
        let synced = sync(input.as_bytes(), &set, &name);
        let stripped = remove_all(synced.as_slice()).unwrap();

        // Only the separator line written ahead of a new block remains
        prop_assert_eq!(String::from_utf8(stripped).unwrap(), format!("{}\n", input));
    }

    #[test]
    fn test_remove_unknown_name_is_identity(lines in plain_lines(), set in records()) {
        let input = to_file(&lines);
        let synced = sync(input.as_bytes(), &set, "alpha");
        let output = remove(synced.as_slice(), "beta").unwrap();
        prop_assert_eq!(output, synced);
    }

    #[test]
    fn test_blocks_are_isolated(
        lines in plain_lines(),
        first in records(),
        second in records(),
        replacement in records(),
    ) {
        let input = to_file(&lines);
        let with_a = sync(input.as_bytes(), &first, "aaa");
        let with_both = sync(&with_a, &second, "bbb");

        let text = String::from_utf8(with_both.clone()).unwrap();
        let b_start = text.find(&start_marker("bbb")).unwrap();
        let b_block = text[b_start..].to_string();

        let resynced = String::from_utf8(sync(&with_both, &replacement, "aaa")).unwrap();
        prop_assert!(resynced.ends_with(&b_block));

        let removed = String::from_utf8(remove(resynced.as_bytes(), "aaa").unwrap()).unwrap();
        prop_assert!(!removed.contains(&start_marker("aaa")));
        prop_assert!(removed.ends_with(&b_block));
    }

    #[test]
    fn test_duplicate_start_is_rejected(lines in plain_lines(), name in "[a-z]{1,6}") {
        let mut input = to_file(&lines);
        let start = start_marker(&name);
        input.push_str(&format!("{start}\n{start}\n{}\n", end_marker(&name)));
        let expected_line = lines.len() + 2;

        let synced = synchronize(
            input.as_bytes(),
            &RecordSet::default(),
            &name,
            &AddressPolicy::private_only(),
            &NO_COLUMNS,
        );
        let sync_err = synced.unwrap_err().into_error();
        let at_second_start =
            matches!(sync_err, Error::MalformedMarker { line, .. } if line == expected_line);
        prop_assert!(at_second_start, "unexpected error: {:?}", sync_err);

        let removed = remove(input.as_bytes(), &name);
        let remove_err = removed.unwrap_err().into_error();
        let malformed = matches!(remove_err, Error::MalformedMarker { .. });
        prop_assert!(malformed, "unexpected error: {:?}", remove_err);
    }
}
