//! Marker grammar for managed blocks.
//!
//! Markers are whole lines of the form:
//! ```text
//! # START EC2HOSTS - {name} #
//! # END EC2HOSTS - {name} #
//! ```
//! The name is free-form. Recognition is anchored to the full line so a
//! hosts entry that merely mentions the tag never matches.

use regex::bytes::Regex;
use std::sync::LazyLock;

/// Literal tag separating this tool's markers from unrelated comments.
pub const TAG: &str = "EC2HOSTS";

static ANY_START_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)^# START EC2HOSTS - (.+) #$").expect("Invalid start marker regex")
});

static ANY_END_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)^# END EC2HOSTS - (.+) #$").expect("Invalid end marker regex")
});

/// Creates the start marker line for a block (without newline).
///
/// # Example
/// ```
/// use ec2hosts_blocks::marker::start_marker;
///
/// assert_eq!(start_marker("app"), "# START EC2HOSTS - app #");
/// ```
pub fn start_marker(name: &str) -> String {
    format!("# START {} - {} #", TAG, name)
}

/// Creates the end marker line for a block (without newline).
pub fn end_marker(name: &str) -> String {
    format!("# END {} - {} #", TAG, name)
}

/// True if `line` is a start marker for any block name.
pub fn is_any_start(line: &[u8]) -> bool {
    ANY_START_REGEX.is_match(line)
}

/// True if `line` is an end marker for any block name.
pub fn is_any_end(line: &[u8]) -> bool {
    ANY_END_REGEX.is_match(line)
}

/// Extracts the block name from a start or end marker line.
pub(crate) fn marker_name(line: &[u8]) -> Option<String> {
    ANY_START_REGEX
        .captures(line)
        .or_else(|| ANY_END_REGEX.captures(line))
        .and_then(|caps| caps.get(1))
        .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
}

/// The two marker literals of one named block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockMarkers {
    pub name: String,
    pub start: String,
    pub end: String,
}

impl BlockMarkers {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            start: start_marker(name),
            end: end_marker(name),
        }
    }

    pub fn matches_start(&self, line: &[u8]) -> bool {
        line == self.start.as_bytes()
    }

    pub fn matches_end(&self, line: &[u8]) -> bool {
        line == self.end.as_bytes()
    }
}
