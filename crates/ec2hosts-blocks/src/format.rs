//! Rendering records into hosts lines.
//!
//! Line layout:
//! ```text
//! <address> <name> # <id> <kind> [<zone>] [<attr1> <attr2> ...]
//! ```
//! Everything after `#` is a comment as far as the resolver is concerned,
//! so the number of trailing fields may vary from line to line.

use crate::record::Record;

/// Chooses which address a record is published under.
///
/// With a public pattern configured, a record whose *own name* contains
/// the pattern gets its public address; every other record gets its
/// private address, even when the whole block is meant for public hosts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressPolicy {
    public_pattern: Option<String>,
}

impl AddressPolicy {
    /// Always use private addresses.
    pub fn private_only() -> Self {
        Self::default()
    }

    /// Use the public address for records whose name contains `pattern`.
    ///
    /// An empty pattern is the same as [`AddressPolicy::private_only`].
    pub fn public_when_name_contains(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        Self {
            public_pattern: (!pattern.is_empty()).then_some(pattern),
        }
    }

    pub fn public_pattern(&self) -> Option<&str> {
        self.public_pattern.as_deref()
    }

    pub fn select<'r>(&self, record: &'r Record) -> &'r str {
        match &self.public_pattern {
            Some(pattern) if record.name.contains(pattern.as_str()) => &record.public_address,
            _ => &record.private_address,
        }
    }
}

/// Formats one record as a hosts line (without newline).
///
/// # Example
/// ```
/// use ec2hosts_blocks::{Record, format_line};
///
/// let record = Record::new("i-1", "web1", "t2.micro").with_zone("eu-west-1a");
/// assert_eq!(
///     format_line("10.0.0.1", &record, &["Role"]),
///     "10.0.0.1 web1 # i-1 t2.micro eu-west-1a"
/// );
/// ```
pub fn format_line<S: AsRef<str>>(address: &str, record: &Record, columns: &[S]) -> String {
    let mut line = format!(
        "{} {} # {} {}",
        address, record.name, record.id, record.kind
    );

    if let Some(zone) = record.zone.as_deref().filter(|z| !z.is_empty()) {
        line.push(' ');
        line.push_str(zone);
    }

    for (_, value) in record.columns(columns) {
        line.push(' ');
        line.push_str(value);
    }

    line
}

/// Appends one newline-terminated line per record, in set order.
pub(crate) fn render_records<'a, I, S>(
    out: &mut Vec<u8>,
    records: I,
    policy: &AddressPolicy,
    columns: &[S],
) where
    I: IntoIterator<Item = &'a Record>,
    S: AsRef<str>,
{
    for record in records {
        let address = policy.select(record);
        out.extend_from_slice(format_line(address, record, columns).as_bytes());
        out.push(b'\n');
    }
}
