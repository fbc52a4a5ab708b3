//! Single-pass block editing.
//!
//! Each operation reads the input once, line by line, and folds an
//! explicit parse state over the lines while appending to an output
//! buffer. Lines are split on `\n`; a trailing `\r` is ignored when
//! comparing against markers but copied lines keep their bytes exactly.
//! Every emitted line ends with `\n`.

use std::io::BufRead;

use crate::error::{Aborted, Error, MarkerKind};
use crate::format::{AddressPolicy, render_records};
use crate::marker::{self, BlockMarkers};
use crate::record::RecordSet;

/// Parse state of [`synchronize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No start marker seen yet.
    Before,
    /// Inside the block opened at the given line.
    Inside { opened_at: usize },
    /// The block has been closed.
    After,
}

/// Parse state of [`remove`] and [`remove_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StripState {
    Outside,
    Inside { name: String, opened_at: usize },
}

/// One input line without its `\n`.
struct Line<'a> {
    number: usize,
    raw: &'a [u8],
}

impl Line<'_> {
    /// The line as compared against markers.
    fn content(&self) -> &[u8] {
        self.raw.strip_suffix(b"\r").unwrap_or(self.raw)
    }
}

fn emit(out: &mut Vec<u8>, line: &[u8]) {
    out.extend_from_slice(line);
    out.push(b'\n');
}

/// Folds `step` over every line of `input`, starting from `initial`.
///
/// Returns the final state with the produced buffer, or the first error
/// together with whatever had been produced up to that point.
fn fold_lines<R, S, F>(mut input: R, initial: S, mut step: F) -> Result<(S, Vec<u8>), Aborted>
where
    R: BufRead,
    F: FnMut(S, &Line<'_>, &mut Vec<u8>) -> Result<S, Error>,
{
    let mut out = Vec::new();
    let mut state = initial;
    let mut buf = Vec::new();
    let mut number = 0;

    loop {
        buf.clear();
        match input.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(source) => {
                return Err(Aborted::new(
                    Error::Read {
                        line: number + 1,
                        source,
                    },
                    out,
                ));
            }
        }
        number += 1;

        let line = Line {
            number,
            raw: buf.strip_suffix(b"\n").unwrap_or(&buf),
        };
        state = match step(state, &line, &mut out) {
            Ok(next) => next,
            Err(error) => return Err(Aborted::new(error, out)),
        };
    }

    Ok((state, out))
}

/// Regenerates the block `name` from `records`, installing it if absent.
///
/// The existing body, whatever it holds, is discarded and replaced by one
/// line per record. When the file has no such block, a blank separator
/// line and the full block are appended at the end. Running twice with
/// the same records yields identical output.
///
/// # Errors
/// - [`Error::MalformedMarker`] on a second start marker or a stray end marker
/// - [`Error::UnterminatedBlock`] when the block is never closed
/// - [`Error::Read`] when the input cannot be read
///
/// # Example
/// ```
/// use ec2hosts_blocks::{AddressPolicy, Record, RecordSet, synchronize};
///
/// let records = RecordSet::new(vec![
///     Record::new("i-1", "web1", "t2.micro").with_private_address("10.0.0.1"),
/// ]);
/// let columns: &[&str] = &[];
/// let out = synchronize(&b"127.0.0.1 localhost\n"[..], &records, "app",
///     &AddressPolicy::private_only(), columns).unwrap();
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     "127.0.0.1 localhost\n\n# START EC2HOSTS - app #\n10.0.0.1 web1 # i-1 t2.micro\n# END EC2HOSTS - app #\n"
/// );
/// ```
pub fn synchronize<R, S>(
    input: R,
    records: &RecordSet,
    name: &str,
    policy: &AddressPolicy,
    columns: &[S],
) -> Result<Vec<u8>, Aborted>
where
    R: BufRead,
    S: AsRef<str>,
{
    let markers = BlockMarkers::new(name);

    let (state, mut out) = fold_lines(input, SyncState::Before, |state, line, out| {
        if markers.matches_start(line.content()) {
            match state {
                SyncState::Before => {
                    tracing::debug!(block = name, line = line.number, "Found start marker");
                    emit(out, markers.start.as_bytes());
                    render_records(out, records, policy, columns);
                    Ok(SyncState::Inside {
                        opened_at: line.number,
                    })
                }
                _ => Err(Error::MalformedMarker {
                    marker: MarkerKind::Start,
                    name: name.to_string(),
                    line: line.number,
                }),
            }
        } else if markers.matches_end(line.content()) {
            match state {
                SyncState::Inside { .. } => {
                    emit(out, markers.end.as_bytes());
                    Ok(SyncState::After)
                }
                _ => Err(Error::MalformedMarker {
                    marker: MarkerKind::End,
                    name: name.to_string(),
                    line: line.number,
                }),
            }
        } else {
            if !matches!(state, SyncState::Inside { .. }) {
                emit(out, line.raw);
            }
            Ok(state)
        }
    })?;

    match state {
        SyncState::Before => {
            tracing::debug!(block = name, records = records.len(), "No block found, appending");
            out.push(b'\n');
            emit(&mut out, markers.start.as_bytes());
            render_records(&mut out, records, policy, columns);
            emit(&mut out, markers.end.as_bytes());
        }
        SyncState::Inside { opened_at } => {
            return Err(Aborted::new(
                Error::UnterminatedBlock {
                    name: name.to_string(),
                    line: opened_at,
                },
                out,
            ));
        }
        SyncState::After => {}
    }

    Ok(out)
}

/// Removes the block `name` and everything inside it.
///
/// A file without the block comes back unchanged.
pub fn remove<R: BufRead>(input: R, name: &str) -> Result<Vec<u8>, Aborted> {
    let markers = BlockMarkers::new(name);
    strip(
        input,
        |line| markers.matches_start(line).then(|| name.to_string()),
        |line| markers.matches_end(line).then(|| name.to_string()),
    )
}

/// Removes every managed block in one pass, whatever its name.
///
/// Lines outside blocks are kept verbatim, including the blank separator
/// line [`synchronize`] writes ahead of a block it appends. For a file
/// with no blocks, `remove_all(synchronize(input))` is therefore `input`
/// followed by one extra `\n`.
pub fn remove_all<R: BufRead>(input: R) -> Result<Vec<u8>, Aborted> {
    strip(
        input,
        |line| {
            marker::is_any_start(line)
                .then(|| marker::marker_name(line).unwrap_or_default())
        },
        |line| {
            marker::is_any_end(line).then(|| marker::marker_name(line).unwrap_or_default())
        },
    )
}

/// Shared scan of [`remove`] and [`remove_all`].
///
/// `start` and `end` return the block name when a line is a marker.
fn strip<R, A, B>(input: R, start: A, end: B) -> Result<Vec<u8>, Aborted>
where
    R: BufRead,
    A: Fn(&[u8]) -> Option<String>,
    B: Fn(&[u8]) -> Option<String>,
{
    let (state, out) = fold_lines(input, StripState::Outside, |state, line, out| {
        if let Some(name) = start(line.content()) {
            match state {
                StripState::Outside => {
                    tracing::debug!(block = %name, line = line.number, "Removing block");
                    Ok(StripState::Inside {
                        name,
                        opened_at: line.number,
                    })
                }
                StripState::Inside { .. } => Err(Error::MalformedMarker {
                    marker: MarkerKind::Start,
                    name,
                    line: line.number,
                }),
            }
        } else if let Some(name) = end(line.content()) {
            match state {
                StripState::Inside { .. } => Ok(StripState::Outside),
                StripState::Outside => Err(Error::MalformedMarker {
                    marker: MarkerKind::End,
                    name,
                    line: line.number,
                }),
            }
        } else {
            if state == StripState::Outside {
                emit(out, line.raw);
            }
            Ok(state)
        }
    })?;

    match state {
        StripState::Outside => Ok(out),
        StripState::Inside { name, opened_at } => Err(Aborted::new(
            Error::UnterminatedBlock {
                name,
                line: opened_at,
            },
            out,
        )),
    }
}
