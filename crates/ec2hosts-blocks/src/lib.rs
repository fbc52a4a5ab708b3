//! Managed block editing for hosts-style files.
//!
//! A managed block is a run of generated lines fenced by two marker
//! lines that carry the block name:
//!
//! ```text
//! # START EC2HOSTS - app #
//! 10.0.0.1 web1 # i-1 t2.micro
//! # END EC2HOSTS - app #
//! ```
//!
//! Everything outside the fences belongs to the user and is copied
//! through byte for byte. The body between the fences is owned by this
//! crate and regenerated from a [`RecordSet`] on every run.
//!
//! - [`marker`]: marker literals and the name-agnostic recognizers
//! - [`record`]: the inventory entries a block is rendered from
//! - [`format`]: one record to one hosts line
//! - [`editor`]: the single-pass `synchronize`, `remove` and `remove_all` scans

pub mod editor;
pub mod error;
pub mod format;
pub mod marker;
pub mod record;

pub use editor::{remove, remove_all, synchronize};
pub use error::{Aborted, Error, MarkerKind, Result};
pub use format::{AddressPolicy, format_line};
pub use marker::{BlockMarkers, end_marker, is_any_end, is_any_start, start_marker};
pub use record::{Record, RecordSet};
