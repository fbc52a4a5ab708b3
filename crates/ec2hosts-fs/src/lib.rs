//! Filesystem layer for ec2hosts
//!
//! Byte-oriented reads, create-or-truncate and atomic writes, content
//! checksums and format-agnostic configuration loading.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use io::WriteMode;
