//! Error types for ec2hosts-blocks

pub type Result<T> = std::result::Result<T, Error>;

/// Which fence of a block a marker line is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Start,
    End,
}

impl std::fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::End => write!(f, "end"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A start marker while a block is already open, or an end marker
    /// while none is.
    #[error("Invalid {marker} marker for block '{name}' at line {line}")]
    MalformedMarker {
        marker: MarkerKind,
        name: String,
        line: usize,
    },

    #[error("Block '{name}' opened at line {line} has no end marker")]
    UnterminatedBlock { name: String, line: usize },

    #[error("Failed to read input at line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

/// A scan that stopped early.
///
/// `partial` holds whatever output had been produced before the failure.
/// It is kept for diagnostics only and must never be written back.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct Aborted {
    pub error: Error,
    pub partial: Vec<u8>,
}

impl Aborted {
    pub fn new(error: Error, partial: Vec<u8>) -> Self {
        Self { error, partial }
    }

    pub fn into_error(self) -> Error {
        self.error
    }
}

impl From<Aborted> for Error {
    fn from(aborted: Aborted) -> Self {
        aborted.error
    }
}
