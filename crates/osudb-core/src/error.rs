use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while decoding a database file.
///
/// Every error is terminal for the decode call that produced it. Offsets are
/// byte positions from the start of the stream.
#[derive(Error, Debug)]
pub enum Error {
    #[error("unexpected end of data at {offset:#x}: needed {needed} bytes, {remaining} left")]
    Truncated {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("invalid string flag {flag:#04x} at {offset:#x}")]
    InvalidStringFlag { flag: u8, offset: usize },

    #[error("invalid type tag at {offset:#x}: expected {expected:#04x}, found {found:#04x}")]
    InvalidTag {
        expected: u8,
        found: u8,
        offset: usize,
    },

    #[error("invalid utf-8 in string at {offset:#x}")]
    InvalidUtf8 { offset: usize },

    #[error("variable-length integer at {offset:#x} does not fit in 64 bits")]
    VarIntOverflow { offset: usize },

    #[error("negative count {count} at {offset:#x}")]
    NegativeCount { count: i32, offset: usize },

    #[error("{record} #{index}: {source}")]
    Record {
        record: &'static str,
        index: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("stream read failed: {0}")]
    Stream(#[from] io::Error),

    #[error("cannot tell which database {} is", .path.display())]
    UnknownDatabase { path: PathBuf },

    #[error("json export failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of an [`Error`], looking through context wrappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Fewer bytes remained than a field required.
    Truncated,
    /// An unexpected flag, tag or count was read.
    InvalidFormat,
    /// The file was missing or unreadable.
    Io,
    /// Failure outside decoding (database kind detection, JSON).
    Export,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Truncated { .. } => ErrorKind::Truncated,
            Error::InvalidStringFlag { .. }
            | Error::InvalidTag { .. }
            | Error::InvalidUtf8 { .. }
            | Error::VarIntOverflow { .. }
            | Error::NegativeCount { .. } => ErrorKind::InvalidFormat,
            Error::Record { source, .. } | Error::File { source, .. } => source.kind(),
            Error::Io { .. } | Error::Stream(_) => ErrorKind::Io,
            Error::UnknownDatabase { .. } | Error::Json(_) => ErrorKind::Export,
        }
    }

    /// Innermost error, with record and file context stripped.
    pub fn root(&self) -> &Error {
        match self {
            Error::Record { source, .. } | Error::File { source, .. } => source.root(),
            other => other,
        }
    }

    pub(crate) fn in_record(self, record: &'static str, index: usize) -> Self {
        Error::Record {
            record,
            index,
            source: Box::new(self),
        }
    }

    pub(crate) fn in_file(self, path: impl Into<PathBuf>) -> Self {
        Error::File {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
