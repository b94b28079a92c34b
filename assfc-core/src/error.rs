//! Error types shared across assfc-core.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to decode a font container.
///
/// These never escape the index build: the offending file is logged and
/// left out of the index.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("truncated data while reading {what}")]
    Truncated { what: &'static str },

    #[error("unrecognized sfnt version {found:#010x}")]
    BadMagic { found: u32 },

    #[error("not a font collection (header tag {found:?})")]
    NotACollection { found: String },

    #[error("font has no name table")]
    MissingNameTable,
}

impl DecodeError {
    /// Map an I/O error raised by a cursor read into a truncation error.
    pub(crate) fn short_read(err: io::Error, what: &'static str) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            DecodeError::Truncated { what }
        } else {
            DecodeError::Io(err)
        }
    }
}

/// Errors that propagate to the caller.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read script {}: {source}", path.display())]
    ScriptRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write font cache {}: {source}", path.display())]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
