use std::{io, path::PathBuf, result};

use thiserror::Error;

use crate::{Buf, MAX_BLOB_LEN, Origin};

pub type Result<T, E = Error> = result::Result<T, E>;

/// Error types for zakoio operations.
///
/// Every variant maps onto one of the three statuses of [`Status`]: the
/// end-of-data variants are [`Status::Eof`], everything else is
/// [`Status::Failure`].
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] io::Error),

    #[error("Couldn't open or create {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    // End of data
    #[error("Unexpected end of data")]
    Eof,

    #[error("End of data before NUL terminator ({} bytes read)", partial.len())]
    UnterminatedCStr { partial: Buf },

    // Write errors
    #[error("Short write: {written} of {expected} bytes accepted")]
    ShortWrite { expected: usize, written: usize },

    #[error("Blob of {len} bytes exceeds the {max} byte length prefix", max = MAX_BLOB_LEN)]
    BlobTooLong { len: usize },

    #[error("String contains an interior NUL at byte {position}")]
    InteriorNul { position: usize },

    // Positioning errors
    #[error("Invalid seek to offset {offset} from {origin:?}: {source}")]
    InvalidSeek {
        offset: i64,
        origin: Origin,
        source: io::Error,
    },

    // Allocation errors
    #[error("Failed to allocate {requested} bytes")]
    Alloc { requested: usize },
}

impl Error {
    /// Returns `true` when the error means the data ended before the read
    /// could complete.
    #[inline]
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Eof | Self::UnterminatedCStr { .. })
    }

    #[inline]
    pub fn status(&self) -> Status {
        if self.is_eof() {
            Status::Eof
        } else {
            Status::Failure
        }
    }

    /// Takes the bytes accumulated by a string read that hit end of data.
    ///
    /// Returns `None` for every other error.
    pub fn into_partial(self) -> Option<Buf> {
        match self {
            Self::UnterminatedCStr { partial } => Some(partial),
            _ => None,
        }
    }
}

/// Outcome of a stream operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The operation fully completed.
    Success,
    /// The operation failed for a reason other than end of data.
    Failure,
    /// The data ended before the operation could complete.
    Eof,
}

impl Status {
    pub fn of<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Self::Success,
            Err(e) => e.status(),
        }
    }
}
