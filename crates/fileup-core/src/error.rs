//! Error types for source detection, destination resolution and transfer.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the core.
pub type Result<T> = std::result::Result<T, UploadError>;

/// Failure of a save workflow. Every variant aborts the save immediately;
/// nothing already written is rolled back.
#[derive(Debug, Error)]
pub enum UploadError {
    /// No adapter recognised the input and none was forced.
    #[error("no valid adapter found for the given source")]
    NoAdapterFound,

    /// The session has no usable source (empty input).
    #[error("original source is not defined")]
    SourceUndefined,

    /// Overwrite is disabled and the destination already holds a file.
    #[error("cannot overwrite existing file {}", path.display())]
    DestinationExists { path: PathBuf },

    /// The parent directory of the destination could not be created.
    #[error("unable to create directory {}", path.display())]
    DirectoryCreateFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The upload mechanism reported a failure in the descriptor itself.
    #[error("unable to save the uploaded file: {reason}")]
    Upload { reason: String },

    /// Moving bytes to the destination failed.
    #[error("transfer to {} failed", path.display())]
    Transfer {
        path: PathBuf,
        #[source]
        source: TransferError,
    },
}

/// Low-level cause of a failed transfer.
#[derive(Debug)]
pub enum TransferError {
    /// Filesystem failure (permission denied, missing temp file, disk full).
    Io(io::Error),
    /// The data URI payload is not valid base64.
    Decode(base64::DecodeError),
    /// libcurl reported an error (resolve, connect, timeout).
    Curl(curl::Error),
    /// The remote end answered with a non-2xx status.
    Http(u32),
    /// The source matched an adapter but its content is unusable.
    Malformed(String),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::Io(e) => write!(f, "io: {}", e),
            TransferError::Decode(e) => write!(f, "base64: {}", e),
            TransferError::Curl(e) => write!(f, "{}", e),
            TransferError::Http(code) => write!(f, "HTTP {}", code),
            TransferError::Malformed(what) => write!(f, "malformed source: {}", what),
        }
    }
}

impl std::error::Error for TransferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransferError::Io(e) => Some(e),
            TransferError::Decode(e) => Some(e),
            TransferError::Curl(e) => Some(e),
            TransferError::Http(_) | TransferError::Malformed(_) => None,
        }
    }
}

impl From<io::Error> for TransferError {
    fn from(e: io::Error) -> Self {
        TransferError::Io(e)
    }
}

impl From<curl::Error> for TransferError {
    fn from(e: curl::Error) -> Self {
        TransferError::Curl(e)
    }
}

impl From<base64::DecodeError> for TransferError {
    fn from(e: base64::DecodeError) -> Self {
        TransferError::Decode(e)
    }
}
