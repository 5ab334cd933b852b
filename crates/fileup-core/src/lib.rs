pub mod config;
pub mod logging;

pub mod adapter;
pub mod destination;
pub mod error;
pub mod path;
pub mod source;
pub mod uploader;

pub use adapter::{AdapterKind, SourceAdapter, TransferOptions};
pub use destination::Destination;
pub use error::{Result, TransferError, UploadError};
pub use source::{LocalUpload, Source, UploadDescriptor, UploadedFile};
pub use uploader::{Resolved, Setting, UploadSession, Uploader};
