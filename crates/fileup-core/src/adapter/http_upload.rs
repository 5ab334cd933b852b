//! Adapter for upload objects that move themselves (framework-provided uploads).

use super::{infer_from_client_name, SourceAdapter, TransferOptions};
use crate::destination::Destination;
use crate::error::{Result, TransferError, UploadError};
use crate::source::Source;
use std::path::Path;

#[derive(Debug, Default, Clone, Copy)]
pub struct HttpUploadAdapter;

impl SourceAdapter for HttpUploadAdapter {
    fn detect(&self, source: &Source) -> bool {
        matches!(source, Source::File(_))
    }

    fn infer_destination(&self, source: &Source) -> Destination {
        match source {
            Source::File(file) => file
                .client_filename()
                .map(|name| infer_from_client_name(&name))
                .unwrap_or_default(),
            _ => Destination::default(),
        }
    }

    fn transfer(&self, source: &Source, destination: &Path, _opts: &TransferOptions) -> Result<()> {
        let file = match source {
            Source::File(file) => file,
            _ => {
                return Err(UploadError::Transfer {
                    path: destination.to_path_buf(),
                    source: TransferError::Malformed("expected an upload object".into()),
                })
            }
        };
        file.move_to(destination).map_err(|e| UploadError::Transfer {
            path: destination.to_path_buf(),
            source: TransferError::Io(e),
        })
    }
}
