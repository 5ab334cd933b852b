//! `data:` URI adapter.

use super::{SourceAdapter, TransferOptions};
use crate::destination::{generate_id, Destination};
use crate::error::{Result, TransferError, UploadError};
use crate::source::Source;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use std::fs;
use std::path::Path;

const SCHEME: &str = "data:";
const MARKER: &str = ";base64,";

/// Standard alphabet, padding optional.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Saves base64 `data:` URIs. The filename is generated; the extension is the
/// MIME subtype.
#[derive(Debug, Default, Clone, Copy)]
pub struct Base64Adapter;

impl SourceAdapter for Base64Adapter {
    fn detect(&self, source: &Source) -> bool {
        matches!(source, Source::Text(s) if s.starts_with(SCHEME))
    }

    fn infer_destination(&self, source: &Source) -> Destination {
        let extension = match source {
            Source::Text(s) => mime_subtype(s),
            _ => None,
        };
        Destination {
            filename: Some(generate_id()),
            extension,
            ..Destination::default()
        }
    }

    fn transfer(&self, source: &Source, destination: &Path, _opts: &TransferOptions) -> Result<()> {
        let fail = |cause: TransferError| UploadError::Transfer {
            path: destination.to_path_buf(),
            source: cause,
        };

        let uri = match source {
            Source::Text(s) => s,
            _ => return Err(fail(TransferError::Malformed("expected a data URI".into()))),
        };
        let (_, payload) = uri
            .split_once(MARKER)
            .ok_or_else(|| fail(TransferError::Malformed("data URI is not base64-encoded".into())))?;

        let cleaned: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let bytes = LENIENT
            .decode(cleaned.as_bytes())
            .map_err(|e| fail(TransferError::from(e)))?;

        fs::write(destination, &bytes).map_err(|e| fail(TransferError::from(e)))?;
        tracing::debug!(bytes = bytes.len(), path = %destination.display(), "decoded data URI");
        Ok(())
    }
}

/// Subtype of `data:<type>/<subtype>[;...]`, limited to word characters
/// (`image/svg+xml` → `svg`).
fn mime_subtype(uri: &str) -> Option<String> {
    let header = uri.strip_prefix(SCHEME)?;
    let media_type = header.split([';', ',']).next()?;
    let (kind, subtype) = media_type.split_once('/')?;
    if kind.is_empty() || !kind.chars().all(is_word) {
        return None;
    }
    let word: String = subtype.chars().take_while(|c| is_word(*c)).collect();
    if word.is_empty() {
        None
    } else {
        Some(word)
    }
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
