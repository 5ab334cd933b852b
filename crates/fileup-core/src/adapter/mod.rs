//! Source adapters: one handler per input shape.
//!
//! The set is closed and checked in a fixed priority order; the first
//! adapter whose `detect` accepts the input handles it. Base64 and Url both
//! accept strings, but their predicates never overlap (a `data:` URI cannot
//! be a base URL), so detection stays deterministic.

mod data_uri;
mod http_upload;
mod remote;
mod upload;

pub use data_uri::Base64Adapter;
pub use http_upload::HttpUploadAdapter;
pub use remote::UrlAdapter;
pub use upload::UploadAdapter;

use crate::config::{FetchConfig, FileupConfig};
use crate::destination::Destination;
use crate::error::Result;
use crate::path::{parse_path, sanitize_component};
use crate::source::Source;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Settings an adapter may need while moving bytes.
#[derive(Debug, Clone)]
pub struct TransferOptions {
    pub fetch: FetchConfig,
    /// Permission bits applied after a multipart upload is moved into place.
    pub upload_mode: u32,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self::from(&FileupConfig::default())
    }
}

impl From<&FileupConfig> for TransferOptions {
    fn from(cfg: &FileupConfig) -> Self {
        TransferOptions {
            fetch: cfg.fetch.clone(),
            upload_mode: cfg.upload_mode,
        }
    }
}

/// Handler for one input shape. Implementations are stateless.
pub trait SourceAdapter: Send + Sync {
    /// True if this adapter understands `source`.
    fn detect(&self, source: &Source) -> bool;

    /// Destination fields derivable from the source's own metadata.
    fn infer_destination(&self, source: &Source) -> Destination;

    /// Writes the source's bytes to `destination`.
    fn transfer(&self, source: &Source, destination: &Path, opts: &TransferOptions) -> Result<()>;
}

/// The built-in adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdapterKind {
    Base64,
    HttpUpload,
    Upload,
    Url,
}

static BASE64: Base64Adapter = Base64Adapter;
static HTTP_UPLOAD: HttpUploadAdapter = HttpUploadAdapter;
static UPLOAD: UploadAdapter = UploadAdapter;
static URL: UrlAdapter = UrlAdapter;

impl AdapterKind {
    /// Detection order.
    pub const PRIORITY: [AdapterKind; 4] = [
        AdapterKind::Base64,
        AdapterKind::HttpUpload,
        AdapterKind::Upload,
        AdapterKind::Url,
    ];

    pub fn adapter(self) -> &'static dyn SourceAdapter {
        match self {
            AdapterKind::Base64 => &BASE64,
            AdapterKind::HttpUpload => &HTTP_UPLOAD,
            AdapterKind::Upload => &UPLOAD,
            AdapterKind::Url => &URL,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AdapterKind::Base64 => "base64",
            AdapterKind::HttpUpload => "http-upload",
            AdapterKind::Upload => "upload",
            AdapterKind::Url => "url",
        }
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdapterKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        AdapterKind::PRIORITY
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown adapter '{}' (expected one of: base64, http-upload, upload, url)",
                    s
                )
            })
    }
}

/// Returns the first adapter, in priority order, that accepts `source`.
pub fn detect(source: &Source) -> Option<AdapterKind> {
    AdapterKind::PRIORITY
        .into_iter()
        .find(|kind| kind.adapter().detect(source))
}

/// Filename and extension inferred from a client-declared name. Only the
/// basename is used; unusable components are left unset.
pub(crate) fn infer_from_client_name(name: &str) -> Destination {
    let parsed = parse_path(name);
    Destination {
        filename: parsed.filename.as_deref().and_then(sanitize_component),
        extension: parsed.extension.as_deref().and_then(sanitize_component),
        ..Destination::default()
    }
}
