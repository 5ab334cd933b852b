//! Raw inputs accepted by the uploader.
//!
//! A [`Source`] is deliberately loose: adapters decide by shape which one
//! of them can handle it.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// An untyped file source.
#[derive(Clone)]
pub enum Source {
    /// A string: a `data:` URI or a URL.
    Text(String),
    /// A map shaped like a multipart upload descriptor (`name`, `tmp_name`, `error`).
    Fields(Map<String, Value>),
    /// An upload object that knows how to move itself.
    File(Arc<dyn UploadedFile>),
}

impl Source {
    /// Parses a command-line style argument: a JSON object becomes
    /// [`Source::Fields`], anything else is [`Source::Text`].
    pub fn from_arg(arg: &str) -> Source {
        if arg.trim_start().starts_with('{') {
            if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(arg) {
                return Source::Fields(map);
            }
        }
        Source::Text(arg.to_string())
    }

    /// True if there is nothing to save.
    pub fn is_empty(&self) -> bool {
        match self {
            Source::Text(s) => s.is_empty(),
            Source::Fields(m) => m.is_empty(),
            Source::File(_) => false,
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Text(s) if s.len() > 64 => {
                let mut end = 64;
                while !s.is_char_boundary(end) {
                    end -= 1;
                }
                write!(f, "Text({:?}..)", &s[..end])
            }
            Source::Text(s) => write!(f, "Text({:?})", s),
            Source::Fields(m) => f.debug_tuple("Fields").field(m).finish(),
            Source::File(file) => write!(f, "File({:?})", file.client_filename()),
        }
    }
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        Source::Text(s.to_string())
    }
}

impl From<String> for Source {
    fn from(s: String) -> Self {
        Source::Text(s)
    }
}

impl From<Map<String, Value>> for Source {
    fn from(m: Map<String, Value>) -> Self {
        Source::Fields(m)
    }
}

impl From<UploadDescriptor> for Source {
    fn from(d: UploadDescriptor) -> Self {
        match serde_json::to_value(d) {
            Ok(Value::Object(map)) => Source::Fields(map),
            _ => Source::Fields(Map::new()),
        }
    }
}

impl<T: UploadedFile + 'static> From<Arc<T>> for Source {
    fn from(file: Arc<T>) -> Self {
        Source::File(file)
    }
}

/// Typed view of a multipart upload descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadDescriptor {
    /// Original filename declared by the client.
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    /// Path of the temporary file holding the uploaded bytes.
    #[serde(default)]
    pub tmp_name: String,
    /// Upload error code; `0`, `"0"`, `""` or absent mean no error.
    #[serde(default)]
    pub error: Value,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub size: Option<u64>,
}

impl UploadDescriptor {
    /// Reads a descriptor out of a loosely typed map.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(fields.clone()))
    }

    /// The reported error code, or `None` when the upload succeeded.
    pub fn error_code(&self) -> Option<String> {
        error_code(&self.error)
    }
}

/// Error code carried by a descriptor's `error` field; `None` means success.
pub(crate) fn error_code(error: &Value) -> Option<String> {
    match error {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_u64() == Some(0) => None,
        Value::String(s) if s.is_empty() || s == "0" => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// Descriptors arrive from form decoders that stringify numbers freely.
fn lenient_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    })
}

/// An already-received upload that can move its own bytes, the way web
/// frameworks expose validated multipart files.
pub trait UploadedFile: Send + Sync {
    /// Filename declared by the client, if any.
    fn client_filename(&self) -> Option<String>;

    /// Moves the uploaded bytes to `destination`.
    fn move_to(&self, destination: &Path) -> io::Result<()>;
}

/// An [`UploadedFile`] backed by a file that already exists on disk.
#[derive(Debug, Clone)]
pub struct LocalUpload {
    path: PathBuf,
    client_filename: Option<String>,
}

impl LocalUpload {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LocalUpload {
            path: path.into(),
            client_filename: None,
        }
    }

    /// Overrides the client filename (defaults to the file's own name).
    pub fn with_client_filename(mut self, name: impl Into<String>) -> Self {
        self.client_filename = Some(name.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl UploadedFile for LocalUpload {
    fn client_filename(&self) -> Option<String> {
        self.client_filename.clone().or_else(|| {
            self.path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
    }

    fn move_to(&self, destination: &Path) -> io::Result<()> {
        move_file(&self.path, destination)
    }
}

/// Renames `from` to `to`, falling back to copy + remove when the rename
/// crosses filesystems.
pub(crate) fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device(&e) => {
            tracing::warn!(
                from = %from.display(),
                to = %to.display(),
                "rename crosses filesystems, copying instead"
            );
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn is_cross_device(e: &io::Error) -> bool {
    e.raw_os_error() == Some(libc::EXDEV)
}

#[cfg(not(unix))]
fn is_cross_device(_e: &io::Error) -> bool {
    false
}
