//! Destination model: where the saved bytes will land.

use crate::path::{normalize, parse_path};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Directory, filename, extension and filename prefix of a destination.
///
/// Empty strings are treated as unset by every accessor. The extension is
/// lower-cased on read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Destination {
    pub directory: Option<String>,
    pub filename: Option<String>,
    pub extension: Option<String>,
    pub prefix: Option<String>,
}

impl Destination {
    pub fn directory(&self) -> Option<&str> {
        non_empty(&self.directory)
    }

    pub fn filename(&self) -> Option<&str> {
        non_empty(&self.filename)
    }

    pub fn extension(&self) -> Option<String> {
        non_empty(&self.extension).map(str::to_lowercase)
    }

    pub fn prefix(&self) -> Option<&str> {
        non_empty(&self.prefix)
    }

    /// Sets directory, filename and extension from a full path. Components
    /// missing from `path` become unset.
    pub fn set_path(&mut self, path: &str) {
        let parsed = parse_path(path);
        self.directory = parsed.directory.map(|d| normalize(&[d]));
        self.filename = parsed.filename;
        self.extension = parsed.extension;
    }

    /// Fills every unset field from `inferred`; fields already set are kept.
    pub fn fill_from(&mut self, inferred: &Destination) {
        fill(&mut self.directory, &inferred.directory);
        fill(&mut self.filename, &inferred.filename);
        fill(&mut self.extension, &inferred.extension);
        fill(&mut self.prefix, &inferred.prefix);
    }

    /// Copy of `self` with unset fields taken from `inferred`.
    pub fn merged_over(&self, inferred: &Destination) -> Destination {
        let mut merged = self.clone();
        merged.fill_from(inferred);
        merged
    }

    /// `prefix + filename`, followed by `.extension` when one is set.
    pub fn file_name(&self) -> String {
        let mut name = String::new();
        if let Some(p) = self.prefix() {
            name.push_str(p);
        }
        if let Some(f) = self.filename() {
            name.push_str(f);
        }
        if let Some(ext) = self.extension() {
            name.push('.');
            name.push_str(&ext);
        }
        name
    }

    /// Destination relative to the working directory.
    pub fn relative_path(&self) -> String {
        let file_name = self.file_name();
        match self.directory() {
            Some(dir) => normalize(&[dir, file_name.as_str()]),
            None => normalize(&[file_name.as_str()]),
        }
    }

    /// Destination rooted at `cwd`. The result always starts with `/`.
    pub fn absolute_path(&self, cwd: &str) -> String {
        let file_name = self.file_name();
        normalize(&["", cwd, self.directory().unwrap_or(""), file_name.as_str()])
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

fn fill(field: &mut Option<String>, inferred: &Option<String>) {
    if non_empty(field).is_none() {
        if let Some(v) = non_empty(inferred) {
            *field = Some(v.to_string());
        }
    }
}

static LAST_ID_MICROS: AtomicU64 = AtomicU64::new(0);

/// Time-based unique identifier: 8 hex digits of seconds followed by 5 hex
/// digits of microseconds. Strictly increasing within the process.
pub fn generate_id() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0);
    let prev = LAST_ID_MICROS
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or(now);
    let micros = now.max(prev + 1);
    format!("{:08x}{:05x}", micros / 1_000_000, micros % 1_000_000)
}
