//! A source bound to an adapter and a private copy of the configuration.

use super::setting::{ConfigOption, DestinationView};
use super::Uploader;
use crate::adapter::AdapterKind;
use crate::destination::{generate_id, Destination};
use crate::error::{Result, UploadError};
use crate::source::Source;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of resolving a session's destination, before any I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub destination: Destination,
    pub overwrite: bool,
    pub create_dir: bool,
    /// Absolute, normalized destination path.
    pub path: PathBuf,
}

/// One source, one adapter, one configuration snapshot.
///
/// What the adapter infers from the source, generated names included, is
/// fixed when the session is created, so [`UploadSession::resolve`] and
/// [`UploadSession::save`] agree on the destination.
///
/// Changes made through [`UploadSession::uploader_mut`] stay local to this
/// session. [`UploadSession::save`] consumes the session, so a session is
/// saved at most once.
#[derive(Debug, Clone)]
pub struct UploadSession {
    uploader: Uploader,
    source: Source,
    adapter: AdapterKind,
    inferred: Destination,
    fallback_filename: String,
}

impl UploadSession {
    pub(super) fn new(uploader: Uploader, source: Source, adapter: AdapterKind) -> Self {
        let inferred = adapter.adapter().infer_destination(&source);
        tracing::debug!(%adapter, ?inferred, "inferred destination");
        UploadSession {
            uploader,
            source,
            adapter,
            inferred,
            fallback_filename: generate_id(),
        }
    }

    pub fn adapter(&self) -> AdapterKind {
        self.adapter
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn uploader(&self) -> &Uploader {
        &self.uploader
    }

    /// This session's own configuration.
    pub fn uploader_mut(&mut self) -> &mut Uploader {
        &mut self.uploader
    }

    /// Computes the destination without touching the filesystem.
    ///
    /// Deferred values are evaluated first, in
    /// [`ConfigOption::EVALUATION_ORDER`]; each sees the caller's values
    /// resolved so far over the adapter's inference. Inference then fills
    /// whatever is still unset. A filename that is still missing is generated.
    pub fn resolve(&self) -> Result<Resolved> {
        if self.source.is_empty() {
            return Err(UploadError::SourceUndefined);
        }

        let u = &self.uploader;
        let inferred = &self.inferred;

        let mut destination = u.destination.clone();
        let mut overwrite = u.overwrite;
        let mut create_dir = u.create_dir;

        for option in ConfigOption::EVALUATION_ORDER {
            let view = || DestinationView {
                cwd: u.cwd.clone(),
                adapter: self.adapter,
                destination: destination.merged_over(inferred),
                overwrite,
                create_dir,
            };
            let d = &u.deferred;
            match option {
                ConfigOption::Destination => {
                    if let Some(f) = &d.destination {
                        let path = f(&view());
                        destination.set_path(&path);
                    }
                }
                ConfigOption::Prefix => {
                    if let Some(f) = &d.prefix {
                        destination.prefix = Some(f(&view()));
                    }
                }
                ConfigOption::Overwrite => {
                    if let Some(f) = &d.overwrite {
                        overwrite = f(&view());
                    }
                }
                ConfigOption::CreateDir => {
                    if let Some(f) = &d.create_dir {
                        create_dir = f(&view());
                    }
                }
                ConfigOption::Directory => {
                    if let Some(f) = &d.directory {
                        destination.directory = Some(f(&view()));
                    }
                }
                ConfigOption::Filename => {
                    if let Some(f) = &d.filename {
                        destination.filename = Some(f(&view()));
                    }
                }
                ConfigOption::Extension => {
                    if let Some(f) = &d.extension {
                        destination.extension = Some(f(&view()));
                    }
                }
            }
        }

        destination.fill_from(inferred);
        if destination.filename().is_none() {
            destination.filename = Some(self.fallback_filename.clone());
        }

        let path = PathBuf::from(destination.absolute_path(&u.cwd));
        Ok(Resolved {
            destination,
            overwrite,
            create_dir,
            path,
        })
    }

    /// Resolved destination, either absolute or relative to the working
    /// directory.
    pub fn destination(&self, absolute: bool) -> Result<PathBuf> {
        let resolved = self.resolve()?;
        if absolute {
            Ok(resolved.path)
        } else {
            Ok(PathBuf::from(resolved.destination.relative_path()))
        }
    }

    /// Resolves the destination, enforces the overwrite and directory
    /// policies, then hands the bytes to the adapter. Returns the absolute
    /// destination path.
    ///
    /// Nothing is rolled back on failure; a failed transfer may leave a
    /// partial file behind.
    pub fn save(self) -> Result<PathBuf> {
        let resolved = self.resolve()?;
        let path = resolved.path;

        if !resolved.overwrite && path.is_file() {
            return Err(UploadError::DestinationExists { path });
        }

        if resolved.create_dir {
            if let Some(parent) = path.parent() {
                ensure_dir(parent)?;
            }
        }

        self.adapter
            .adapter()
            .transfer(&self.source, &path, &self.uploader.transfer)?;

        tracing::info!(adapter = %self.adapter, path = %path.display(), "saved upload");
        Ok(path)
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|source| UploadError::DirectoryCreateFailed {
        path: dir.to_path_buf(),
        source,
    })?;
    tracing::debug!(dir = %dir.display(), "created destination directory");
    Ok(())
}
