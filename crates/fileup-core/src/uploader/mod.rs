//! Upload coordinator.
//!
//! An [`Uploader`] is a configuration template: working directory,
//! destination overrides, prefix and policies. Binding a source with
//! [`Uploader::with_source`] selects an adapter and returns an independent
//! [`UploadSession`]; the template itself is never modified by a save.

mod session;
mod setting;

pub use session::{Resolved, UploadSession};
pub use setting::{ConfigOption, Deferred, DestinationView, Setting};

use crate::adapter::{self, AdapterKind, TransferOptions};
use crate::config::FileupConfig;
use crate::destination::Destination;
use crate::error::{Result, UploadError};
use crate::source::Source;
use std::path::{Path, PathBuf};

/// Pending deferred values, evaluated at save time in
/// [`ConfigOption::EVALUATION_ORDER`].
#[derive(Clone, Default)]
pub(crate) struct DeferredSettings {
    pub destination: Option<Deferred<String>>,
    pub prefix: Option<Deferred<String>>,
    pub overwrite: Option<Deferred<bool>>,
    pub create_dir: Option<Deferred<bool>>,
    pub directory: Option<Deferred<String>>,
    pub filename: Option<Deferred<String>>,
    pub extension: Option<Deferred<String>>,
}

/// Configuration template for saving sources under a working directory.
#[derive(Clone)]
pub struct Uploader {
    cwd: String,
    destination: Destination,
    overwrite: bool,
    create_dir: bool,
    deferred: DeferredSettings,
    transfer: TransferOptions,
}

impl std::fmt::Debug for Uploader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Uploader")
            .field("cwd", &self.cwd)
            .field("destination", &self.destination)
            .field("overwrite", &self.overwrite)
            .field("create_dir", &self.create_dir)
            .finish_non_exhaustive()
    }
}

impl Uploader {
    /// New uploader saving under `cwd`, with overwrite and directory
    /// creation disabled.
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        Uploader {
            cwd: cwd.as_ref().to_string_lossy().into_owned(),
            destination: Destination::default(),
            overwrite: false,
            create_dir: false,
            deferred: DeferredSettings::default(),
            transfer: TransferOptions::default(),
        }
    }

    /// Uploader with defaults taken from the config file. Working directory:
    /// `cwd` if given, else the configured one, else the process's own. A
    /// relative directory is taken relative to the process's directory.
    pub fn from_config(cfg: &FileupConfig, cwd: Option<&Path>) -> Self {
        let process_dir = std::env::current_dir().ok();
        let cwd = match cwd.map(Path::to_path_buf).or_else(|| cfg.working_dir.clone()) {
            Some(dir) if dir.is_relative() => match &process_dir {
                Some(base) => base.join(dir),
                None => dir,
            },
            Some(dir) => dir,
            None => process_dir.unwrap_or_else(|| PathBuf::from("/")),
        };
        let mut uploader = Uploader::new(cwd);
        uploader.destination.prefix = cfg.prefix.clone();
        uploader.destination.directory = cfg.directory.clone();
        uploader.overwrite = cfg.overwrite;
        uploader.create_dir = cfg.create_dir;
        uploader.transfer = TransferOptions::from(cfg);
        uploader
    }

    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    pub fn set_cwd(&mut self, cwd: impl AsRef<Path>) -> &mut Self {
        self.cwd = cwd.as_ref().to_string_lossy().into_owned();
        self
    }

    /// Literal destination fields configured so far (deferred values excluded).
    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn prefix(&self) -> Option<&str> {
        self.destination.prefix()
    }

    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    pub fn create_dir(&self) -> bool {
        self.create_dir
    }

    pub fn directory(&self) -> Option<&str> {
        self.destination.directory()
    }

    pub fn filename(&self) -> Option<&str> {
        self.destination.filename()
    }

    pub fn extension(&self) -> Option<String> {
        self.destination.extension()
    }

    pub fn transfer_options(&self) -> &TransferOptions {
        &self.transfer
    }

    pub fn set_transfer_options(&mut self, opts: TransferOptions) -> &mut Self {
        self.transfer = opts;
        self
    }

    /// Full destination path (directory, filename and extension at once). A
    /// literal replaces all three immediately; missing components become unset.
    pub fn set_destination(&mut self, value: impl Into<Setting<String>>) -> &mut Self {
        match value.into() {
            Setting::Value(path) => {
                self.destination.set_path(&path);
                self.deferred.destination = None;
            }
            Setting::Deferred(f) => self.deferred.destination = Some(f),
        }
        self
    }

    /// String prepended to the filename.
    pub fn set_prefix(&mut self, value: impl Into<Setting<String>>) -> &mut Self {
        assign(&mut self.destination.prefix, &mut self.deferred.prefix, value.into());
        self
    }

    pub fn set_overwrite(&mut self, value: impl Into<Setting<bool>>) -> &mut Self {
        match value.into() {
            Setting::Value(v) => {
                self.overwrite = v;
                self.deferred.overwrite = None;
            }
            Setting::Deferred(f) => self.deferred.overwrite = Some(f),
        }
        self
    }

    pub fn set_create_dir(&mut self, value: impl Into<Setting<bool>>) -> &mut Self {
        match value.into() {
            Setting::Value(v) => {
                self.create_dir = v;
                self.deferred.create_dir = None;
            }
            Setting::Deferred(f) => self.deferred.create_dir = Some(f),
        }
        self
    }

    pub fn set_directory(&mut self, value: impl Into<Setting<String>>) -> &mut Self {
        assign(&mut self.destination.directory, &mut self.deferred.directory, value.into());
        self
    }

    pub fn set_filename(&mut self, value: impl Into<Setting<String>>) -> &mut Self {
        assign(&mut self.destination.filename, &mut self.deferred.filename, value.into());
        self
    }

    pub fn set_extension(&mut self, value: impl Into<Setting<String>>) -> &mut Self {
        assign(&mut self.destination.extension, &mut self.deferred.extension, value.into());
        self
    }

    /// Binds `source` to a copy of this uploader.
    ///
    /// With `forced` set, detection is skipped. Otherwise adapters are tried
    /// in [`AdapterKind::PRIORITY`] order and the first match wins.
    pub fn with_source(
        &self,
        source: impl Into<Source>,
        forced: Option<AdapterKind>,
    ) -> Result<UploadSession> {
        let source = source.into();
        let kind = match forced {
            Some(kind) => {
                tracing::debug!(adapter = %kind, "adapter forced by caller");
                kind
            }
            None => adapter::detect(&source).ok_or(UploadError::NoAdapterFound)?,
        };
        tracing::debug!(adapter = %kind, source = ?source, "bound source");
        Ok(UploadSession::new(self.clone(), source, kind))
    }

    /// Binds `source` and saves it. Returns the absolute destination.
    pub fn upload(&self, source: impl Into<Source>, forced: Option<AdapterKind>) -> Result<PathBuf> {
        self.with_source(source, forced)?.save()
    }
}

fn assign(field: &mut Option<String>, deferred: &mut Option<Deferred<String>>, value: Setting<String>) {
    match value {
        Setting::Value(v) => {
            *field = Some(v);
            *deferred = None;
        }
        Setting::Deferred(f) => *deferred = Some(f),
    }
}
