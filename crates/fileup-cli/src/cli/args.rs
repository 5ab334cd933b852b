//! Options shared by `save` and `resolve`.

use anyhow::{Context, Result};
use clap::Args;
use fileup_core::config::FileupConfig;
use fileup_core::{AdapterKind, LocalUpload, Source, Uploader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Default, Args)]
pub struct UploadArgs {
    /// Skip detection and use this adapter (base64, http-upload, upload, url).
    #[arg(long, value_name = "ADAPTER")]
    pub adapter: Option<AdapterKind>,

    /// Working directory the destination is resolved under (relative to the
    /// current directory when relative).
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Full destination path; sets directory, filename and extension at once.
    #[arg(long, value_name = "PATH")]
    pub destination: Option<String>,

    #[arg(long, value_name = "DIR")]
    pub directory: Option<String>,

    /// Filename without extension.
    #[arg(long, value_name = "NAME")]
    pub filename: Option<String>,

    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,

    /// String prepended to the filename.
    #[arg(long, value_name = "P")]
    pub prefix: Option<String>,

    /// Replace an existing file at the destination.
    #[arg(long, conflicts_with = "no_overwrite")]
    pub overwrite: bool,

    /// Refuse to replace an existing file, even if the config allows it.
    #[arg(long)]
    pub no_overwrite: bool,

    /// Create missing parent directories.
    #[arg(long, conflicts_with = "no_create_dir")]
    pub create_dir: bool,

    /// Do not create missing parent directories, even if the config does.
    #[arg(long)]
    pub no_create_dir: bool,

    /// Treat INPUT as a path to a local file.
    #[arg(long)]
    pub from_file: bool,
}

impl UploadArgs {
    /// Uploader from config defaults with command-line values on top.
    pub fn uploader(&self, cfg: &FileupConfig) -> Uploader {
        let mut uploader = Uploader::from_config(cfg, self.cwd.as_deref());
        if let Some(d) = &self.destination {
            uploader.set_destination(d);
        }
        if let Some(d) = &self.directory {
            uploader.set_directory(d);
        }
        if let Some(f) = &self.filename {
            uploader.set_filename(f);
        }
        if let Some(e) = &self.extension {
            uploader.set_extension(e);
        }
        if let Some(p) = &self.prefix {
            uploader.set_prefix(p);
        }
        if let Some(v) = flag(self.overwrite, self.no_overwrite) {
            uploader.set_overwrite(v);
        }
        if let Some(v) = flag(self.create_dir, self.no_create_dir) {
            uploader.set_create_dir(v);
        }
        uploader
    }

    pub fn source(&self, input: &str) -> Result<Source> {
        read_source(input, self.from_file)
    }
}

/// `--x` / `--no-x` pair: `None` leaves the configured value alone.
fn flag(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

/// `--from-file` wraps an existing file as an upload object; anything else
/// goes through [`Source::from_arg`].
pub fn read_source(input: &str, from_file: bool) -> Result<Source> {
    if !from_file {
        return Ok(Source::from_arg(input));
    }
    let path = Path::new(input);
    let meta = std::fs::metadata(path).with_context(|| format!("cannot read {}", path.display()))?;
    if !meta.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }
    Ok(Source::from(Arc::new(LocalUpload::new(path))))
}
