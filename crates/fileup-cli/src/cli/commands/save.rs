//! `fileup save` – transfer a source and print where it landed.

use crate::cli::UploadArgs;
use anyhow::{Context, Result};
use fileup_core::config::FileupConfig;

pub fn run_save(cfg: &FileupConfig, input: &str, args: &UploadArgs) -> Result<()> {
    let uploader = args.uploader(cfg);
    let source = args.source(input)?;
    let session = uploader.with_source(source, args.adapter)?;
    let adapter = session.adapter();
    let path = session
        .save()
        .with_context(|| format!("saving with the {} adapter", adapter))?;
    println!("{}", path.display());
    Ok(())
}
