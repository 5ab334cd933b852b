//! `fileup resolve` – dry run: print the destination a save would use.

use crate::cli::UploadArgs;
use anyhow::Result;
use fileup_core::config::FileupConfig;

pub fn run_resolve(cfg: &FileupConfig, input: &str, relative: bool, args: &UploadArgs) -> Result<()> {
    let uploader = args.uploader(cfg);
    let session = uploader.with_source(args.source(input)?, args.adapter)?;
    let path = session.destination(!relative)?;
    tracing::debug!(adapter = %session.adapter(), path = %path.display(), "resolved");
    println!("{}", path.display());
    Ok(())
}
