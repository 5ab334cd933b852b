//! `fileup detect` – print the adapter chosen for a source.

use crate::cli::args::read_source;
use anyhow::Result;
use fileup_core::{adapter, UploadError};

pub fn run_detect(input: &str, from_file: bool) -> Result<()> {
    let source = read_source(input, from_file)?;
    let kind = adapter::detect(&source).ok_or(UploadError::NoAdapterFound)?;
    println!("{}", kind);
    Ok(())
}
