//! `fileup config` – show the config file path and effective values.

use anyhow::Result;
use fileup_core::config::{self, FileupConfig};

pub fn run_config(cfg: &FileupConfig) -> Result<()> {
    println!("# {}", config::config_path()?.display());
    print!("{}", cfg.to_toml()?);
    Ok(())
}
