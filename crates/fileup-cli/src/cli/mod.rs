//! CLI for the fileup upload coordinator.

mod args;
mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fileup_core::config;

pub use args::UploadArgs;
use commands::{run_completions, run_config, run_detect, run_resolve, run_save};

/// Top-level CLI for fileup.
#[derive(Debug, Parser)]
#[command(name = "fileup")]
#[command(about = "fileup: save data URIs, URLs and uploaded files under a working directory", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Save a source and print its absolute destination.
    Save {
        /// Data URI, URL, JSON upload descriptor, or (with --from-file) a local file.
        input: String,

        #[command(flatten)]
        args: UploadArgs,
    },

    /// Print where a source would be saved, without transferring anything.
    Resolve {
        /// Data URI, URL, JSON upload descriptor, or (with --from-file) a local file.
        input: String,

        /// Print the destination relative to the working directory.
        #[arg(long)]
        relative: bool,

        #[command(flatten)]
        args: UploadArgs,
    },

    /// Print the adapter that would handle a source.
    Detect {
        input: String,

        /// Treat INPUT as a path to a local file.
        #[arg(long)]
        from_file: bool,
    },

    /// Generate a shell completion script.
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Show the config file path and effective values.
    Config,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        cli.command.run()
    }

    pub fn run(self) -> Result<()> {
        match self {
            CliCommand::Save { input, args } => {
                let cfg = config::load_or_init()?;
                run_save(&cfg, &input, &args)?;
            }
            CliCommand::Resolve {
                input,
                relative,
                args,
            } => {
                let cfg = config::load_or_init()?;
                run_resolve(&cfg, &input, relative, &args)?;
            }
            CliCommand::Detect { input, from_file } => run_detect(&input, from_file)?,
            CliCommand::Completions { shell } => run_completions(shell)?,
            CliCommand::Config => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_config(&cfg)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
