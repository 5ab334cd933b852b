//! CLI command handlers, one per file.

mod completions;
mod config;
mod detect;
mod resolve;
mod save;

pub use completions::run_completions;
pub use config::run_config;
pub use detect::run_detect;
pub use resolve::run_resolve;
pub use save::run_save;
