use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Transport settings for the Url adapter (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-transfer timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum number of redirects followed.
    pub max_redirections: u32,
    /// User-Agent header sent with requests.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 300,
            max_redirections: 10,
            user_agent: Some(concat!("fileup/", env!("CARGO_PKG_VERSION")).to_string()),
        }
    }
}

/// Global configuration loaded from `~/.config/fileup/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileupConfig {
    /// Default working directory; the CLI falls back to the current directory.
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
    /// Prefix prepended to every saved filename.
    #[serde(default)]
    pub prefix: Option<String>,
    /// Replace an existing file at the destination.
    #[serde(default)]
    pub overwrite: bool,
    /// Create the destination's parent directory when missing.
    #[serde(default)]
    pub create_dir: bool,
    /// Default directory under the working directory.
    #[serde(default)]
    pub directory: Option<String>,
    /// Permission bits applied after moving a multipart upload into place.
    #[serde(default = "default_upload_mode")]
    pub upload_mode: u32,
    #[serde(default)]
    pub fetch: FetchConfig,
}

fn default_upload_mode() -> u32 {
    0o755
}

impl Default for FileupConfig {
    fn default() -> Self {
        Self {
            working_dir: None,
            prefix: None,
            overwrite: false,
            create_dir: false,
            directory: None,
            upload_mode: default_upload_mode(),
            fetch: FetchConfig::default(),
        }
    }
}

impl FileupConfig {
    /// Pretty TOML, as written to the config file.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("fileup")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FileupConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FileupConfig::default();
        let toml = default_cfg.to_toml()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: FileupConfig = toml::from_str(&data)?;
    Ok(cfg)
}
