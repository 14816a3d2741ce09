use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::validate::ValidationMode;

/// Endpoint the original Android client shipped with. Deployment-specific;
/// override in config.toml, with `--resolver-url`, or `IGDL_RESOLVER_URL`.
pub const DEFAULT_RESOLVER_BASE_URL: &str =
    "https://script.google.com/macros/s/AKfycbyHQ9twIO2CKf4TFsPDHrB2JARDK66yVDlUrmPukDefHnWsAAnRuFjE8DR1R-qU-nC9/";

/// User-Agent attached to media transfers.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Android; Mobile)";

/// Remote resolver endpoint parameters (`[resolver]` in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Base URL; `exec?u=<encoded source url>` is appended.
    pub base_url: String,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Abort when no bytes arrive for this many seconds.
    pub read_timeout_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_RESOLVER_BASE_URL.to_string(),
            connect_timeout_secs: 30,
            read_timeout_secs: 30,
        }
    }
}

impl ResolverConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

/// Download submission parameters (`[download]` in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Public downloads directory. None = the user's download dir, else cwd.
    pub dir: Option<PathBuf>,
    /// User-Agent header sent with the media GET.
    pub user_agent: String,
    /// Connect timeout in seconds for the media transfer.
    pub connect_timeout_secs: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            dir: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout_secs: 30,
        }
    }
}

impl DownloadConfig {
    /// Directory the `PublicDownloads` target location resolves to.
    pub fn resolve_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Preview parameters (`[preview]` in config.toml).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Player argv (e.g. `["mpv", "--force-window"]`); the media URL is appended.
    /// None = print the URL instead of launching anything.
    pub player: Option<Vec<String>>,
}

/// Global configuration loaded from `~/.config/igdl/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IgdlConfig {
    /// How strictly source URLs are checked before resolution.
    pub validation: ValidationMode,
    pub resolver: ResolverConfig,
    pub download: DownloadConfig,
    pub preview: PreviewConfig,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("igdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<IgdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = IgdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load configuration from an explicit path. Missing fields take defaults.
pub fn load_from(path: &Path) -> Result<IgdlConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: IgdlConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
