use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Where the schedule lives and how to find shows inside its pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site root; show links on the index page are resolved against it.
    pub base_url: String,
    /// Path of the schedule index page relative to `base_url`.
    pub index_path: String,
    /// CSS selector for the region of the index page holding the show list.
    pub container_selector: String,
    /// CSS selector for one show element inside the container.
    pub show_selector: String,
    /// CSS selector for the time-slot text on a show's detail page.
    pub time_selector: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://www.kvrx.org".to_string(),
            index_path: "/schedule".to_string(),
            container_selector: "#single-day-container".to_string(),
            show_selector: ".field-content".to_string(),
            time_selector: ".program-times".to_string(),
        }
    }
}

/// FTP server receiving the schedule file and the run log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FtpConfig {
    pub host: String,
    pub port: u16,
    pub login: String,
    pub password: String,
}

impl Default for FtpConfig {
    fn default() -> Self {
        Self {
            host: "ftp.example.com".to_string(),
            port: 21,
            login: "anonymous".to_string(),
            password: String::new(),
        }
    }
}

/// Local files produced by a run. Their base names are the remote names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub schedule_file: PathBuf,
    pub log_file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            schedule_file: PathBuf::from("shows.txt"),
            log_file: PathBuf::from("downloader_log.txt"),
        }
    }
}

/// Page fetch limits (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Consecutive timeouts tolerated for one URL before giving up.
    pub max_retries: u32,
    /// Pause after every successful fetch, in milliseconds.
    pub delay_ms: u64,
    pub connect_timeout_secs: u64,
    /// Whole-request timeout; hitting it counts as a retryable timeout.
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_retries: 20,
            delay_ms: 500,
            connect_timeout_secs: 15,
            timeout_secs: 30,
        }
    }
}

impl FetchConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            delay: Duration::from_millis(self.delay_ms),
        }
    }
}

/// Global configuration loaded from `~/.config/kvrx/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KvrxConfig {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub ftp: FtpConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("kvrx")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from the default location, creating a default file if none exists.
pub fn load_or_init() -> Result<KvrxConfig> {
    let path = config_path()?;
    load_or_init_at(&path)
}

/// Like [`load_or_init`] for an explicit path (e.g. `--config`).
pub fn load_or_init_at(path: &Path) -> Result<KvrxConfig> {
    if !path.exists() {
        let default_cfg = KvrxConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: KvrxConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
