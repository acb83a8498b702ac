use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub youtube: YouTubeConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub quota: QuotaConfig,

    #[serde(default)]
    pub library: LibraryConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct YouTubeConfig {
    /// YouTube Data API v3 key. Remote fetches are disabled while empty.
    #[serde(default)]
    pub api_key: String,

    /// Application name sent with every request
    #[serde(default = "default_application_name")]
    pub application_name: String,

    /// Base URL of the Data API (override for testing)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            application_name: default_application_name(),
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl YouTubeConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_application_name() -> String {
    "tubemeta".to_string()
}

fn default_base_url() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Cache root; records live under `<dir>/youtubemetadata/`
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,

    /// Records older than this are refetched (default: 48)
    #[serde(default = "default_max_age_hours")]
    pub max_age_hours: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            max_age_hours: default_max_age_hours(),
        }
    }
}

impl CacheConfig {
    /// Cache root with a leading `~` expanded.
    pub fn resolved_dir(&self) -> PathBuf {
        let raw = self.dir.to_string_lossy();
        PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
    }

    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_hours.saturating_mul(60 * 60))
    }
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("~/.cache/tubemeta")
}

fn default_max_age_hours() -> u64 {
    48
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuotaConfig {
    /// Total attempts per fetch, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Extra wait after the daily quota reset at UTC midnight
    #[serde(default = "default_safety_margin")]
    pub safety_margin_secs: u64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            safety_margin_secs: default_safety_margin(),
        }
    }
}

fn default_max_attempts() -> u32 {
    2
}

fn default_safety_margin() -> u64 {
    60
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LibraryConfig {
    /// Directories searched by the filesystem library lookup
    #[serde(default)]
    pub paths: Vec<PathBuf>,
}
