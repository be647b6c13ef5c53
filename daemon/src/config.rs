use crate::validate_enum;
use anyhow::{Context, Result};
use common::{PlaybackTiming, Schedule, VideoListFormat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralSettings,

    #[serde(default)]
    pub schedule: Schedule,

    #[serde(default)]
    pub playback: PlaybackSettings,

    #[serde(default)]
    pub videos: VideoSettings,

    #[serde(default)]
    pub youtube: YouTubeSettings,

    #[serde(default)]
    pub display: DisplaySettings,

    #[serde(default)]
    pub browser: BrowserSettings,
}

/// General daemon settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralSettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Playback timing, all values in seconds
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_max_play_time")]
    pub max_play_time: u64,

    #[serde(default = "default_rest_time")]
    pub rest_time: u64,

    #[serde(default = "default_safety_buffer")]
    pub safety_buffer: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            max_play_time: default_max_play_time(),
            rest_time: default_rest_time(),
            safety_buffer: default_safety_buffer(),
        }
    }
}

fn default_max_play_time() -> u64 {
    60 * 60
}
fn default_rest_time() -> u64 {
    60 * 60
}
fn default_safety_buffer() -> u64 {
    30
}

impl PlaybackSettings {
    pub fn timing(&self) -> PlaybackTiming {
        PlaybackTiming {
            max_play_time: Duration::from_secs(self.max_play_time),
            safety_buffer: Duration::from_secs(self.safety_buffer),
        }
    }

    pub fn rest_interval(&self) -> Duration {
        Duration::from_secs(self.rest_time)
    }
}

/// Video list files
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VideoSettings {
    #[serde(default = "default_day_list")]
    pub day: String,

    /// Night mode is disabled when unset
    #[serde(default)]
    pub night: Option<String>,

    #[serde(flatten)]
    pub format: VideoListFormat,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            day: default_day_list(),
            night: None,
            format: VideoListFormat::default(),
        }
    }
}

fn default_day_list() -> String {
    "videos.dat".to_string()
}

impl VideoSettings {
    pub fn day_path(&self) -> PathBuf {
        expand_path(&self.day)
    }

    pub fn night_path(&self) -> Option<PathBuf> {
        self.night.as_deref().map(expand_path)
    }
}

/// Metadata lookup settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct YouTubeSettings {
    /// TOML file holding `youtube_api_key`
    #[serde(default = "default_credentials")]
    pub credentials: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_embed_base")]
    pub embed_base: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for YouTubeSettings {
    fn default() -> Self {
        Self {
            credentials: default_credentials(),
            api_base: default_api_base(),
            embed_base: default_embed_base(),
            timeout: default_timeout(),
        }
    }
}

fn default_credentials() -> String {
    "credentials.toml".to_string()
}
fn default_api_base() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}
fn default_embed_base() -> String {
    "https://www.youtube.com/embed".to_string()
}
fn default_timeout() -> u64 {
    5
}

impl YouTubeSettings {
    pub fn credentials_path(&self) -> PathBuf {
        expand_path(&self.credentials)
    }
}

/// Commands used to switch the display on and off
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplaySettings {
    #[serde(default = "default_display_on")]
    pub on: Vec<String>,

    #[serde(default = "default_display_off")]
    pub off: Vec<String>,

    /// Extra environment for both commands (e.g. DISPLAY)
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            on: default_display_on(),
            off: default_display_off(),
            env: BTreeMap::new(),
        }
    }
}

fn default_display_on() -> Vec<String> {
    ["xset", "dpms", "force", "on"].map(String::from).to_vec()
}
fn default_display_off() -> Vec<String> {
    ["xset", "dpms", "force", "off"].map(String::from).to_vec()
}

/// Kiosk browser invocation; `{url}` is replaced by the embed URL
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BrowserSettings {
    #[serde(default = "default_browser_command")]
    pub command: Vec<String>,

    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            command: default_browser_command(),
            env: BTreeMap::new(),
        }
    }
}

fn default_browser_command() -> Vec<String> {
    vec!["firefox".to_string(), "--kiosk={url}".to_string()]
}

/// Expand `~` in a configured path
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}

impl Config {
    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded configuration from {}", path.display());
        config.validate()?;

        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("catkiosk");

        Ok(config_dir.join("config.toml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.validate_log_level(&self.general.log_level)?;

        self.schedule.validate()?;

        if self.playback.max_play_time == 0 {
            anyhow::bail!("playback.max_play_time must be greater than 0");
        }
        if self.playback.rest_time == 0 {
            anyhow::bail!("playback.rest_time must be greater than 0");
        }
        if self.youtube.timeout == 0 {
            anyhow::bail!("youtube.timeout must be greater than 0");
        }

        self.validate_command("display.on", &self.display.on)?;
        self.validate_command("display.off", &self.display.off)?;
        self.validate_command("browser.command", &self.browser.command)?;

        if !self.browser.command.iter().any(|arg| arg.contains("{url}")) {
            log::warn!("browser.command has no {{url}} placeholder, the video URL will not be passed");
        }

        Ok(())
    }

    fn validate_log_level(&self, level: &str) -> Result<()> {
        validate_enum!(level, "trace", "debug", "info", "warn", "error")
    }

    fn validate_command(&self, name: &str, command: &[String]) -> Result<()> {
        match command.first() {
            Some(program) if !program.trim().is_empty() => Ok(()),
            _ => anyhow::bail!("{} must name a program to run", name),
        }
    }
}
