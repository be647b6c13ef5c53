use anyhow::{Context, Result};
use common::VideoId;
use reqwest::Client;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::config::YouTubeSettings;

/// Source of video durations.
///
/// A lookup never fails: anything that goes wrong is reported as an unknown
/// duration and the caller falls back to default timing.
#[allow(async_fn_in_trait)]
pub trait DurationLookup {
    async fn video_duration(&self, id: &VideoId) -> Option<Duration>;
}

/// API credentials file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub youtube_api_key: Option<String>,
}

impl Credentials {
    /// Load credentials, a missing file means no key
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::warn!(
                "Credentials file not found at {}, durations will not be looked up",
                path.display()
            );
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read credentials file: {}", path.display()))?;

        let credentials: Credentials = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse credentials file: {}", path.display()))?;

        Ok(credentials)
    }
}

/// `videos` endpoint response, only the fields we read
#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    content_details: ContentDetails,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: String,
}

/// YouTube Data API client
pub struct YouTubeClient {
    http_client: Client,
    api_base: String,
    api_key: Option<String>,
}

impl YouTubeClient {
    pub fn new(settings: &YouTubeSettings, api_key: Option<String>) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Query the duration of one video
    pub async fn fetch_duration(&self, id: &VideoId) -> Result<Duration> {
        let key = self.api_key.as_deref().context("No API key configured")?;

        let response = self
            .http_client
            .get(format!("{}/videos", self.api_base))
            .query(&[("id", id.as_str()), ("part", "contentDetails"), ("key", key)])
            .send()
            .await
            // The URL carries the API key
            .map_err(reqwest::Error::without_url)
            .context("Metadata request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("Metadata service returned status: {}", response.status());
        }

        let body: VideoListResponse = response
            .json()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to decode metadata response")?;

        let item = body
            .items
            .into_iter()
            .next()
            .with_context(|| format!("Metadata service knows no video {}", id))?;

        Ok(common::parse_duration(&item.content_details.duration)?)
    }
}

impl DurationLookup for YouTubeClient {
    async fn video_duration(&self, id: &VideoId) -> Option<Duration> {
        if !self.has_api_key() {
            log::debug!("No API key, skipping duration lookup for {}", id);
            return None;
        }

        match self.fetch_duration(id).await {
            Ok(duration) => {
                log::info!("Video {} is {}s long", id, duration.as_secs());
                Some(duration)
            }
            Err(e) => {
                log::warn!("Duration lookup for {} failed: {:#}", id, e);
                None
            }
        }
    }
}
