use crate::KioskError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Opaque identifier of a video on the hosting platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoId(String);

impl VideoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Layout of a video list file.
///
/// Each retained line carries a fixed-width prefix (a hash or a date column,
/// depending on who curated the list) followed by the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoListFormat {
    /// Number of characters stripped from the start of every line
    #[serde(default = "default_prefix_width")]
    pub prefix_width: usize,

    /// Lines starting with this marker are ignored
    #[serde(default = "default_comment_marker")]
    pub comment_marker: String,
}

impl Default for VideoListFormat {
    fn default() -> Self {
        Self {
            prefix_width: default_prefix_width(),
            comment_marker: default_comment_marker(),
        }
    }
}

fn default_prefix_width() -> usize {
    32
}
fn default_comment_marker() -> String {
    "#".to_string()
}

/// Parse the contents of a video list.
///
/// Blank lines and comment lines are skipped. Lines that hold nothing past
/// the prefix are skipped with a warning.
pub fn parse_video_list(text: &str, format: &VideoListFormat) -> Vec<VideoId> {
    let mut ids = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if !format.comment_marker.is_empty() && line.starts_with(&format.comment_marker) {
            continue;
        }

        // Count characters, a byte offset could land inside a code point
        let id: String = line.chars().skip(format.prefix_width).collect();
        let id = id.trim();

        if id.is_empty() {
            log::warn!(
                "Skipping line {}: nothing after the {}-character prefix",
                line_no + 1,
                format.prefix_width
            );
            continue;
        }

        ids.push(VideoId::new(id));
    }

    ids
}

/// Read and parse a video list file
pub fn load_video_list(path: &Path, format: &VideoListFormat) -> Result<Vec<VideoId>, KioskError> {
    let text = fs::read_to_string(path).map_err(|source| KioskError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let ids = parse_video_list(&text, format);
    log::debug!("Loaded {} video(s) from {}", ids.len(), path.display());

    Ok(ids)
}
