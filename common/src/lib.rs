//! Common types and utilities for catkiosk.
//!
//! This crate holds everything the kiosk daemon does that does not touch the
//! operating system or the network: reading video lists, decoding the
//! durations reported by the metadata service, deciding whether the current
//! hour allows playback, and planning the playback window.
//!
//! # Examples
//!
//! ```
//! use common::{PlaybackTiming, Schedule, plan_playback, parse_video_list, VideoListFormat};
//! use std::time::Duration;
//!
//! let text = "# cats\n0123456789abcdef0123456789abcdefdQw4w9WgXcQ\n";
//! let ids = parse_video_list(text, &VideoListFormat::default());
//! assert_eq!(ids[0].as_str(), "dQw4w9WgXcQ");
//!
//! let schedule = Schedule::default();
//! assert!(schedule.period_at(10, false).is_some());
//!
//! let timing = PlaybackTiming::default();
//! let plan = plan_playback(None, &timing, &mut rand::rng());
//! assert_eq!(plan.start, Duration::ZERO);
//! ```

pub mod iso8601;
pub mod playback;
pub mod schedule;
pub mod videos;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use iso8601::parse_duration;
pub use playback::{PlaybackPlan, PlaybackTiming, plan_playback};
pub use schedule::{Period, Schedule};
pub use videos::{VideoId, VideoListFormat, load_video_list, parse_video_list};

/// Errors shared between the library and the daemon.
#[derive(Error, Debug)]
pub enum KioskError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid ISO-8601 duration '{0}'")]
    InvalidDuration(String),

    #[error("Video list is empty: {0}")]
    EmptyList(String),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),
}

/// Power state of the kiosk display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    On,
    Off,
}

impl std::fmt::Display for PowerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PowerState::On => write!(f, "on"),
            PowerState::Off => write!(f, "off"),
        }
    }
}
