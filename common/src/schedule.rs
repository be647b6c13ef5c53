use crate::KioskError;
use serde::{Deserialize, Serialize};

/// Which list a cycle plays from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Regular playback from the daytime list
    Day,
    /// Lower-energy playback from the night list
    Night,
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Day => write!(f, "day"),
            Period::Night => write!(f, "night"),
        }
    }
}

/// Hour boundaries of the playback windows.
///
/// Both windows are inclusive on both ends. They share the
/// `end_of_crazy_time` hour, which belongs to the day window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// First hour of daytime playback
    #[serde(default = "default_morning")]
    pub morning: u32,

    /// Last hour of daytime playback, first hour of night playback
    #[serde(default = "default_end_of_crazy_time")]
    pub end_of_crazy_time: u32,

    /// Last hour of night playback
    #[serde(default = "default_bed_time")]
    pub bed_time: u32,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            morning: default_morning(),
            end_of_crazy_time: default_end_of_crazy_time(),
            bed_time: default_bed_time(),
        }
    }
}

fn default_morning() -> u32 {
    9
}
fn default_end_of_crazy_time() -> u32 {
    20
}
fn default_bed_time() -> u32 {
    22
}

impl Schedule {
    /// Check if `hour` falls in the daytime window
    pub fn is_daytime(&self, hour: u32) -> bool {
        hour >= self.morning && hour <= self.end_of_crazy_time
    }

    /// Check if `hour` falls in the night window
    pub fn is_night(&self, hour: u32) -> bool {
        hour >= self.end_of_crazy_time && hour <= self.bed_time
    }

    /// Decide which list (if any) to play from at `hour`.
    ///
    /// Night playback only happens when a night list exists.
    pub fn period_at(&self, hour: u32, night_enabled: bool) -> Option<Period> {
        if self.is_daytime(hour) {
            Some(Period::Day)
        } else if night_enabled && self.is_night(hour) {
            Some(Period::Night)
        } else {
            None
        }
    }

    pub fn validate(&self) -> Result<(), KioskError> {
        for (name, hour) in [
            ("morning", self.morning),
            ("end_of_crazy_time", self.end_of_crazy_time),
            ("bed_time", self.bed_time),
        ] {
            if hour >= 24 {
                return Err(KioskError::InvalidSchedule(format!(
                    "{name} must be 0-23, got {hour}"
                )));
            }
        }

        if self.morning > self.end_of_crazy_time || self.end_of_crazy_time > self.bed_time {
            return Err(KioskError::InvalidSchedule(format!(
                "expected morning <= end_of_crazy_time <= bed_time, got {} / {} / {}",
                self.morning, self.end_of_crazy_time, self.bed_time
            )));
        }

        Ok(())
    }
}
