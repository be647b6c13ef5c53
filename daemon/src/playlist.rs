use anyhow::{Context, Result};
use common::{KioskError, Period, VideoId, VideoListFormat, load_video_list};
use rand::Rng;
use rand::seq::IndexedRandom;
use std::path::{Path, PathBuf};

use crate::config::VideoSettings;

/// Day and night video lists.
///
/// Lists are read from disk on every pick, so edits take effect on the next
/// cycle without a restart.
#[derive(Debug, Clone)]
pub struct VideoLists {
    day: PathBuf,
    night: Option<PathBuf>,
    format: VideoListFormat,
}

impl VideoLists {
    pub fn new(settings: &VideoSettings) -> Self {
        Self {
            day: settings.day_path(),
            night: settings.night_path(),
            format: settings.format.clone(),
        }
    }

    /// Whether a night list is configured
    pub fn night_enabled(&self) -> bool {
        self.night.is_some()
    }

    /// Path of the list used in `period`
    pub fn path(&self, period: Period) -> Result<&Path> {
        match period {
            Period::Day => Ok(&self.day),
            Period::Night => self.night.as_deref().context("No night list configured"),
        }
    }

    /// Load the list for `period`
    pub fn load(&self, period: Period) -> Result<Vec<VideoId>> {
        let path = self.path(period)?;
        let ids = load_video_list(path, &self.format)
            .with_context(|| format!("Failed to load {} list", period))?;
        Ok(ids)
    }

    /// Pick one video from the list for `period` uniformly at random
    pub fn pick<R: Rng>(&self, period: Period, rng: &mut R) -> Result<VideoId> {
        let path = self.path(period)?;
        let ids = self.load(period)?;

        let video = ids
            .choose(rng)
            .cloned()
            .ok_or_else(|| KioskError::EmptyList(path.display().to_string()))?;

        log::info!(
            "Picked video {} out of {} in the {} list",
            video,
            ids.len(),
            period
        );

        Ok(video)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PREFIX: &str = "0123456789abcdef0123456789abcdef";

    fn list_file(ids: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# generated").unwrap();
        for id in ids {
            writeln!(file, "{PREFIX}{id}").unwrap();
        }
        file
    }

    fn lists(day: &Path, night: Option<&Path>) -> VideoLists {
        VideoLists::new(&VideoSettings {
            day: day.display().to_string(),
            night: night.map(|p| p.display().to_string()),
            format: VideoListFormat::default(),
        })
    }

    #[test]
    fn test_pick_from_day_list() {
        let day = list_file(&["a", "b", "c"]);
        let lists = lists(day.path(), None);
        let mut rng = StdRng::seed_from_u64(3);

        let mut seen = HashSet::new();
        for _ in 0..100 {
            seen.insert(lists.pick(Period::Day, &mut rng).unwrap());
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_pick_from_night_list() {
        let day = list_file(&["day"]);
        let night = list_file(&["night"]);
        let lists = lists(day.path(), Some(night.path()));
        let mut rng = StdRng::seed_from_u64(3);

        assert!(lists.night_enabled());
        assert_eq!(lists.pick(Period::Night, &mut rng).unwrap().as_str(), "night");
        assert_eq!(lists.pick(Period::Day, &mut rng).unwrap().as_str(), "day");
    }

    #[test]
    fn test_night_without_list_fails() {
        let day = list_file(&["day"]);
        let lists = lists(day.path(), None);

        assert!(!lists.night_enabled());
        assert!(lists.pick(Period::Night, &mut rand::rng()).is_err());
    }

    #[test]
    fn test_empty_list_fails() {
        let day = list_file(&[]);
        let lists = lists(day.path(), None);

        let err = lists.pick(Period::Day, &mut rand::rng()).unwrap_err();
        assert!(err.downcast_ref::<KioskError>().is_some());
    }

    #[test]
    fn test_missing_list_fails() {
        let lists = lists(Path::new("/nonexistent/videos.dat"), None);
        assert!(lists.pick(Period::Day, &mut rand::rng()).is_err());
    }
}
