use rand::Rng;
use std::time::Duration;

/// Limits applied when planning a playback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackTiming {
    /// Longest time a single video is shown, also the fallback play time
    pub max_play_time: Duration,

    /// Kept clear at the end of the video
    pub safety_buffer: Duration,
}

impl Default for PlaybackTiming {
    fn default() -> Self {
        Self {
            max_play_time: Duration::from_secs(60 * 60),
            safety_buffer: Duration::from_secs(30),
        }
    }
}

/// Where to start a video and for how long to show it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackPlan {
    pub start: Duration,
    pub play_for: Duration,
}

/// Plan a playback of a video of (possibly unknown) length.
///
/// With a known duration `D`, max play time `P` and buffer `B`, the start
/// offset is drawn uniformly from `[0, D - P - B)` in whole seconds, or is 0
/// when that range is empty. The play time is `min(P, D - B)`.
///
/// Without a duration the video starts at 0 and plays for `P`.
pub fn plan_playback<R: Rng>(
    duration: Option<Duration>,
    timing: &PlaybackTiming,
    rng: &mut R,
) -> PlaybackPlan {
    let Some(duration) = duration else {
        return PlaybackPlan {
            start: Duration::ZERO,
            play_for: timing.max_play_time,
        };
    };

    let max_play = timing.max_play_time.as_secs();
    let buffer = timing.safety_buffer.as_secs();
    let total = duration.as_secs();

    let window = total.saturating_sub(max_play).saturating_sub(buffer);
    let start = if window == 0 {
        0
    } else {
        rng.random_range(0..window)
    };

    let play_for = max_play.min(total.saturating_sub(buffer));

    PlaybackPlan {
        start: Duration::from_secs(start),
        play_for: Duration::from_secs(play_for),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn timing(max_play: u64, buffer: u64) -> PlaybackTiming {
        PlaybackTiming {
            max_play_time: Duration::from_secs(max_play),
            safety_buffer: Duration::from_secs(buffer),
        }
    }

    #[test]
    fn test_unknown_duration_uses_defaults() {
        let mut rng = StdRng::seed_from_u64(7);
        let plan = plan_playback(None, &timing(3600, 30), &mut rng);

        assert_eq!(plan.start, Duration::ZERO);
        assert_eq!(plan.play_for, Duration::from_secs(3600));
    }

    #[test]
    fn test_short_video_starts_at_zero() {
        let mut rng = StdRng::seed_from_u64(7);
        // 10 minutes of video, one hour allowed
        let plan = plan_playback(Some(Duration::from_secs(600)), &timing(3600, 30), &mut rng);

        assert_eq!(plan.start, Duration::ZERO);
        assert_eq!(plan.play_for, Duration::from_secs(570));
    }

    #[test]
    fn test_exact_fit_starts_at_zero() {
        let mut rng = StdRng::seed_from_u64(7);
        let plan = plan_playback(Some(Duration::from_secs(3630)), &timing(3600, 30), &mut rng);

        assert_eq!(plan.start, Duration::ZERO);
        assert_eq!(plan.play_for, Duration::from_secs(3600));
    }

    #[test]
    fn test_long_video_start_stays_in_window() {
        let mut rng = StdRng::seed_from_u64(42);
        let duration = Duration::from_secs(4 * 3600);
        let window = 4 * 3600 - 3600 - 30;

        let mut saw_nonzero = false;
        for _ in 0..500 {
            let plan = plan_playback(Some(duration), &timing(3600, 30), &mut rng);
            assert!(plan.start.as_secs() < window);
            assert_eq!(plan.play_for, Duration::from_secs(3600));
            saw_nonzero |= plan.start > Duration::ZERO;
        }
        assert!(saw_nonzero);
    }

    #[test]
    fn test_video_shorter_than_buffer() {
        let mut rng = StdRng::seed_from_u64(1);
        let plan = plan_playback(Some(Duration::from_secs(20)), &timing(3600, 30), &mut rng);

        assert_eq!(plan.start, Duration::ZERO);
        assert_eq!(plan.play_for, Duration::ZERO);
    }
}
