use chrono::{Local, Timelike};
use common::{Period, Schedule};

/// Source of the current hour
pub trait Clock {
    fn hour(&self) -> u32;
}

/// Wall clock in the local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn hour(&self) -> u32 {
        Local::now().hour()
    }
}

/// Scheduler state for time-based playback
#[derive(Debug, Clone)]
pub struct SchedulerState {
    /// Playback windows
    schedule: Schedule,

    /// Period of the previous check, used to log transitions
    active_period: Option<Period>,
}

impl SchedulerState {
    pub fn new(schedule: Schedule) -> Self {
        Self {
            schedule,
            active_period: None,
        }
    }

    /// Check the schedule and return the period to play in (if any)
    pub fn check(&mut self, hour: u32, night_enabled: bool) -> Option<Period> {
        let period = self.schedule.period_at(hour, night_enabled);

        if period != self.active_period {
            match period {
                Some(Period::Day) => log::info!(
                    "Day schedule activated ({:02}:00 - {:02}:59)",
                    self.schedule.morning,
                    self.schedule.end_of_crazy_time
                ),
                Some(Period::Night) => log::info!(
                    "Night schedule activated ({:02}:00 - {:02}:59)",
                    self.schedule.end_of_crazy_time,
                    self.schedule.bed_time
                ),
                None => log::info!("No active schedule"),
            }
            self.active_period = period;
        }

        period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_tracks_active_period() {
        let mut scheduler = SchedulerState::new(Schedule::default());
        assert_eq!(scheduler.active_period, None);

        assert_eq!(scheduler.check(10, true), Some(Period::Day));
        assert_eq!(scheduler.active_period, Some(Period::Day));

        assert_eq!(scheduler.check(21, true), Some(Period::Night));
        assert_eq!(scheduler.active_period, Some(Period::Night));

        assert_eq!(scheduler.check(2, true), None);
        assert_eq!(scheduler.active_period, None);
    }

    #[test]
    fn test_night_needs_night_list() {
        let mut scheduler = SchedulerState::new(Schedule::default());
        assert_eq!(scheduler.check(21, false), None);
    }

    #[test]
    fn test_local_clock_hour_is_valid() {
        assert!(LocalClock.hour() < 24);
    }
}
