use anyhow::{Context, Result};
use common::{PlaybackPlan, PlaybackTiming, PowerState, VideoId, plan_playback};
use reqwest::Url;
use std::future::Future;
use std::time::Duration;

use crate::browser::{Browser, embed_url};
use crate::config::Config;
use crate::display::DisplayPower;
use crate::log_and_continue;
use crate::playlist::VideoLists;
use crate::scheduler::{Clock, SchedulerState};
use crate::youtube::DurationLookup;

/// Result of one successful cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Outside every playback window
    Idle,
    /// A video was shown
    Played { video: VideoId, plan: PlaybackPlan },
}

/// The scheduler-player: decides, plays, rests, repeats
pub struct Kiosk<D, B, L, C> {
    display: D,
    browser: B,
    lookup: L,
    clock: C,
    scheduler: SchedulerState,
    lists: VideoLists,
    timing: PlaybackTiming,
    rest: Duration,
    embed_base: String,
}

impl<D, B, L, C> Kiosk<D, B, L, C>
where
    D: DisplayPower,
    B: Browser,
    L: DurationLookup,
    C: Clock,
{
    pub fn new(config: &Config, display: D, browser: B, lookup: L, clock: C) -> Self {
        Self {
            display,
            browser,
            lookup,
            clock,
            scheduler: SchedulerState::new(config.schedule.clone()),
            lists: VideoLists::new(&config.videos),
            timing: config.playback.timing(),
            rest: config.playback.rest_interval(),
            embed_base: config.youtube.embed_base.clone(),
        }
    }

    /// Run one cycle without the rest that follows it
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome> {
        let hour = self.clock.hour();

        let Some(period) = self.scheduler.check(hour, self.lists.night_enabled()) else {
            log::info!("Too early or too late for cat videos (hour {})", hour);
            return Ok(CycleOutcome::Idle);
        };

        let video = self.lists.pick(period, &mut rand::rng())?;

        let duration = self.lookup.video_duration(&video).await;
        let plan = plan_playback(duration, &self.timing, &mut rand::rng());
        log::info!(
            "Playing {} from {}s for {}s{}",
            video,
            plan.start.as_secs(),
            plan.play_for.as_secs(),
            if duration.is_none() {
                " (duration unknown)"
            } else {
                ""
            }
        );

        let url = embed_url(&self.embed_base, &video, plan.start)?;
        self.play(&url, plan.play_for).await?;

        Ok(CycleOutcome::Played { video, plan })
    }

    async fn play(&mut self, url: &Url, play_for: Duration) -> Result<()> {
        self.display
            .set_power(PowerState::On)
            .await
            .context("Failed to switch display on")?;

        if let Err(e) = self.browser.open(url).await {
            log_and_continue!(
                self.display.set_power(PowerState::Off).await,
                "switch display off"
            );
            return Err(e);
        }

        tokio::time::sleep(play_for).await;

        // Both steps run even if the first one fails
        let closed = self.browser.close().await;
        let switched_off = self
            .display
            .set_power(PowerState::Off)
            .await
            .context("Failed to switch display off");

        closed?;
        switched_off
    }

    /// Run one cycle, log its failure if any, then rest.
    ///
    /// Never returns an error: a failed cycle is abandoned and `None` is
    /// returned after the rest interval.
    pub async fn step(&mut self) -> Option<CycleOutcome> {
        let outcome = match self.run_cycle().await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                log::error!("Cycle failed: {:#}", e);
                None
            }
        };

        log::info!("Resting for {}s", self.rest.as_secs());
        tokio::time::sleep(self.rest).await;

        outcome
    }

    /// Loop until `shutdown` resolves, then close the browser and switch
    /// the display off
    pub async fn run<F: Future<Output = ()>>(&mut self, shutdown: F) {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = self.step() => {}
            }
        }

        self.shutdown().await;
    }

    pub async fn shutdown(&mut self) {
        log_and_continue!(self.browser.close().await, "close browser");
        log_and_continue!(
            self.display.set_power(PowerState::Off).await,
            "switch display off"
        );
    }
}
