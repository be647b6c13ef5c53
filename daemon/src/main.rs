mod browser;
mod config;
mod display;
mod kiosk;
mod macros;
mod playlist;
mod scheduler;
mod youtube;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use common::VideoId;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::signal::unix::{SignalKind, signal};

use crate::browser::KioskBrowser;
use crate::config::Config;
use crate::display::CommandDisplay;
use crate::kiosk::{CycleOutcome, Kiosk};
use crate::playlist::VideoLists;
use crate::scheduler::{Clock, LocalClock};
use crate::youtube::{Credentials, YouTubeClient};

#[derive(Parser)]
#[command(name = "catkiosk")]
#[command(about = "Scheduled kiosk video player", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API key for duration lookups, overrides the credentials file
    #[arg(long, env = "CATKIOSK_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play videos on schedule until stopped (default)
    Run {
        /// Run a single cycle without resting, then exit
        #[arg(long)]
        once: bool,
    },

    /// Validate the config and video lists
    Check,

    /// Look up the duration of a video
    Lookup {
        /// Video identifier
        id: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = match cli.config.clone() {
        Some(path) => Ok(path),
        None => Config::default_config_path(),
    };
    let loaded = config_path
        .as_ref()
        .map_err(|e| anyhow::anyhow!("{:#}", e))
        .and_then(|path| Config::load_from_path(path));

    let log_level = loaded
        .as_ref()
        .map(|cfg| cfg.general.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Some(Commands::Check) => check(loaded),
        Some(Commands::Lookup { ref id }) => match loaded {
            Ok(config) => lookup(&config, cli.api_key.clone(), id).await,
            Err(e) => Err(e),
        },
        Some(Commands::Run { once }) => {
            let config = config_or_default(loaded, config_path.ok());
            run(&config, cli.api_key.clone(), once).await
        }
        None => {
            let config = config_or_default(loaded, config_path.ok());
            run(&config, cli.api_key.clone(), false).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// The daemon never refuses to start over a bad config
fn config_or_default(loaded: Result<Config>, path: Option<PathBuf>) -> Config {
    match loaded {
        Ok(cfg) => {
            log::info!("✓ Configuration loaded successfully");
            log::info!("  Log level: {}", cfg.general.log_level);
            log::info!(
                "  Schedule: day {:02}-{:02}, night {:02}-{:02}",
                cfg.schedule.morning,
                cfg.schedule.end_of_crazy_time,
                cfg.schedule.end_of_crazy_time,
                cfg.schedule.bed_time
            );
            log::info!(
                "  Playback: up to {}s, rest {}s, buffer {}s",
                cfg.playback.max_play_time,
                cfg.playback.rest_time,
                cfg.playback.safety_buffer
            );
            log::info!("  Day list: {}", cfg.videos.day);
            match cfg.videos.night {
                Some(ref night) => log::info!("  Night list: {}", night),
                None => log::info!("  Night list: not configured"),
            }
            log::info!("  Browser: {}", cfg.browser.command.join(" "));
            cfg
        }
        Err(e) => {
            log::warn!("Failed to load config: {:#}. Using defaults.", e);
            if let Some(path) = path {
                log::info!("To create a config file, write {}", path.display());
            }
            Config::default()
        }
    }
}

fn api_key(config: &Config, override_key: Option<String>) -> Result<Option<String>> {
    if override_key.is_some() {
        return Ok(override_key);
    }
    let credentials = Credentials::load(&config.youtube.credentials_path())?;
    Ok(credentials.youtube_api_key)
}

async fn run(config: &Config, override_key: Option<String>, once: bool) -> Result<()> {
    log::info!("Starting catkiosk v{}", env!("CARGO_PKG_VERSION"));

    let key = match api_key(config, override_key) {
        Ok(key) => key,
        Err(e) => {
            log::warn!("{:#}, durations will not be looked up", e);
            None
        }
    };
    let lookup = YouTubeClient::new(&config.youtube, key)?;

    let mut kiosk = Kiosk::new(
        config,
        CommandDisplay::new(&config.display),
        KioskBrowser::new(&config.browser),
        lookup,
        LocalClock,
    );

    if once {
        let outcome = kiosk.run_cycle().await;
        kiosk.shutdown().await;
        return outcome.map(|outcome| log_outcome(&outcome));
    }

    let mut sigterm = signal(SignalKind::terminate()).context("Failed to setup SIGTERM handler")?;
    let mut sigint = signal(SignalKind::interrupt()).context("Failed to setup SIGINT handler")?;

    let shutdown = async move {
        tokio::select! {
            _ = sigterm.recv() => {
                log::info!("Received SIGTERM, shutting down...");
            }
            _ = sigint.recv() => {
                log::info!("Received SIGINT, shutting down...");
            }
        }
    };

    kiosk.run(shutdown).await;

    log::info!("Kiosk stopped");
    Ok(())
}

fn log_outcome(outcome: &CycleOutcome) {
    match outcome {
        CycleOutcome::Idle => log::info!("Nothing played, outside the schedule"),
        CycleOutcome::Played { video, plan } => log::info!(
            "Played {} from {}s for {}s",
            video,
            plan.start.as_secs(),
            plan.play_for.as_secs()
        ),
    }
}

fn check(loaded: Result<Config>) -> Result<()> {
    let config = loaded?;
    let lists = VideoLists::new(&config.videos);

    let day = lists.load(common::Period::Day)?;
    println!("Day list {}: {} video(s)", config.videos.day, day.len());

    if let Some(ref night) = config.videos.night {
        let night_ids = lists.load(common::Period::Night)?;
        println!("Night list {}: {} video(s)", night, night_ids.len());
    } else {
        println!("Night list: not configured");
    }

    let hour = LocalClock.hour();
    match config.schedule.period_at(hour, lists.night_enabled()) {
        Some(period) => println!("Current hour {:02}: {} playback", hour, period),
        None => println!("Current hour {:02}: no playback", hour),
    }

    Ok(())
}

async fn lookup(config: &Config, override_key: Option<String>, id: &str) -> Result<()> {
    let key = api_key(config, override_key)?.context("No API key configured")?;
    let client = YouTubeClient::new(&config.youtube, Some(key))?;

    let duration = client.fetch_duration(&VideoId::new(id)).await?;
    println!("{}: {}s", id, duration.as_secs());

    Ok(())
}
