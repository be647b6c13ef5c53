use anyhow::{Context, Result};
use common::PowerState;
use std::collections::BTreeMap;
use tokio::process::Command;

use crate::config::DisplaySettings;

/// Display power control
#[allow(async_fn_in_trait)]
pub trait DisplayPower {
    async fn set_power(&mut self, state: PowerState) -> Result<()>;
}

/// Switches the display by running an external command per state
/// (`xset dpms force on|off` by default)
#[derive(Debug, Clone)]
pub struct CommandDisplay {
    on: Vec<String>,
    off: Vec<String>,
    env: BTreeMap<String, String>,
}

impl CommandDisplay {
    pub fn new(settings: &DisplaySettings) -> Self {
        Self {
            on: settings.on.clone(),
            off: settings.off.clone(),
            env: settings.env.clone(),
        }
    }

    fn command_for(&self, state: PowerState) -> &[String] {
        match state {
            PowerState::On => &self.on,
            PowerState::Off => &self.off,
        }
    }
}

impl DisplayPower for CommandDisplay {
    async fn set_power(&mut self, state: PowerState) -> Result<()> {
        let (program, args) = self
            .command_for(state)
            .split_first()
            .with_context(|| format!("No display command configured for '{}'", state))?;

        log::debug!("Switching display {}: {} {}", state, program, args.join(" "));

        let output = Command::new(program)
            .args(args)
            .envs(&self.env)
            .output()
            .await
            .with_context(|| format!("Failed to execute {}", program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "Switching display {} failed ({}): {}",
                state,
                output.status,
                stderr.trim()
            );
        }

        log::info!("Display {}", state);
        Ok(())
    }
}
