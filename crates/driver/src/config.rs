use std::time::Duration;

use anyhow::{Result, ensure};
use cubelight::{
    BROADCAST_CHANNEL, DEFAULT_BACKOFF, DEFAULT_EFFECT_PERIOD, DEFAULT_PORT,
    DEFAULT_TICK_INTERVAL, DEFAULT_TRANSITION, EffectKind, EffectRegistry, GRID_DIM, command,
};

#[derive(Debug, Clone)]
pub struct DriverConfig {
    pub target: String,
    pub default_port: u16,
    pub pinned_effect: Option<usize>,
    pub period_secs: f64,
    pub transition_secs: f64,
    pub tick_interval: Duration,
    pub backoff: Duration,
    pub channel: u8,
    pub command: u8,
    pub grid_dim: usize,
    pub decoupled: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            target: format!("127.0.0.1:{}", DEFAULT_PORT),
            default_port: DEFAULT_PORT,
            pinned_effect: None,
            period_secs: DEFAULT_EFFECT_PERIOD,
            transition_secs: DEFAULT_TRANSITION,
            tick_interval: DEFAULT_TICK_INTERVAL,
            backoff: DEFAULT_BACKOFF,
            channel: BROADCAST_CHANNEL,
            command: command::SET_PIXEL_COLORS,
            grid_dim: GRID_DIM,
            decoupled: false,
        }
    }
}

impl DriverConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.period_secs.is_finite() && self.period_secs > 0.0,
            "effect period must be positive, got {}",
            self.period_secs
        );
        ensure!(
            self.transition_secs >= 0.0 && self.transition_secs <= self.period_secs,
            "transition of {}s does not fit in a {}s period",
            self.transition_secs,
            self.period_secs
        );
        ensure!(!self.tick_interval.is_zero(), "tick interval must be non-zero");
        Ok(())
    }

    /// The playlist to cycle through. A pinned index outside the built-in
    /// list is ignored.
    pub fn registry(&self) -> EffectRegistry {
        match self.pinned_effect {
            None => EffectRegistry::builtin(),
            Some(index) => match EffectKind::from_index(index) {
                Some(kind) => {
                    log::info!("Pinned to effect {} ({})", index, kind.as_str());
                    EffectRegistry::pinned(kind)
                }
                None => {
                    log::warn!(
                        "Effect index {} out of range (0-{}), cycling all effects",
                        index,
                        EffectKind::ALL.len() - 1
                    );
                    EffectRegistry::builtin()
                }
            },
        }
    }
}
