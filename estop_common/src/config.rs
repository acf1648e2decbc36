//! TOML configuration loader with validation.
//!
//! Loads `MonitorConfig` from a TOML file and validates: clock/rate
//! divisibility, channel bank bounds, and pin uniqueness across the
//! shared port (stop line and both indicator bits).

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::consts::{ANNUNCIATOR_RATE_HZ, DEFAULT_CLOCK_HZ, MAX_CHANNELS, MAX_INPUT_LINES};
use crate::indicator::ChannelId;

// ─── Error Type ─────────────────────────────────────────────────────

/// Configuration loading/validation error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("config I/O error: {0}")]
    Io(String),

    /// TOML parse error.
    #[error("config parse error: {0}")]
    Parse(String),

    /// Parameter validation error.
    #[error("config validation: {0}")]
    Validation(String),
}

// ─── Config Types ───────────────────────────────────────────────────

/// Stop line input configuration.
///
/// The line is HIGH when the stop condition is inactive and pulled LOW
/// by the manual switch or an external fault. A weak pull-up keeps it
/// HIGH when nothing drives it.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StopLineConfig {
    /// Digital input line the stop signal is wired to.
    pub line: u8,
}

/// Indicator output channel assignment.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IndicatorsConfig {
    /// Channel driven by the foreground loop.
    pub foreground: ChannelId,
    /// Channel driven by the periodic annunciator.
    pub periodic: ChannelId,
}

/// Complete monitor configuration.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MonitorConfig {
    /// System clock frequency [Hz]. Must divide evenly by the
    /// annunciator rate so the 100 Hz cadence is exact.
    #[serde(default = "default_clock_hz")]
    pub clock_hz: u32,
    /// Stop line input.
    pub stop_line: StopLineConfig,
    /// Indicator channel assignment.
    pub indicators: IndicatorsConfig,
}

fn default_clock_hz() -> u32 {
    DEFAULT_CLOCK_HZ
}

impl MonitorConfig {
    /// Validate parameter bounds and pin assignment consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clock_hz == 0 {
            return Err(ConfigError::Validation("clock_hz must be non-zero".into()));
        }
        if self.clock_hz % ANNUNCIATOR_RATE_HZ != 0 {
            return Err(ConfigError::Validation(format!(
                "clock_hz {} not divisible by annunciator rate {} Hz",
                self.clock_hz, ANNUNCIATOR_RATE_HZ
            )));
        }
        if self.stop_line.line as usize >= MAX_INPUT_LINES {
            return Err(ConfigError::Validation(format!(
                "stop line {} out of range [0, {})",
                self.stop_line.line, MAX_INPUT_LINES
            )));
        }
        for (name, ch) in [
            ("foreground", self.indicators.foreground),
            ("periodic", self.indicators.periodic),
        ] {
            if ch.0 as usize >= MAX_CHANNELS {
                return Err(ConfigError::Validation(format!(
                    "{name} channel {ch} out of range [0, {MAX_CHANNELS})"
                )));
            }
        }
        if self.indicators.foreground == self.indicators.periodic {
            return Err(ConfigError::Validation(format!(
                "foreground and periodic indicators share channel {}",
                self.indicators.foreground
            )));
        }
        // Indicator bits and the stop line live on the same port.
        for (name, ch) in [
            ("foreground", self.indicators.foreground),
            ("periodic", self.indicators.periodic),
        ] {
            if ch.0 == self.stop_line.line {
                return Err(ConfigError::Validation(format!(
                    "{name} channel {ch} collides with stop line {}",
                    self.stop_line.line
                )));
            }
        }
        Ok(())
    }
}

// ─── Loading Functions ──────────────────────────────────────────────

/// Load and validate the monitor configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<MonitorConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("failed to read {}: {e}", path.display())))?;
    load_config_from_str(&raw)
}

/// Load config from a TOML string (for testing).
pub fn load_config_from_str(raw: &str) -> Result<MonitorConfig, ConfigError> {
    let config: MonitorConfig =
        toml::from_str(raw).map_err(|e| ConfigError::Parse(format!("monitor config: {e}")))?;
    config.validate()?;
    Ok(config)
}
