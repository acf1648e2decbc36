//! System-wide constants for the E-stop monitor workspace.
//!
//! Single source of truth for timing and bank limits, imported by all
//! workspace crates.

/// Periodic annunciator rate [Hz]. One tick every 10 ms.
pub const ANNUNCIATOR_RATE_HZ: u32 = 100;

/// Periodic annunciator period [µs], derived from the rate.
pub const ANNUNCIATOR_PERIOD_US: u64 = 1_000_000 / ANNUNCIATOR_RATE_HZ as u64;

/// Default system clock frequency [Hz].
pub const DEFAULT_CLOCK_HZ: u32 = 120_000_000;

/// Maximum number of indicator output channels.
pub const MAX_CHANNELS: usize = 8;

/// Maximum number of digital input lines.
pub const MAX_INPUT_LINES: usize = 64;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config/monitor.toml";

/// Timer reload value for the periodic annunciator.
///
/// The hardware timer counts down from this value at `clock_hz`, so the
/// cadence is reproducible on any target clock:
/// `period_ticks = clock_hz / ANNUNCIATOR_RATE_HZ`
/// (e.g. 120 MHz / 100 Hz = 1,200,000 ticks).
#[inline]
pub const fn period_ticks(clock_hz: u32) -> u32 {
    clock_hz / ANNUNCIATOR_RATE_HZ
}
