//! Simulation backend: software-emulated stop line, timer, and
//! indicator bank for development and testing without physical hardware.
//!
//! Each peripheral is split into the handle the core component owns
//! (implementing the [`hw`](crate::hw) trait) and a probe the test
//! harness keeps for injecting events and observing acknowledgements.

use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use estop_common::consts::{MAX_CHANNELS, period_ticks};
use estop_common::indicator::{ChannelId, Level};

use crate::hw::{IndicatorOutput, StopLine, TickTimer};

/// Bounded indicator transition trace length.
const TRACE_CAPACITY: usize = 64;

// ─── Stop Line ──────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct SimLineState {
    /// Pending edge-detect condition (the hardware interrupt flag).
    pending: AtomicBool,
    /// Acknowledgements performed by the edge handler.
    acks: AtomicU32,
}

/// Simulated stop line, owned by the edge monitor.
#[derive(Debug)]
pub struct SimStopLine {
    state: Arc<SimLineState>,
}

impl StopLine for SimStopLine {
    fn clear_pending_edge(&mut self) {
        self.state.pending.store(false, Ordering::Release);
        self.state.acks.fetch_add(1, Ordering::AcqRel);
    }
}

/// Harness-side probe for the simulated stop line.
#[derive(Debug, Clone)]
pub struct SimLineProbe {
    state: Arc<SimLineState>,
}

impl SimLineProbe {
    /// Raise the edge-detect condition, as the hardware would on a
    /// HIGH→LOW transition. Repeated calls model contact bounce.
    pub fn inject_edge(&self) {
        self.state.pending.store(true, Ordering::Release);
    }

    /// Whether an unacknowledged edge condition is pending.
    pub fn pending(&self) -> bool {
        self.state.pending.load(Ordering::Acquire)
    }

    /// Total acknowledgements performed by the handler.
    pub fn ack_count(&self) -> u32 {
        self.state.acks.load(Ordering::Acquire)
    }
}

/// Create a simulated stop line and its probe.
pub fn sim_stop_line() -> (SimStopLine, SimLineProbe) {
    let state = Arc::new(SimLineState::default());
    (
        SimStopLine {
            state: Arc::clone(&state),
        },
        SimLineProbe { state },
    )
}

// ─── Periodic Timer ─────────────────────────────────────────────────

#[derive(Debug, Default)]
struct SimTimerState {
    /// Expiry condition (the hardware timeout flag).
    expired: AtomicBool,
    /// Acknowledgements performed by the tick handler.
    acks: AtomicU32,
}

/// Simulated periodic timer, owned by the annunciator.
#[derive(Debug)]
pub struct SimTickTimer {
    state: Arc<SimTimerState>,
    reload: u32,
}

impl TickTimer for SimTickTimer {
    fn clear_expiry(&mut self) {
        self.state.expired.store(false, Ordering::Release);
        self.state.acks.fetch_add(1, Ordering::AcqRel);
    }

    fn period_ticks(&self) -> u32 {
        self.reload
    }
}

/// Harness-side probe for the simulated timer.
#[derive(Debug, Clone)]
pub struct SimTimerProbe {
    state: Arc<SimTimerState>,
}

impl SimTimerProbe {
    /// Raise the expiry condition, as the hardware would on timeout.
    pub fn expire(&self) {
        self.state.expired.store(true, Ordering::Release);
    }

    /// Whether an unacknowledged expiry is pending.
    pub fn expired(&self) -> bool {
        self.state.expired.load(Ordering::Acquire)
    }

    /// Total acknowledgements performed by the handler.
    pub fn ack_count(&self) -> u32 {
        self.state.acks.load(Ordering::Acquire)
    }
}

/// Create a simulated timer with the reload value for `clock_hz`.
pub fn sim_tick_timer(clock_hz: u32) -> (SimTickTimer, SimTimerProbe) {
    let state = Arc::new(SimTimerState::default());
    (
        SimTickTimer {
            state: Arc::clone(&state),
            reload: period_ticks(clock_hz),
        },
        SimTimerProbe { state },
    )
}

// ─── Indicator Bank ─────────────────────────────────────────────────

#[derive(Debug)]
struct SimBankState {
    /// Per-channel output levels (word-sized so writers never tear).
    levels: [AtomicU8; MAX_CHANNELS],
    /// Bounded level-transition trace, observer side only.
    trace: Mutex<heapless::Vec<(ChannelId, Level), TRACE_CAPACITY>>,
}

impl Default for SimBankState {
    fn default() -> Self {
        Self {
            levels: std::array::from_fn(|_| AtomicU8::new(Level::Off.as_u8())),
            trace: Mutex::new(heapless::Vec::new()),
        }
    }
}

/// Simulated bank of indicator output bits.
///
/// Writer handles go to the driving components (one channel each, by
/// assignment); the bank itself stays with the harness for observation.
#[derive(Debug, Default)]
pub struct SimIndicatorBank {
    state: Arc<SimBankState>,
}

impl SimIndicatorBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer handle for one driving component.
    pub fn handle(&self) -> SimIndicatorHandle {
        SimIndicatorHandle {
            state: Arc::clone(&self.state),
        }
    }

    /// Current level of one channel.
    pub fn level(&self, channel: ChannelId) -> Level {
        Level::from_u8(self.state.levels[channel.0 as usize].load(Ordering::Acquire))
    }

    /// Level transitions observed so far, oldest first. The trace is
    /// bounded; transitions past capacity are dropped.
    pub fn transitions(&self) -> Vec<(ChannelId, Level)> {
        self.state
            .trace
            .lock()
            .map(|t| t.iter().copied().collect())
            .unwrap_or_default()
    }
}

/// Writer handle onto the simulated indicator bank.
#[derive(Debug)]
pub struct SimIndicatorHandle {
    state: Arc<SimBankState>,
}

impl IndicatorOutput for SimIndicatorHandle {
    fn set_level(&mut self, channel: ChannelId, level: Level) {
        let previous = self.state.levels[channel.0 as usize].swap(level.as_u8(), Ordering::AcqRel);
        if previous != level.as_u8() {
            if let Ok(mut trace) = self.state.trace.lock() {
                let _ = trace.push((channel, level));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_injection_sets_and_ack_clears_pending() {
        let (mut line, probe) = sim_stop_line();
        assert!(!probe.pending());
        probe.inject_edge();
        assert!(probe.pending());
        line.clear_pending_edge();
        assert!(!probe.pending());
        assert_eq!(probe.ack_count(), 1);
    }

    #[test]
    fn spurious_ack_is_safe() {
        // Acknowledging with no pending condition must not wedge anything.
        let (mut line, probe) = sim_stop_line();
        line.clear_pending_edge();
        assert!(!probe.pending());
        assert_eq!(probe.ack_count(), 1);
    }

    #[test]
    fn timer_reload_derives_from_clock() {
        let (timer, _probe) = sim_tick_timer(120_000_000);
        assert_eq!(timer.period_ticks(), 1_200_000);
    }

    #[test]
    fn timer_expiry_acknowledged() {
        let (mut timer, probe) = sim_tick_timer(120_000_000);
        probe.expire();
        assert!(probe.expired());
        timer.clear_expiry();
        assert!(!probe.expired());
        assert_eq!(probe.ack_count(), 1);
    }

    #[test]
    fn channels_are_independent() {
        // Setting one channel never alters another channel's level.
        let bank = SimIndicatorBank::new();
        let mut handle = bank.handle();
        handle.set_level(ChannelId(2), Level::On);
        assert_eq!(bank.level(ChannelId(2)), Level::On);
        assert_eq!(bank.level(ChannelId(1)), Level::Off);
    }

    #[test]
    fn trace_records_transitions_only() {
        let bank = SimIndicatorBank::new();
        let mut handle = bank.handle();
        handle.set_level(ChannelId(1), Level::On);
        handle.set_level(ChannelId(1), Level::On); // no transition
        handle.set_level(ChannelId(1), Level::Off);
        assert_eq!(
            bank.transitions(),
            vec![(ChannelId(1), Level::On), (ChannelId(1), Level::Off)]
        );
    }
}
