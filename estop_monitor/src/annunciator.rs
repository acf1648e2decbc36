//! Periodic annunciator: 100 Hz level-follower.
//!
//! Invoked from the timer context every 10 ms, independent of the
//! foreground loop's own rate. Each tick acknowledges the timer expiry
//! and mirrors the latch's current value onto its indicator channel —
//! every period, not just at transitions.

use std::sync::Arc;

use estop_common::indicator::{ChannelId, IndicatorChannel, Level};

use crate::context::ExecutionContext;
use crate::hw::{IndicatorOutput, TickTimer};
use crate::latch::StopLatch;

/// Timer-driven indicator follower.
///
/// Sole writer of its indicator channel. The tick body is trivially
/// bounded: one atomic load, one output write, no blocking, no
/// allocation — well inside the 10 ms period.
#[derive(Debug)]
pub struct PeriodicAnnunciator<T: TickTimer, O: IndicatorOutput> {
    timer: T,
    output: O,
    channel: IndicatorChannel,
    latch: Arc<StopLatch>,
    ticks: u64,
}

impl<T: TickTimer, O: IndicatorOutput> PeriodicAnnunciator<T, O> {
    /// Context this component's handler is registered under.
    pub const CONTEXT: ExecutionContext = ExecutionContext::PeriodicTick;

    pub fn new(timer: T, output: O, channel: ChannelId, latch: Arc<StopLatch>) -> Self {
        Self {
            timer,
            output,
            channel: IndicatorChannel::new(channel),
            latch,
            ticks: 0,
        }
    }

    /// Timer expiry handler.
    ///
    /// Acknowledges the expiry first so the next period is correctly
    /// scheduled, then drives the channel to the latch's current value.
    pub fn on_tick(&mut self) {
        self.timer.clear_expiry();
        let level = Level::from_asserted(self.latch.is_asserted());
        self.output.set_level(self.channel.id(), level);
        self.channel.set(level);
        self.ticks += 1;
    }

    /// The channel this annunciator drives (last driven level included).
    pub const fn channel(&self) -> &IndicatorChannel {
        &self.channel
    }

    /// Ticks handled since construction.
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Timer reload value the cadence is derived from.
    pub fn period_ticks(&self) -> u32 {
        self.timer.period_ticks()
    }
}
