//! Foreground loop: continuous non-blocking latch polling.
//!
//! Runs forever in the lowest-priority context, re-evaluating the latch
//! each iteration and activating its own indicator channel when a stop
//! has been latched. The absence of blocking is itself part of the
//! contract: future collaborators in this loop depend on it staying
//! responsive.

use std::sync::Arc;

use estop_common::indicator::{ChannelId, IndicatorChannel, Level};

use crate::context::ExecutionContext;
use crate::hw::IndicatorOutput;
use crate::latch::StopLatch;

/// Main-loop indicator driver.
///
/// Activation-only: once the latch asserts, the channel is driven `On`
/// and never deactivated, mirroring the latch's own one-way nature.
/// (The periodic annunciator is the symmetric level-follower.)
#[derive(Debug)]
pub struct ForegroundLoop<O: IndicatorOutput> {
    output: O,
    channel: IndicatorChannel,
    latch: Arc<StopLatch>,
}

impl<O: IndicatorOutput> ForegroundLoop<O> {
    /// Context this component runs in.
    pub const CONTEXT: ExecutionContext = ExecutionContext::Foreground;

    pub fn new(output: O, channel: ChannelId, latch: Arc<StopLatch>) -> Self {
        Self {
            output,
            channel: IndicatorChannel::new(channel),
            latch,
        }
    }

    /// One loop iteration. Never blocks.
    pub fn poll(&mut self) {
        if self.latch.is_asserted() {
            self.output.set_level(self.channel.id(), Level::On);
            self.channel.set(Level::On);
        }
    }

    /// The channel this loop drives (last driven level included).
    pub const fn channel(&self) -> &IndicatorChannel {
        &self.channel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingOutput {
        writes: Vec<(ChannelId, Level)>,
    }

    impl IndicatorOutput for RecordingOutput {
        fn set_level(&mut self, channel: ChannelId, level: Level) {
            self.writes.push((channel, level));
        }
    }

    fn foreground() -> (ForegroundLoop<RecordingOutput>, Arc<StopLatch>) {
        let latch = Arc::new(StopLatch::new());
        let fg = ForegroundLoop::new(RecordingOutput::default(), ChannelId(1), Arc::clone(&latch));
        (fg, latch)
    }

    #[test]
    fn idle_while_latch_clear() {
        let (mut fg, _latch) = foreground();
        for _ in 0..100 {
            fg.poll();
        }
        assert_eq!(fg.channel().level(), Level::Off);
        assert!(fg.output.writes.is_empty());
    }

    #[test]
    fn activates_on_next_poll_after_assert() {
        let (mut fg, latch) = foreground();
        fg.poll();
        latch.set_asserted();
        fg.poll();
        assert_eq!(fg.channel().level(), Level::On);
    }

    #[test]
    fn never_deactivates() {
        // One-way like the latch: no path drives the channel back Off.
        let (mut fg, latch) = foreground();
        latch.set_asserted();
        for _ in 0..50 {
            fg.poll();
        }
        assert_eq!(fg.channel().level(), Level::On);
        assert!(fg.output.writes.iter().all(|(_, l)| l.is_on()));
    }

    #[test]
    fn runs_in_lowest_priority_context() {
        assert_eq!(
            ForegroundLoop::<RecordingOutput>::CONTEXT.priority(),
            0
        );
    }
}
