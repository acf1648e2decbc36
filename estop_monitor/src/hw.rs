//! Hardware boundary traits.
//!
//! The bring-up collaborator (clock enable, pin modes, pull-ups,
//! edge-sense programming, vector registration) owns the implementations;
//! the core consumes only these three capabilities and exposes only its
//! handler entry points in return. Implementation details of the
//! peripherals stay out of the core.

use estop_common::indicator::{ChannelId, Level};

/// The monitored stop line.
///
/// The collaborator guarantees the registered falling-edge handler runs
/// at the highest interrupt priority available on the platform.
pub trait StopLine: Send {
    /// Acknowledge the pending edge-detect condition for this line so it
    /// does not immediately re-fire.
    ///
    /// Must be safe to call when no genuine condition is pending
    /// (electrical bounce can raise spurious events); acknowledging is
    /// how an interrupt storm is avoided.
    fn clear_pending_edge(&mut self);
}

/// The fixed-rate periodic timer backing the annunciator.
pub trait TickTimer: Send {
    /// Acknowledge the timer expiry so the next period is scheduled.
    /// First action of every tick handler.
    fn clear_expiry(&mut self);

    /// Timer reload value: `clock_hz / ANNUNCIATOR_RATE_HZ`.
    fn period_ticks(&self) -> u32;
}

/// Side-effecting indicator output. No return value; setting a level
/// never fails and never blocks.
pub trait IndicatorOutput: Send {
    /// Drive one output bit to the given level.
    fn set_level(&mut self, channel: ChannelId, level: Level);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullLine;

    impl StopLine for NullLine {
        fn clear_pending_edge(&mut self) {}
    }

    struct NullOutput {
        last: Option<(ChannelId, Level)>,
    }

    impl IndicatorOutput for NullOutput {
        fn set_level(&mut self, channel: ChannelId, level: Level) {
            self.last = Some((channel, level));
        }
    }

    #[test]
    fn traits_are_object_safe() {
        let mut line: Box<dyn StopLine> = Box::new(NullLine);
        line.clear_pending_edge();
    }

    #[test]
    fn output_receives_channel_and_level() {
        let mut out = NullOutput { last: None };
        out.set_level(ChannelId(1), Level::On);
        assert_eq!(out.last, Some((ChannelId(1), Level::On)));
    }
}
