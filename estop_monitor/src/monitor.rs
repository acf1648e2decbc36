//! Falling-edge monitor for the stop line.
//!
//! Runs in the highest-priority context. Converts a HIGH→LOW transition
//! into one idempotent write to the stop latch.

use std::sync::Arc;

use crate::context::ExecutionContext;
use crate::hw::StopLine;
use crate::latch::StopLatch;

/// Edge-triggered stop-line handler.
///
/// Owns the line handle; shares the latch with the reader contexts.
#[derive(Debug)]
pub struct EdgeMonitor<L: StopLine> {
    line: L,
    latch: Arc<StopLatch>,
}

impl<L: StopLine> EdgeMonitor<L> {
    /// Context this component's handler is registered under.
    pub const CONTEXT: ExecutionContext = ExecutionContext::EdgeMonitor;

    pub fn new(line: L, latch: Arc<StopLatch>) -> Self {
        Self { line, latch }
    }

    /// Falling-edge handler.
    ///
    /// Acknowledges the pending condition first — unconditionally, so a
    /// spurious event from contact bounce cannot leave the line pending
    /// and storm the interrupt — then latches the stop. Re-invocation
    /// while already asserted is a no-op on the latch value.
    pub fn on_falling_edge(&mut self) {
        self.line.clear_pending_edge();
        self.latch.set_asserted();
    }
}
