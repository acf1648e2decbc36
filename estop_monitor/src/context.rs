//! Named execution contexts with a fixed total order of priority.
//!
//! The monitor runs on a single hardware thread with preemptive
//! interrupt priorities — no scheduler, no general-purpose tasks. Three
//! contexts exist, and the safety-critical edge context must preempt
//! everything else. On a hosted target the same total order maps onto
//! SCHED_FIFO priorities (one thread per context).

/// Execution context, ordered ascending by priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExecutionContext {
    /// Main loop: runs whenever no higher context is pending. Spins
    /// continuously, never suspends.
    Foreground,
    /// 100 Hz timer context: preempts the foreground loop.
    PeriodicTick,
    /// Falling-edge context: highest priority, preempts everything.
    EdgeMonitor,
}

impl ExecutionContext {
    /// Interrupt priority level (higher preempts lower).
    #[inline]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Foreground => 0,
            Self::PeriodicTick => 1,
            Self::EdgeMonitor => 2,
        }
    }

    /// SCHED_FIFO priority used when the context runs as a hosted RT
    /// thread. Preserves the interrupt total order.
    #[inline]
    pub const fn fifo_priority(self) -> i32 {
        80 + 5 * self.priority() as i32
    }

    /// Short name for logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Foreground => "foreground",
            Self::PeriodicTick => "periodic",
            Self::EdgeMonitor => "edge",
        }
    }
}

impl std::fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
