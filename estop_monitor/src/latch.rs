//! The stop latch: one bit of cross-context state.
//!
//! Written from the edge-monitor context, read from the periodic and
//! foreground contexts. A bare flag is only accidentally safe on a
//! single-core, in-order target; the latch is an explicit atomic so the
//! guarantee holds by construction on any target.
//!
//! ## Atomicity mechanism
//!
//! A single naturally aligned word-sized store/load (`AtomicBool`), so no
//! reader can observe a torn value. `set_asserted` uses a `Release` store
//! and `is_asserted` an `Acquire` load: everything the edge context did
//! before asserting happens-before any read that observes the assertion,
//! with no staleness window beyond the in-flight read.

use std::sync::atomic::{AtomicBool, Ordering};

use static_assertions::assert_eq_size;

/// Persistent "a stop event has occurred" flag.
///
/// One-way by design: there is no clear operation. Once asserted the
/// latch stays asserted for the lifetime of the process; recovery
/// semantics are deliberately out of scope.
#[derive(Debug)]
pub struct StopLatch {
    asserted: AtomicBool,
}

// The atomicity argument requires a single naturally aligned word.
assert_eq_size!(StopLatch, u8);

impl StopLatch {
    /// Create a latch in the not-asserted state.
    ///
    /// `const` so the latch can live in a `static` for process-wide
    /// lifetime, matching its lifecycle contract.
    pub const fn new() -> Self {
        Self {
            asserted: AtomicBool::new(false),
        }
    }

    /// Latch the stop condition.
    ///
    /// Callable only from the edge-monitor context (the sole writer).
    /// Idempotent: storing `true` over `true` is a no-op with respect to
    /// the observable value.
    #[inline]
    pub fn set_asserted(&self) {
        self.asserted.store(true, Ordering::Release);
    }

    /// Whether a stop event has occurred.
    ///
    /// Callable from any context; never blocks, never allocates.
    #[inline]
    pub fn is_asserted(&self) -> bool {
        self.asserted.load(Ordering::Acquire)
    }
}

impl Default for StopLatch {
    fn default() -> Self {
        Self::new()
    }
}
