//! # E-stop Safety Monitor Library
//!
//! Interrupt-driven emergency-stop monitor for a motor-control platform.
//! A single digital line is HIGH while the stop condition is inactive and
//! pulled LOW by the manual switch or an external fault. The monitor
//! latches the falling edge and mirrors the latched state onto two
//! independent indicator channels.
//!
//! ## Execution Contexts
//!
//! Three contexts run on a strict priority order (no scheduler):
//!
//! 1. **Edge monitor** — highest, preempts everything; acknowledges the
//!    edge and sets the latch.
//! 2. **Periodic annunciator** — 100 Hz tick; level-follows the latch
//!    onto its indicator channel.
//! 3. **Foreground loop** — lowest; spins forever, activating its own
//!    channel once the latch asserts.
//!
//! ## Cross-Context Safety
//!
//! The latch is the only shared mutable state: a single word-sized atomic
//! with one writer (the edge context) and two readers. Indicator channels
//! are each exclusively owned by one writer and need no synchronization.

#![deny(clippy::disallowed_types)]

pub mod annunciator;
pub mod context;
pub mod foreground;
pub mod hw;
pub mod latch;
pub mod monitor;
pub mod session;
pub mod sim;
