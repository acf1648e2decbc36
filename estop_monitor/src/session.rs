//! Hosted monitor session: bring-up plus threaded execution contexts.
//!
//! Builds the latch and the three components against the simulation
//! backend, then runs each context on its own thread with the fixed
//! priority order from [`context`](crate::context):
//!
//! - edge context: injects the scripted falling edge (plus bounce) and
//!   runs the edge handler;
//! - periodic context: absolute-deadline pacing at 100 Hz, drift-free;
//! - foreground context: spins on the calling thread, never sleeping.
//!
//! With the `rt` feature the process is `mlockall`ed and each context
//! thread requests the SCHED_FIFO priority for its context; without it
//! the RT calls are no-ops (simulation mode).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use estop_common::config::MonitorConfig;
use estop_common::consts::ANNUNCIATOR_PERIOD_US;
use estop_common::indicator::Level;
use thiserror::Error;
use tracing::{debug, warn};

use crate::annunciator::PeriodicAnnunciator;
use crate::context::ExecutionContext;
use crate::foreground::ForegroundLoop;
use crate::latch::StopLatch;
use crate::monitor::EdgeMonitor;
use crate::sim::{
    SimIndicatorBank, SimIndicatorHandle, SimLineProbe, SimStopLine, SimTickTimer, SimTimerProbe,
    sim_stop_line, sim_tick_timer,
};

// ─── Errors ─────────────────────────────────────────────────────────

/// Errors during session setup or execution.
#[derive(Debug, Error)]
pub enum SessionError {
    /// RT system call failed.
    #[error("RT setup error: {0}")]
    RtSetup(String),

    /// OS refused to start a context thread.
    #[error("failed to spawn {0} context: {1}")]
    Spawn(&'static str, String),

    /// A context thread panicked.
    #[error("context thread failed: {0}")]
    ContextPanicked(&'static str),
}

// ─── RT Setup ───────────────────────────────────────────────────────

/// Lock all current and future memory pages (prevent page faults in the
/// time-critical contexts).
///
/// No-op when the `rt` feature is not enabled.
#[cfg(feature = "rt")]
fn rt_mlockall() -> Result<(), SessionError> {
    use nix::sys::mman::{MlockAllFlags, mlockall};
    mlockall(MlockAllFlags::MCL_CURRENT | MlockAllFlags::MCL_FUTURE)
        .map_err(|e| SessionError::RtSetup(format!("mlockall failed: {e}")))?;
    Ok(())
}

#[cfg(not(feature = "rt"))]
fn rt_mlockall() -> Result<(), SessionError> {
    Ok(()) // No-op in simulation mode
}

/// Request SCHED_FIFO at the priority assigned to `context`.
///
/// Called from inside each context thread. No-op when the `rt` feature
/// is not enabled.
#[cfg(feature = "rt")]
fn rt_set_scheduler(context: ExecutionContext) -> Result<(), SessionError> {
    let param = libc::sched_param {
        sched_priority: context.fifo_priority(),
    };
    let ret = unsafe { libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) };
    if ret != 0 {
        let err = std::io::Error::last_os_error();
        return Err(SessionError::RtSetup(format!(
            "sched_setscheduler({context}) failed: {err}"
        )));
    }
    Ok(())
}

#[cfg(not(feature = "rt"))]
fn rt_set_scheduler(_context: ExecutionContext) -> Result<(), SessionError> {
    Ok(()) // No-op in simulation mode
}

/// Enter a context: apply its RT priority, warning instead of failing
/// so an unprivileged simulation run still works.
fn enter_context(context: ExecutionContext, rt: bool) {
    if !rt {
        return;
    }
    if let Err(e) = rt_set_scheduler(context) {
        warn!("{context}: running without RT priority: {e}");
    }
}

// ─── Options & Report ───────────────────────────────────────────────

/// Parameters for one simulated run.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Wall-clock duration of the run.
    pub run_for: Duration,
    /// When to pull the stop line LOW, measured from session start.
    /// `None` runs with the line inactive throughout.
    pub edge_at: Option<Duration>,
    /// Number of edge events the transition produces (≥1 models
    /// contact bounce).
    pub bounce: u32,
    /// Apply RT scheduling to the context threads.
    pub rt: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            run_for: Duration::from_secs(1),
            edge_at: None,
            bounce: 1,
            rt: false,
        }
    }
}

/// Observable outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReport {
    /// Final latch state.
    pub latch_asserted: bool,
    /// Final level of the foreground channel.
    pub foreground_level: Level,
    /// Final level of the periodic channel.
    pub periodic_level: Level,
    /// Timer expiries acknowledged by the annunciator.
    pub ticks: u32,
    /// Edge conditions acknowledged by the edge monitor.
    pub edge_acks: u32,
}

// ─── Session ────────────────────────────────────────────────────────

/// One fully wired monitor instance on the simulation backend.
///
/// Construction is the bring-up step: it performs every registration the
/// core exposes and hands each component its single indicator channel.
pub struct MonitorSession {
    config: MonitorConfig,
    latch: Arc<StopLatch>,
    monitor: EdgeMonitor<SimStopLine>,
    annunciator: PeriodicAnnunciator<SimTickTimer, SimIndicatorHandle>,
    foreground: ForegroundLoop<SimIndicatorHandle>,
    bank: SimIndicatorBank,
    line_probe: SimLineProbe,
    timer_probe: SimTimerProbe,
    running: Arc<AtomicBool>,
}

impl MonitorSession {
    /// Wire the monitor against fresh simulated hardware.
    pub fn new(config: &MonitorConfig) -> Self {
        let latch = Arc::new(StopLatch::new());
        let (line, line_probe) = sim_stop_line();
        let (timer, timer_probe) = sim_tick_timer(config.clock_hz);
        let bank = SimIndicatorBank::new();

        let monitor = EdgeMonitor::new(line, Arc::clone(&latch));
        let annunciator = PeriodicAnnunciator::new(
            timer,
            bank.handle(),
            config.indicators.periodic,
            Arc::clone(&latch),
        );
        let foreground = ForegroundLoop::new(
            bank.handle(),
            config.indicators.foreground,
            Arc::clone(&latch),
        );

        Self {
            config: *config,
            latch,
            monitor,
            annunciator,
            foreground,
            bank,
            line_probe,
            timer_probe,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Handle for external shutdown of the harness (Ctrl-C in the
    /// binary). The monitor core itself has no shutdown path.
    pub fn running_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Run the three contexts until `run_for` elapses or the running
    /// flag clears, then report the observable state.
    pub fn run(mut self, opts: &SessionOptions) -> Result<SessionReport, SessionError> {
        if opts.rt {
            rt_mlockall()?;
        }
        let deadline = Instant::now() + opts.run_for;

        debug!(
            "session start: run_for={:?} edge_at={:?} bounce={} reload={}",
            opts.run_for,
            opts.edge_at,
            opts.bounce,
            self.annunciator.period_ticks(),
        );

        // ── Periodic context: 100 Hz, absolute deadlines ──
        let periodic = {
            let running = Arc::clone(&self.running);
            let probe = self.timer_probe.clone();
            let mut annunciator = self.annunciator;
            let rt = opts.rt;
            thread::Builder::new()
                .name("estop-periodic".into())
                .spawn(move || {
                    enter_context(ExecutionContext::PeriodicTick, rt);
                    let period = Duration::from_micros(ANNUNCIATOR_PERIOD_US);
                    let mut next = Instant::now() + period;
                    while running.load(Ordering::Relaxed) {
                        let now = Instant::now();
                        if next > now {
                            thread::sleep(next - now);
                        }
                        next += period;
                        probe.expire();
                        annunciator.on_tick();
                    }
                })
                .map_err(|e| SessionError::Spawn("periodic", e.to_string()))?
        };

        // ── Edge context: scripted transition plus bounce ──
        let edge = opts.edge_at.map(|at| {
            let probe = self.line_probe.clone();
            let mut monitor = self.monitor;
            let bounce = opts.bounce.max(1);
            let rt = opts.rt;
            thread::Builder::new()
                .name("estop-edge".into())
                .spawn(move || {
                    enter_context(ExecutionContext::EdgeMonitor, rt);
                    thread::sleep(at);
                    for _ in 0..bounce {
                        probe.inject_edge();
                        monitor.on_falling_edge();
                    }
                })
                .map_err(|e| SessionError::Spawn("edge", e.to_string()))
        });
        let edge = edge.transpose()?;

        // ── Foreground context: spin on the calling thread ──
        enter_context(ExecutionContext::Foreground, opts.rt);
        while self.running.load(Ordering::Relaxed) && Instant::now() < deadline {
            self.foreground.poll();
            std::hint::spin_loop();
        }
        self.running.store(false, Ordering::SeqCst);

        periodic
            .join()
            .map_err(|_| SessionError::ContextPanicked("periodic"))?;
        if let Some(handle) = edge {
            handle
                .join()
                .map_err(|_| SessionError::ContextPanicked("edge"))?;
        }

        Ok(SessionReport {
            latch_asserted: self.latch.is_asserted(),
            foreground_level: self.bank.level(self.config.indicators.foreground),
            periodic_level: self.bank.level(self.config.indicators.periodic),
            ticks: self.timer_probe.ack_count(),
            edge_acks: self.line_probe.ack_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use estop_common::config::load_config_from_str;

    fn test_config() -> MonitorConfig {
        load_config_from_str(
            r#"
[stop_line]
line = 4

[indicators]
foreground = 1
periodic = 2
"#,
        )
        .unwrap()
    }

    #[test]
    fn quiet_run_leaves_everything_off() {
        let session = MonitorSession::new(&test_config());
        let report = session
            .run(&SessionOptions {
                run_for: Duration::from_millis(60),
                ..Default::default()
            })
            .unwrap();
        assert!(!report.latch_asserted);
        assert_eq!(report.foreground_level, Level::Off);
        assert_eq!(report.periodic_level, Level::Off);
        assert_eq!(report.edge_acks, 0);
        assert!(report.ticks > 0, "annunciator should have ticked");
    }

    #[test]
    fn edge_drives_both_indicators_on() {
        let session = MonitorSession::new(&test_config());
        let report = session
            .run(&SessionOptions {
                run_for: Duration::from_millis(100),
                edge_at: Some(Duration::from_millis(10)),
                ..Default::default()
            })
            .unwrap();
        assert!(report.latch_asserted);
        assert_eq!(report.foreground_level, Level::On);
        assert_eq!(report.periodic_level, Level::On);
        assert_eq!(report.edge_acks, 1);
    }

    #[test]
    fn external_stop_ends_run_early() {
        let session = MonitorSession::new(&test_config());
        let running = session.running_handle();
        running.store(false, Ordering::SeqCst);
        let start = Instant::now();
        let report = session
            .run(&SessionOptions {
                run_for: Duration::from_secs(30),
                ..Default::default()
            })
            .unwrap();
        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(!report.latch_asserted);
    }
}
