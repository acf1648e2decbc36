//! # E-stop Safety Monitor
//!
//! Hosted harness for the interrupt-driven E-stop monitor. Loads the
//! monitor configuration, wires the latch and the three execution
//! contexts against the simulation backend, runs a timed session
//! (optionally with a scripted stop-line transition), and reports the
//! final latch and indicator state.

use clap::Parser;
use estop_common::config::load_config;
use estop_common::consts::{DEFAULT_CONFIG_PATH, period_ticks};
use estop_monitor::session::{MonitorSession, SessionOptions};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

/// E-stop Safety Monitor — latched stop detection with dual indicators
#[derive(Parser, Debug)]
#[command(name = "estop_monitor")]
#[command(version)]
#[command(about = "Interrupt-driven E-stop latch with periodic and foreground indicators")]
struct Args {
    /// Path to the monitor configuration TOML.
    #[arg(default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Session duration in milliseconds.
    #[arg(long, default_value_t = 1000)]
    run_for_ms: u64,

    /// Pull the stop line LOW this many milliseconds into the run.
    /// Omit to keep the line inactive.
    #[arg(long)]
    edge_at_ms: Option<u64>,

    /// Number of edge events the transition produces (contact bounce).
    #[arg(long, default_value_t = 1)]
    bounce: u32,

    /// Apply SCHED_FIFO context priorities and mlockall.
    #[arg(long)]
    rt: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    info!("E-stop monitor v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;
    info!(
        "Config OK: clock={} Hz, stop line={}, indicators fg={} periodic={}, reload={}",
        config.clock_hz,
        config.stop_line.line,
        config.indicators.foreground,
        config.indicators.periodic,
        period_ticks(config.clock_hz),
    );

    let session = MonitorSession::new(&config);

    // Ctrl-C ends the harness run; the latch itself has no clear path.
    let running = session.running_handle();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        running.store(false, Ordering::SeqCst);
    })?;

    let opts = SessionOptions {
        run_for: Duration::from_millis(args.run_for_ms),
        edge_at: args.edge_at_ms.map(Duration::from_millis),
        bounce: args.bounce,
        rt: args.rt,
    };
    info!("Session: {opts:?}");

    let report = session.run(&opts)?;
    info!(
        "Session complete: latch={} fg={:?} periodic={:?} ticks={} edge_acks={}",
        if report.latch_asserted {
            "ASSERTED"
        } else {
            "clear"
        },
        report.foreground_level,
        report.periodic_level,
        report.ticks,
        report.edge_acks,
    );

    Ok(())
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
