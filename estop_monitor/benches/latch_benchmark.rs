//! Latch access and handler-body benchmarks.
//!
//! The tick and poll bodies run in time-critical contexts; these
//! benchmarks confirm they are orders of magnitude inside the 10 ms
//! period budget.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};

use estop_common::indicator::ChannelId;
use estop_monitor::annunciator::PeriodicAnnunciator;
use estop_monitor::foreground::ForegroundLoop;
use estop_monitor::latch::StopLatch;
use estop_monitor::sim::{SimIndicatorBank, sim_tick_timer};

fn bench_latch_read(c: &mut Criterion) {
    let latch = StopLatch::new();
    c.bench_function("latch_is_asserted", |b| {
        b.iter(|| black_box(latch.is_asserted()))
    });
}

fn bench_latch_set(c: &mut Criterion) {
    let latch = StopLatch::new();
    c.bench_function("latch_set_asserted", |b| {
        b.iter(|| latch.set_asserted())
    });
}

fn bench_annunciator_tick(c: &mut Criterion) {
    let latch = Arc::new(StopLatch::new());
    latch.set_asserted();
    let (timer, probe) = sim_tick_timer(120_000_000);
    let bank = SimIndicatorBank::new();
    let mut annunciator =
        PeriodicAnnunciator::new(timer, bank.handle(), ChannelId(2), Arc::clone(&latch));
    c.bench_function("annunciator_on_tick", |b| {
        b.iter(|| {
            probe.expire();
            annunciator.on_tick();
        })
    });
}

fn bench_foreground_poll(c: &mut Criterion) {
    let latch = Arc::new(StopLatch::new());
    latch.set_asserted();
    let bank = SimIndicatorBank::new();
    let mut foreground = ForegroundLoop::new(bank.handle(), ChannelId(1), Arc::clone(&latch));
    c.bench_function("foreground_poll", |b| b.iter(|| foreground.poll()));
}

criterion_group!(
    benches,
    bench_latch_read,
    bench_latch_set,
    bench_annunciator_tick,
    bench_foreground_poll
);
criterion_main!(benches);
