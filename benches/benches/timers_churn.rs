// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use waypoint_timers::TimerSet;

fn bench_schedule(c: &mut Criterion) {
    let mut group = c.benchmark_group("timers");
    for &n in &[16_u32, 256, 4096] {
        group.throughput(Throughput::Elements(u64::from(n)));
        group.bench_function(format!("schedule_distinct_n{n}"), |b| {
            b.iter_batched(
                TimerSet::<u32>::new,
                |mut timers| {
                    for k in 0..n {
                        timers.schedule(k, 0, u64::from(k % 97) + 1);
                    }
                    black_box(timers.next_deadline());
                },
                BatchSize::SmallInput,
            )
        });
        // The same few keys rescheduled over and over, as a busy tour does.
        group.bench_function(format!("reschedule_same_keys_n{n}"), |b| {
            b.iter_batched(
                TimerSet::<u32>::new,
                |mut timers| {
                    for i in 0..n {
                        timers.schedule(i % 8, u64::from(i), 300);
                    }
                    black_box(timers.len());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_pop_due(c: &mut Criterion) {
    let mut group = c.benchmark_group("timers_pop_due");
    for &n in &[16_u32, 256, 4096] {
        group.throughput(Throughput::Elements(u64::from(n)));
        group.bench_function(format!("drain_n{n}"), |b| {
            b.iter_batched(
                || {
                    let mut timers = TimerSet::<u32>::new();
                    for k in 0..n {
                        timers.schedule(k, 0, u64::from(k));
                    }
                    timers
                },
                |mut timers| {
                    let mut fired = 0_usize;
                    while timers.pop_due(u64::from(n)).is_some() {
                        fired += 1;
                    }
                    black_box(fired);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.bench_function("periodic_1000_ticks", |b| {
        b.iter_batched(
            || {
                let mut timers = TimerSet::<u32>::new();
                timers.schedule_every(0, 0, 16);
                timers.schedule_every(1, 0, 1_000);
                timers
            },
            |mut timers| {
                let mut fired = 0_usize;
                for now in (0..16_000).step_by(16) {
                    while timers.pop_due(now).is_some() {
                        fired += 1;
                    }
                }
                black_box(fired);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_schedule, bench_pop_due);
criterion_main!(benches);
