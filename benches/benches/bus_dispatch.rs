// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use waypoint_bus::EventBus;
use waypoint_tour::{EventGroup, EventKind, EventPayload, TourEvent, TourId, TourTopic};

fn event(payload: EventPayload) -> TourEvent {
    TourEvent {
        source: TourId(1),
        at: 0,
        payload,
    }
}

fn bus_with(exact: usize, groups: usize, any: usize) -> EventBus<TourEvent> {
    let mut bus = EventBus::new();
    for _ in 0..exact {
        bus.on(TourTopic::Event(EventKind::StepChange), |e| {
            black_box(e.at);
        });
    }
    for _ in 0..groups {
        bus.on(TourTopic::Group(EventGroup::Navigation), |e| {
            black_box(e.at);
        });
    }
    for _ in 0..any {
        bus.on(TourTopic::Any, |e| {
            black_box(e.at);
        });
    }
    bus
}

fn bench_emit(c: &mut Criterion) {
    let mut group = c.benchmark_group("bus_emit");
    let step = event(EventPayload::StepChange {
        from: 0,
        to: 1,
        total: 3,
    });
    let unrouted = event(EventPayload::TrackingStop);
    for &n in &[1_usize, 8, 64] {
        let mut bus = bus_with(n, n, n);
        group.throughput(Throughput::Elements((3 * n) as u64));
        group.bench_function(format!("routed_n{n}"), |b| {
            b.iter(|| black_box(bus.emit(&step)));
        });
        group.bench_function(format!("wildcard_only_n{n}"), |b| {
            b.iter(|| black_box(bus.emit(&unrouted)));
        });
    }
    let mut empty = bus_with(0, 0, 0);
    group.bench_function("no_subscribers", |b| {
        b.iter(|| black_box(empty.emit(&step)));
    });
    group.finish();
}

criterion_group!(benches, bench_emit);
criterion_main!(benches);
