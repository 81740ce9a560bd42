// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Rect;
use waypoint_tour::{
    Content, PointerFrame, Renderer, Resolver, Step, Tour, TourConfig, TourOptions, TourTopic,
};

/// Targets stacked down a long page; `scroll` shifts them all.
struct Column {
    scroll: f64,
}

impl Resolver for Column {
    type Element = u32;

    fn resolve(&self, selector: &str) -> Option<u32> {
        selector.strip_prefix("#t")?.parse().ok()
    }

    fn bounds(&self, element: &u32) -> Option<Rect> {
        let y = f64::from(*element) * 120.0 - self.scroll;
        Some(Rect::new(40.0, y, 240.0, y + 40.0))
    }

    fn viewport(&self) -> Rect {
        Rect::new(0.0, 0.0, 1280.0, 720.0)
    }
}

struct Sink;

impl Renderer for Sink {
    fn render(&mut self, content: &Content) {
        black_box(content);
    }

    fn present(&mut self, frame: &PointerFrame) {
        black_box(frame);
    }
}

fn tour(steps: u32, config: TourConfig) -> Tour<Column, Sink> {
    let steps = (0..steps)
        .map(|i| Step::at(format!("#t{i}"), vec![Content::text("a"), Content::text("b")]))
        .collect();
    let mut tour = Tour::new(
        TourOptions::new(config).steps(steps),
        Column { scroll: 0.0 },
        Sink,
    );
    tour.on(TourTopic::Any, |e| {
        black_box(e.name());
    });
    tour.show();
    tour.tick(1_000);
    tour
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tour_tick");
    group.bench_function("tracking_scroll_60_frames", |b| {
        b.iter_batched(
            || tour(8, TourConfig::default()),
            |mut tour| {
                for frame in 1..=60_u32 {
                    tour.resolver_mut().scroll = f64::from(frame) * 4.0;
                    tour.tick(1_000 + u64::from(frame) * 16);
                }
                black_box(tour.direction());
            },
            BatchSize::SmallInput,
        )
    });
    group.bench_function("autoplay_full_run", |b| {
        let config = TourConfig {
            message_interval: 500,
            autoplay: true,
            hide_on_complete: true,
            ..TourConfig::default()
        };
        b.iter_batched(
            || tour(16, config.clone()),
            |mut tour| {
                let mut now = 1_000;
                while let Some(next) = tour.next_deadline() {
                    now = next.max(now);
                    tour.tick(now);
                }
                black_box(tour.current_step());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
