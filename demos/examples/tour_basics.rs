// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A three-step tour driven by hand.
//!
//! Shows the intro, walks forward and back, then lets completion reset and hide the pointer.
//! Scrolling the page mid-step makes the tracking loop follow the target and flip the pointer.
//!
//! Run:
//! - `cargo run -p waypoint_demos --example tour_basics`
//! - `RUST_LOG=waypoint_tour=trace cargo run -p waypoint_demos --example tour_basics`

use waypoint_demos::{Printer, init_logging, page, run_frames};
use waypoint_tour::{
    EventGroup, Step, Tour, TourConfig, TourOptions, TourTopic, Visibility,
};

fn main() {
    init_logging();

    let config = TourConfig {
        reset_on_complete: true,
        hide_on_complete: true,
        ..TourConfig::default()
    };
    let options = TourOptions::new(config)
        .steps(vec![
            Step::at("#open", "Open a document"),
            Step::at("#name", "Give it a name"),
            Step::at("#submit", "And submit"),
        ])
        .on_step_change(|index, step| {
            println!("step {index}: {:?}", step.target.as_selector());
        })
        .on_complete(|| println!("tour complete"));
    let mut tour = Tour::new(options, page(), Printer::default());

    for group in [EventGroup::Lifecycle, EventGroup::Navigation, EventGroup::Pointing] {
        tour.on(TourTopic::Group(group), |e| {
            println!("  [{:>6} ms] {}", e.at, e.name());
        });
    }

    println!("== Intro ==");
    tour.show();
    run_frames(&mut tour, 0, 1_000);
    assert_eq!(tour.visibility(), Visibility::Visible);

    println!("== Forward ==");
    tour.next();
    run_frames(&mut tour, 1_000, 1_700);

    println!("== Scroll the page up ==");
    for i in 0..10 {
        tour.resolver_mut().scroll_by(-8.0);
        run_frames(&mut tour, 1_700 + i * 20, 1_700 + i * 20 + 16);
    }
    println!("  pointing {:?}", tour.direction());

    println!("== Back and forward ==");
    tour.prev();
    run_frames(&mut tour, 1_900, 2_600);
    tour.go_to_step(2);
    run_frames(&mut tour, 2_600, 3_300);

    println!("== Complete ==");
    tour.next();
    run_frames(&mut tour, 3_300, 5_000);
    assert_eq!(tour.visibility(), Visibility::Hidden);
    assert_eq!(tour.current_step(), 0);

    println!("{} frames presented", tour.renderer().frames);
    tour.destroy();
}
