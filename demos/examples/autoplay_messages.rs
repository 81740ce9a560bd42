// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Autoplay that waits for each step's messages.
//!
//! The first step cycles three messages once per second; autoplay advances only after the
//! last one has been on screen, plus a short settle. Hiding mid-tour pauses both and showing
//! again resumes them.
//!
//! Run:
//! - `cargo run -p waypoint_demos --example autoplay_messages`

use waypoint_demos::{Printer, init_logging, page, run_frames};
use waypoint_tour::{
    AutoplayMode, Content, EventGroup, EventPayload, Step, Tour, TourConfig, TourOptions,
    TourTopic,
};

fn main() {
    init_logging();

    let config = TourConfig {
        message_interval: 1_000,
        autoplay: true,
        autoplay_interval: 2_000,
        hide_on_complete: true,
        ..TourConfig::default()
    };
    let options = TourOptions::new(config).steps(vec![
        Step::at(
            "#open",
            vec![
                Content::text("This opens a file"),
                Content::text("Recent files are listed too"),
                Content::html("<kbd>Ctrl</kbd>+<kbd>O</kbd> works as well"),
            ],
        ),
        Step::at("#save", "Saving is one click").with_duration(1_500),
        Step::at("#submit", "Done!"),
    ]);
    let mut tour = Tour::new(options, page(), Printer::default());

    tour.on(TourTopic::Group(EventGroup::Autoplay), |e| match &e.payload {
        EventPayload::AutoplayNext { from, to } => {
            println!("[{:>6} ms] autoplay {from} -> {to:?}", e.at);
        }
        _ => println!("[{:>6} ms] {}", e.at, e.name()),
    });
    tour.on(TourTopic::Group(EventGroup::MessageCycle), |e| {
        println!("[{:>6} ms] {}", e.at, e.name());
    });

    tour.show();
    run_frames(&mut tour, 0, 2_500);

    println!("== Hidden for a while ==");
    tour.hide();
    run_frames(&mut tour, 2_500, 6_000);
    assert_eq!(tour.current_step(), 0);

    tour.show();
    run_frames(&mut tour, 6_000, 20_000);
    assert_eq!(tour.snapshot().autoplay, AutoplayMode::Stopped);
    println!("finished on step {}", tour.current_step());
}
