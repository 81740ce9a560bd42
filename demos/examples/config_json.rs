// Copyright 2025 the Waypoint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loading settings from JSON and changing them live.
//!
//! Unspecified fields keep their defaults. Invalid values (an unknown easing, a malformed
//! bezier) are rejected while parsing. Setters on a running tour emit `<field>Change`
//! events and skip unchanged values.
//!
//! Run:
//! - `cargo run -p waypoint_demos --example config_json`

use waypoint_demos::{Printer, init_logging, page, run_frames};
use waypoint_tour::{
    Easing, EventGroup, EventPayload, Step, Tour, TourConfig, TourOptions, TourTopic,
};

const SETTINGS: &str = r#"{
    "animationDuration": 450,
    "fadeDuration": 200,
    "easing": "snappy",
    "initialPosition": { "preset": "first-step" },
    "trackingFps": 30
}"#;

fn main() {
    init_logging();

    let config: TourConfig = match serde_json::from_str(SETTINGS) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(%err, "invalid settings");
            return;
        }
    };
    println!("{config:#?}");

    for bad in [r#"{ "easing": "wobbly" }"#, r#"{ "easing": "cubic-bezier(2, 0, 0, 1)" }"#] {
        if let Err(err) = serde_json::from_str::<TourConfig>(bad) {
            println!("rejected {bad}: {err}");
        }
    }

    let options = TourOptions::new(config)
        .steps(vec![Step::at("#name", "Your name"), Step::at("#submit", "Send it")]);
    let mut tour = Tour::new(options, page(), Printer::default());
    tour.on(TourTopic::Group(EventGroup::Config), |e| {
        if let EventPayload::ConfigChange { from, to, .. } = &e.payload {
            println!("{}: {from:?} -> {to:?}", e.name());
        }
    });

    tour.show();
    run_frames(&mut tour, 0, 300);

    tour.set_easing(Easing::Snappy);
    tour.set_easing(Easing::CubicBezier([0.3, 0.0, 0.2, 1.0]));
    tour.set_message_interval(1_500);
    tour.set_hide_on_complete_delay(Some(0));

    match serde_json::to_string_pretty(tour.config()) {
        Ok(json) => println!("{json}"),
        Err(err) => tracing::error!(%err, "could not serialize settings"),
    }
}
