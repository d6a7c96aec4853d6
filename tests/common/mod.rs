#![allow(dead_code)]

use std::time::Duration;

use weather_backdrop::scene::{ControllerOptions, ThemeController, snow::SnowOverrides};

pub const FRAME: Duration = Duration::from_millis(16);

/// A desktop-sized controller (120x40 cells = 960x640 px) with a fixed seed.
pub fn desktop_controller(seed: u64) -> ThemeController {
    controller_with(seed, SnowOverrides::default())
}

pub fn controller_with(seed: u64, snow: SnowOverrides) -> ThemeController {
    ThemeController::new(
        120,
        40,
        ControllerOptions {
            device: None,
            snow,
            seed: Some(seed),
            instructions_shown: true,
        },
    )
}

/// Frame timestamps at 60 fps up to and including `until`.
pub fn frames_until(until: Duration) -> impl Iterator<Item = Duration> {
    (1..).map(|idx| FRAME * idx).take_while(move |at| *at <= until)
}
