mod common;

use std::time::Duration;

use common::{FRAME, controller_with, desktop_controller, frames_until};
use weather_backdrop::{
    domain::weather::{Density, ThemeSelection, classify},
    scene::{
        ControllerOptions, DeviceClass, Theme, ThemeController, ThemeKind,
        rain::drop_count,
        snow::{MonsterPhase, SnowOverrides},
    },
};

#[test]
fn storm_code_runs_heavy_rain_and_flashes_within_sixteen_seconds() {
    for seed in 0..8 {
        let mut controller = desktop_controller(seed);
        controller.switch_to(classify(95));

        let theme = controller.theme().expect("active theme");
        assert_eq!(theme.kind(), ThemeKind::Thunderstorm);
        let rain = theme.rain().expect("storm wraps rain");
        assert!(rain.is_heavy());
        assert_eq!(rain.drops().len(), drop_count(true, DeviceClass::Desktop));
        assert_eq!(rain.drops().len(), 500);

        let mut first_flash = None;
        for now in frames_until(Duration::from_secs(16)) {
            let cues = controller.on_frame(now);
            if cues.flash.is_some() && first_flash.is_none() {
                first_flash = Some(now);
            }
        }
        let first_flash = first_flash.expect("a flash within 16 s");
        assert!(
            first_flash >= Duration::from_secs(4),
            "seed {seed} flashed early at {first_flash:?}"
        );
    }
}

#[test]
fn snow_threshold_of_five_summons_one_entering_monster() {
    let mut controller = controller_with(
        21,
        SnowOverrides {
            monster_threshold: Some(5),
            initial_snowmen: Some(0),
            ..SnowOverrides::default()
        },
    );
    controller.switch_to(ThemeSelection::Snow);
    controller.on_frame(FRAME);

    let snow = controller
        .theme_mut()
        .and_then(Theme::snow_mut)
        .expect("snow session");
    for idx in 0..5 {
        snow.spawn(200.0 + idx as f32 * 60.0, 640.0)
            .expect("spawn under cap");
    }
    assert_eq!(snow.monster_spawns(), 1);
    assert_eq!(
        snow.monster().map(|monster| monster.phase()),
        Some(MonsterPhase::Entering)
    );

    let cues = controller.on_frame(FRAME * 2);
    assert!(cues.tint);
    let snow = controller.theme().and_then(Theme::snow).expect("snow session");
    assert_eq!(snow.monster_spawns(), 1);
}

#[test]
fn monster_clears_the_field_and_spawning_resumes() {
    let mut controller = controller_with(
        4,
        SnowOverrides {
            monster_threshold: Some(3),
            initial_snowmen: Some(0),
            ..SnowOverrides::default()
        },
    );
    controller.switch_to(ThemeSelection::Snow);
    let snow = controller
        .theme_mut()
        .and_then(Theme::snow_mut)
        .expect("snow session");
    for x in [300.0, 480.0, 660.0] {
        snow.spawn(x, 640.0).expect("spawn");
    }

    let mut now = Duration::ZERO;
    let mut left_at = None;
    for _ in 0..3_000 {
        now += FRAME;
        controller.on_frame(now);
        let snow = controller.theme().and_then(Theme::snow).expect("snow session");
        if snow.monster().is_none() {
            left_at = Some(now);
            break;
        }
    }
    assert!(left_at.is_some(), "monster never left");

    let snow = controller
        .theme_mut()
        .and_then(Theme::snow_mut)
        .expect("snow session");
    assert!(snow.snowmen().is_empty());
    assert!(snow.spawn(480.0, 640.0).is_ok());
}

#[test]
fn switching_many_times_keeps_one_tick_and_stable_listeners() {
    let selections = [
        ThemeSelection::Snow,
        ThemeSelection::Thunderstorm,
        ThemeSelection::Rain { heavy: true },
        ThemeSelection::Constellation(Density::Medium),
    ];
    let mut controller = desktop_controller(9);
    controller.switch_to(ThemeSelection::Snow);
    let listeners_after_one = controller.listener_count();

    let mut now = Duration::ZERO;
    for selection in selections.iter().cycle().take(40) {
        controller.switch_to(*selection);
        assert_eq!(controller.outstanding_ticks(), 1);
        now += FRAME;
        controller.on_frame(now);
        assert_eq!(controller.outstanding_ticks(), 1);
    }
    controller.switch_to(ThemeSelection::Snow);
    assert_eq!(controller.listener_count(), listeners_after_one);
    assert_eq!(controller.outstanding_ticks(), 1);
}

#[test]
fn constrained_viewport_scales_entity_counts_down() {
    let mut controller = ThemeController::new(
        80,
        30,
        ControllerOptions {
            seed: Some(1),
            ..Default::default()
        },
    );
    assert_eq!(controller.viewport().device_class(), DeviceClass::Constrained);
    controller.switch_to(ThemeSelection::Rain { heavy: true });
    let drops = controller
        .theme()
        .and_then(Theme::rain)
        .map(|rain| rain.drops().len());
    assert_eq!(drops, Some(drop_count(true, DeviceClass::Constrained)));
    assert_eq!(drops, Some(150));
}
