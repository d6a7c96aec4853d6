use std::{ops::Range, time::Duration};

use rand::{Rng, rngs::StdRng};

use super::surface::{DeviceClass, Point, Rgb, Surface, Viewport};

const FADE: Rgb = Rgb(10, 10, 20);
const FADE_ALPHA: f32 = 0.2;
const DROP_COLOR: Rgb = Rgb(170, 180, 230);
const DROP_ALPHA: f32 = 0.5;
pub const UMBRELLA_RADIUS_PX: f32 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Raindrop {
    pub x: f32,
    pub y: f32,
    pub len: f32,
    pub speed: f32,
}

#[must_use]
pub fn drop_count(heavy: bool, class: DeviceClass) -> usize {
    match (class, heavy) {
        (DeviceClass::Constrained, false) => 75,
        (DeviceClass::Constrained, true) => 150,
        (DeviceClass::Desktop, false) => 250,
        (DeviceClass::Desktop, true) => 500,
    }
}

#[derive(Debug)]
pub struct RainTheme {
    drops: Vec<Raindrop>,
    heavy: bool,
    umbrella: bool,
    rng: StdRng,
}

impl RainTheme {
    pub fn new(heavy: bool, umbrella: bool, viewport: &Viewport, mut rng: StdRng) -> Self {
        let drops = (0..drop_count(heavy, viewport.device_class()))
            .map(|_| Raindrop {
                x: rng.random_range(0.0..=viewport.width.max(1.0)),
                y: rng.random_range(0.0..=viewport.height.max(1.0)),
                len: rng.random_range(5.0..20.0),
                speed: rng.random_range(2.0..6.0),
            })
            .collect();
        Self {
            drops,
            heavy,
            umbrella,
            rng,
        }
    }

    pub fn drops(&self) -> &[Raindrop] {
        &self.drops
    }

    pub fn is_heavy(&self) -> bool {
        self.heavy
    }

    pub fn stop(&mut self) {
        self.drops.clear();
    }

    pub fn tick(&mut self, viewport: &Viewport, surface: &mut dyn Surface) {
        surface.fade(FADE, FADE_ALPHA);
        let shelter = if self.umbrella {
            viewport.pointer()
        } else {
            None
        };
        let width = viewport.width.max(1.0);
        for drop in &mut self.drops {
            if let Some(pointer) = shelter
                && under_umbrella(drop, pointer)
            {
                drop.y = -drop.len;
                drop.x = self.rng.random_range(0.0..=width);
                continue;
            }

            surface.line(
                Point::new(drop.x, drop.y),
                Point::new(drop.x, drop.y + drop.len),
                DROP_COLOR,
                DROP_ALPHA,
            );
            drop.y += drop.speed;
            if drop.y > viewport.height {
                drop.y = -drop.len;
                drop.x = self.rng.random_range(0.0..=width);
            }
        }
    }
}

fn under_umbrella(drop: &Raindrop, pointer: Point) -> bool {
    Point::new(drop.x, drop.y + drop.len).distance_sq(pointer)
        < UMBRELLA_RADIUS_PX * UMBRELLA_RADIUS_PX
}

const FLASH_INTERVAL_SECS: Range<f32> = 4.0..15.5;
const FLASH_ALPHA: Range<f32> = 0.3..0.8;

/// Heavy rain with full-screen lightning flashes timed on the frame clock.
#[derive(Debug)]
pub struct ThunderstormTheme {
    rain: RainTheme,
    next_flash_at: Duration,
    last_flash: Option<Duration>,
    flashes: u32,
    rng: StdRng,
}

impl ThunderstormTheme {
    pub fn new(viewport: &Viewport, now: Duration, rain_rng: StdRng, mut rng: StdRng) -> Self {
        let next_flash_at = now + flash_interval(&mut rng);
        Self {
            rain: RainTheme::new(true, true, viewport, rain_rng),
            next_flash_at,
            last_flash: None,
            flashes: 0,
            rng,
        }
    }

    pub fn rain(&self) -> &RainTheme {
        &self.rain
    }

    pub fn flashes(&self) -> u32 {
        self.flashes
    }

    pub fn last_flash(&self) -> Option<Duration> {
        self.last_flash
    }

    pub fn stop(&mut self) {
        self.rain.stop();
    }

    /// Returns the flash opacity when lightning fired on this frame.
    pub fn tick(
        &mut self,
        now: Duration,
        viewport: &Viewport,
        surface: &mut dyn Surface,
    ) -> Option<f32> {
        self.rain.tick(viewport, surface);
        if now < self.next_flash_at {
            return None;
        }
        let alpha = self.rng.random_range(FLASH_ALPHA);
        surface.fill(Rgb::WHITE, alpha);
        self.flashes += 1;
        self.last_flash = Some(now);
        self.next_flash_at = now + flash_interval(&mut self.rng);
        log::debug!("lightning flash at {:.2}s", now.as_secs_f32());
        Some(alpha)
    }
}

fn flash_interval(rng: &mut StdRng) -> Duration {
    Duration::from_secs_f32(rng.random_range(FLASH_INTERVAL_SECS))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::scene::surface::Canvas;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn heavy_rain_doubles_the_drop_count() {
        let desktop = Viewport::from_cells(120, 40);
        let narrow = Viewport::from_cells(60, 40);
        assert_eq!(RainTheme::new(false, false, &desktop, rng(1)).drops().len(), 250);
        assert_eq!(RainTheme::new(true, false, &desktop, rng(1)).drops().len(), 500);
        assert_eq!(RainTheme::new(false, false, &narrow, rng(1)).drops().len(), 75);
        assert_eq!(RainTheme::new(true, false, &narrow, rng(1)).drops().len(), 150);
    }

    #[test]
    fn drops_recycle_to_the_top() {
        let viewport = Viewport::from_cells(120, 40);
        let mut canvas = Canvas::new(120, 40);
        let mut rain = RainTheme::new(false, false, &viewport, rng(2));
        rain.drops[0] = Raindrop {
            x: 10.0,
            y: viewport.height - 1.0,
            len: 10.0,
            speed: 5.0,
        };
        rain.tick(&viewport, &mut canvas);
        assert!((rain.drops()[0].y + 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn umbrella_repositions_sheltered_drops() {
        let mut viewport = Viewport::from_cells(120, 40);
        viewport.set_pointer(Some(Point::new(400.0, 300.0)));
        let mut canvas = Canvas::new(120, 40);
        let mut rain = RainTheme::new(false, true, &viewport, rng(3));
        rain.drops[0] = Raindrop {
            x: 400.0,
            y: 280.0,
            len: 10.0,
            speed: 3.0,
        };
        rain.tick(&viewport, &mut canvas);
        let drop = rain.drops()[0];
        assert!((drop.y + 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn storm_wraps_heavy_rain() {
        let viewport = Viewport::from_cells(120, 40);
        let storm = ThunderstormTheme::new(&viewport, Duration::ZERO, rng(4), rng(5));
        assert!(storm.rain().is_heavy());
        assert_eq!(storm.rain().drops().len(), 500);
    }

    #[test]
    fn flashes_stay_inside_the_interval_window() {
        for seed in 0..20 {
            let viewport = Viewport::from_cells(120, 40);
            let mut canvas = Canvas::new(120, 40);
            let mut storm =
                ThunderstormTheme::new(&viewport, Duration::ZERO, rng(seed), rng(seed + 100));
            let mut first = None;
            let mut frame = Duration::ZERO;
            while frame <= Duration::from_secs(16) {
                if storm.tick(frame, &viewport, &mut canvas).is_some() && first.is_none() {
                    first = Some(frame);
                }
                frame += Duration::from_millis(16);
            }
            let first = first.expect("flash within 16s");
            assert!(first >= Duration::from_secs(4), "seed {seed} flashed at {first:?}");
        }
    }
}
