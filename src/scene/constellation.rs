#![allow(clippy::cast_precision_loss)]

use rand::{Rng, rngs::StdRng};

use super::surface::{DeviceClass, Point, Rgb, Surface, Viewport};
use crate::domain::weather::Density;

const FADE: Rgb = Rgb(17, 17, 17);
const FADE_ALPHA: f32 = 0.1;
const POINTER_PULL: f32 = 0.03;
const HUE_STEP: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct Star {
    pub position: Point,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub hue: f32,
}

#[derive(Debug)]
pub struct ConstellationTheme {
    stars: Vec<Star>,
    link_radius_sq: f32,
}

#[must_use]
pub fn star_count(density: Density, class: DeviceClass) -> usize {
    let constrained = class == DeviceClass::Constrained;
    match (density, constrained) {
        (Density::Low, true) => 30,
        (Density::Low, false) => 100,
        (Density::Medium, true) => 50,
        (Density::Medium, false) => 200,
        (Density::Default, true) => 40,
        (Density::Default, false) => 150,
    }
}

#[must_use]
pub fn link_radius(class: DeviceClass) -> f32 {
    match class {
        DeviceClass::Constrained => 90.0,
        DeviceClass::Desktop => 110.0,
    }
}

impl ConstellationTheme {
    pub fn new(density: Density, viewport: &Viewport, rng: &mut StdRng) -> Self {
        let class = viewport.device_class();
        let stars = (0..star_count(density, class))
            .map(|_| Star {
                position: Point::new(
                    rng.random_range(0.0..=viewport.width.max(1.0)),
                    rng.random_range(0.0..=viewport.height.max(1.0)),
                ),
                vx: rng.random_range(-0.15..0.15),
                vy: rng.random_range(-0.15..0.15),
                radius: rng.random_range(0.5..2.0),
                hue: rng.random_range(0.0..360.0),
            })
            .collect();
        let radius = link_radius(class);
        Self {
            stars,
            link_radius_sq: radius * radius,
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn stop(&mut self) {
        self.stars.clear();
    }

    pub fn tick(&mut self, viewport: &Viewport, surface: &mut dyn Surface) {
        surface.fade(FADE, FADE_ALPHA);
        let pointer = viewport.pointer();
        for star in &mut self.stars {
            step_star(star, viewport, pointer);
            surface.circle(
                star.position,
                star.radius,
                Rgb::from_hsl(star.hue, 0.7, 0.6),
            );
        }
        self.draw_links(surface);
    }

    /// Links every pair closer than the link radius; O(n^2) over a few hundred stars.
    fn draw_links(&self, surface: &mut dyn Surface) {
        for (i, a) in self.stars.iter().enumerate() {
            for b in &self.stars[i + 1..] {
                let dist_sq = a.position.distance_sq(b.position);
                if dist_sq < self.link_radius_sq {
                    let opacity = 1.0 - dist_sq / self.link_radius_sq;
                    let hue = (a.hue + b.hue) / 2.0;
                    surface.line(
                        a.position,
                        b.position,
                        Rgb::from_hsl(hue, 0.7, 0.6),
                        opacity,
                    );
                }
            }
        }
    }
}

fn step_star(star: &mut Star, viewport: &Viewport, pointer: Option<Point>) {
    star.position.x += star.vx;
    star.position.y += star.vy;
    if star.position.x < 0.0 || star.position.x > viewport.width {
        star.vx = -star.vx;
    }
    if star.position.y < 0.0 || star.position.y > viewport.height {
        star.vy = -star.vy;
    }

    if let Some(pointer) = pointer {
        let dx = pointer.x - star.position.x;
        let dy = pointer.y - star.position.y;
        if (dx * dx + dy * dy).sqrt() < viewport.interaction_radius {
            star.position.x += dx * POINTER_PULL;
            star.position.y += dy * POINTER_PULL;
        }
    }
    star.hue = (star.hue + HUE_STEP) % 360.0;
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::scene::surface::Canvas;

    fn theme(density: Density, viewport: &Viewport) -> ConstellationTheme {
        ConstellationTheme::new(density, viewport, &mut StdRng::seed_from_u64(7))
    }

    #[test]
    fn counts_follow_density_and_device() {
        let desktop = Viewport::from_cells(120, 40);
        let narrow = Viewport::from_cells(60, 30);
        assert_eq!(theme(Density::Low, &desktop).stars().len(), 100);
        assert_eq!(theme(Density::Medium, &desktop).stars().len(), 200);
        assert_eq!(theme(Density::Default, &desktop).stars().len(), 150);
        assert_eq!(theme(Density::Low, &narrow).stars().len(), 30);
        assert_eq!(theme(Density::Medium, &narrow).stars().len(), 50);
        assert_eq!(theme(Density::Default, &narrow).stars().len(), 40);
    }

    #[test]
    fn stars_reflect_off_edges() {
        let viewport = Viewport::new(100.0, 100.0);
        let mut star = Star {
            position: Point::new(99.9, 50.0),
            vx: 0.15,
            vy: 0.0,
            radius: 1.0,
            hue: 10.0,
        };
        step_star(&mut star, &viewport, None);
        assert!(star.vx < 0.0);
    }

    #[test]
    fn pointer_pulls_nearby_stars_only() {
        let viewport = Viewport::new(1000.0, 1000.0);
        let pointer = Some(Point::new(500.0, 500.0));
        let mut near = Star {
            position: Point::new(450.0, 500.0),
            vx: 0.0,
            vy: 0.0,
            radius: 1.0,
            hue: 0.0,
        };
        let mut far = Star {
            position: Point::new(100.0, 100.0),
            ..near.clone()
        };
        step_star(&mut near, &viewport, pointer);
        step_star(&mut far, &viewport, pointer);
        assert!((near.position.x - 451.5).abs() < 1e-3);
        assert_eq!(far.position, Point::new(100.0, 100.0));
    }

    #[test]
    fn hue_wraps_around() {
        let viewport = Viewport::new(100.0, 100.0);
        let mut star = Star {
            position: Point::new(50.0, 50.0),
            vx: 0.0,
            vy: 0.0,
            radius: 1.0,
            hue: 359.95,
        };
        step_star(&mut star, &viewport, None);
        assert!(star.hue < 1.0);
    }

    #[test]
    fn tick_draws_stars_and_links() {
        let viewport = Viewport::from_cells(120, 40);
        let mut canvas = Canvas::new(120, 40);
        let mut constellation = theme(Density::Medium, &viewport);
        constellation.tick(&viewport, &mut canvas);
        assert!(canvas.lit_cells() >= 100);
    }
}
