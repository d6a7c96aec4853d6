use rand::Rng;

use crate::scene::surface::{Point, RectPx};

pub type SnowmanId = u64;

pub const SNOWMAN_WIDTH_PX: f32 = 40.0;
pub const SNOWMAN_HEIGHT_PX: f32 = 48.0;
pub const SNOWMAN_HALF_WIDTH_PX: f32 = SNOWMAN_WIDTH_PX / 2.0;
pub const CRUISE_SPEED: f32 = 1.2;
pub const SNOWMAN_SPRITE: [&str; 3] = [" _=_ ", "(o.o)", "( : )"];

const GROUND_EPSILON: f32 = 0.01;

/// A snowman anchored at the bottom-centre of its glyph footprint.
#[derive(Debug, Clone, PartialEq)]
pub struct Snowman {
    pub id: SnowmanId,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub dragging: bool,
    pub trapped: bool,
    pub(super) prev_y: f32,
}

impl Snowman {
    #[must_use]
    pub fn new(id: SnowmanId, x: f32, y: f32) -> Self {
        Self {
            id,
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            dragging: false,
            trapped: false,
            prev_y: y,
        }
    }

    /// Resting on the ground plane and not held by the pointer.
    pub fn is_grounded(&self, ground: f32) -> bool {
        !self.dragging && self.y >= ground - GROUND_EPSILON
    }

    pub fn bounds(&self) -> RectPx {
        RectPx::new(
            self.x - SNOWMAN_HALF_WIDTH_PX,
            self.y - SNOWMAN_HEIGHT_PX,
            SNOWMAN_WIDTH_PX,
            SNOWMAN_HEIGHT_PX,
        )
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y - SNOWMAN_HEIGHT_PX / 2.0)
    }

    pub fn hit(&self, point: Point) -> bool {
        self.bounds().contains(point)
    }

    pub fn is_still(&self) -> bool {
        self.vx.abs() < f32::EPSILON
    }
}

pub fn cruise_velocity(rng: &mut impl Rng) -> f32 {
    if rng.random_bool(0.5) {
        CRUISE_SPEED
    } else {
        -CRUISE_SPEED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_box_covers_the_glyph_footprint() {
        let snowman = Snowman::new(1, 100.0, 200.0);
        assert!(snowman.hit(Point::new(100.0, 180.0)));
        assert!(snowman.hit(Point::new(81.0, 153.0)));
        assert!(!snowman.hit(Point::new(100.0, 140.0)));
        assert!(!snowman.hit(Point::new(125.0, 180.0)));
    }

    #[test]
    fn dragged_snowmen_are_never_grounded() {
        let mut snowman = Snowman::new(1, 100.0, 200.0);
        assert!(snowman.is_grounded(200.0));
        snowman.dragging = true;
        assert!(!snowman.is_grounded(200.0));
    }
}
