//! Per-frame snowman physics, applied in a fixed order so results do not
//! depend on entity iteration order within a step.

use rand::Rng;

use super::snowman::{
    CRUISE_SPEED, SNOWMAN_HALF_WIDTH_PX, SNOWMAN_HEIGHT_PX, SNOWMAN_WIDTH_PX, Snowman,
    SnowmanId, cruise_velocity,
};
use crate::scene::surface::RectPx;

pub const GRAVITY: f32 = 0.5;
const NEIGHBOR_BUFFER_PX: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct World {
    pub width: f32,
    pub ground: f32,
    pub obstacle: Option<RectPx>,
}

/// Runs one physics frame. `cheap` skips pairwise work and keeps only wall checks.
pub fn step(snowmen: &mut [Snowman], world: &World, cheap: bool, rng: &mut impl Rng) {
    if !cheap {
        separate_grounded(snowmen, world.ground);
    }
    integrate(snowmen, world.ground, rng);
    ground_policy(snowmen, world, cheap, rng);
    if let Some(obstacle) = world.obstacle {
        collide_obstacle(snowmen, obstacle, world.ground, rng);
    }
}

pub(super) fn separate_grounded(snowmen: &mut [Snowman], ground: f32) {
    for i in 0..snowmen.len() {
        for j in i + 1..snowmen.len() {
            if !snowmen[i].is_grounded(ground) || !snowmen[j].is_grounded(ground) {
                continue;
            }
            let dx = snowmen[j].x - snowmen[i].x;
            if dx.abs() >= SNOWMAN_WIDTH_PX {
                continue;
            }
            let push = (SNOWMAN_WIDTH_PX - dx.abs()) / 2.0;
            let dir = if dx >= 0.0 { 1.0 } else { -1.0 };
            snowmen[i].x -= dir * push;
            snowmen[j].x += dir * push;
        }
    }
}

pub(super) fn integrate(snowmen: &mut [Snowman], ground: f32, rng: &mut impl Rng) {
    for snowman in snowmen.iter_mut().filter(|s| !s.dragging) {
        snowman.prev_y = snowman.y;
        if snowman.is_grounded(ground) {
            snowman.y = ground;
            snowman.vy = 0.0;
            continue;
        }
        snowman.vy += GRAVITY;
        snowman.y += snowman.vy;
        snowman.x += snowman.vx;
        if snowman.y >= ground {
            snowman.y = ground;
            snowman.vy = 0.0;
            if snowman.is_still() {
                snowman.vx = cruise_velocity(rng);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct Blocked {
    pub left: bool,
    pub right: bool,
}

pub(super) fn blocked_sides(
    snowman: &Snowman,
    resting: &[(SnowmanId, f32)],
    width: f32,
    walls_only: bool,
) -> Blocked {
    let mut blocked = Blocked {
        left: snowman.x - SNOWMAN_HALF_WIDTH_PX <= 0.0,
        right: snowman.x + SNOWMAN_HALF_WIDTH_PX >= width,
    };
    if walls_only {
        return blocked;
    }
    for &(id, x) in resting {
        if id == snowman.id {
            continue;
        }
        let dx = x - snowman.x;
        if dx.abs() >= SNOWMAN_WIDTH_PX + NEIGHBOR_BUFFER_PX {
            continue;
        }
        if dx < 0.0 || (dx == 0.0 && id < snowman.id) {
            blocked.left = true;
        } else {
            blocked.right = true;
        }
    }
    blocked
}

pub(super) fn ground_policy(
    snowmen: &mut [Snowman],
    world: &World,
    walls_only: bool,
    rng: &mut impl Rng,
) {
    let resting: Vec<(SnowmanId, f32)> = snowmen
        .iter()
        .filter(|s| s.is_grounded(world.ground))
        .map(|s| (s.id, s.x))
        .collect();

    for snowman in snowmen
        .iter_mut()
        .filter(|s| s.is_grounded(world.ground))
    {
        let blocked = blocked_sides(snowman, &resting, world.width, walls_only);
        steer(snowman, blocked, rng);
        snowman.x += snowman.vx;
        let max_x = (world.width - SNOWMAN_HALF_WIDTH_PX).max(SNOWMAN_HALF_WIDTH_PX);
        snowman.x = snowman.x.clamp(SNOWMAN_HALF_WIDTH_PX, max_x);
    }
}

pub(super) fn steer(snowman: &mut Snowman, blocked: Blocked, rng: &mut impl Rng) {
    if blocked.left && blocked.right {
        snowman.vx = 0.0;
        snowman.trapped = true;
        return;
    }
    if snowman.vx < 0.0 && blocked.left {
        snowman.vx = CRUISE_SPEED;
    } else if snowman.vx > 0.0 && blocked.right {
        snowman.vx = -CRUISE_SPEED;
    } else if snowman.trapped || snowman.is_still() {
        snowman.vx = match (blocked.left, blocked.right) {
            (false, true) => -CRUISE_SPEED,
            (true, false) => CRUISE_SPEED,
            _ => cruise_velocity(rng),
        };
    }
    snowman.trapped = false;
}

pub(super) fn collide_obstacle(
    snowmen: &mut [Snowman],
    obstacle: RectPx,
    ground: f32,
    rng: &mut impl Rng,
) {
    for snowman in snowmen
        .iter_mut()
        .filter(|s| !s.dragging && !s.is_grounded(ground))
    {
        let overlaps_x = snowman.x + SNOWMAN_HALF_WIDTH_PX > obstacle.left()
            && snowman.x - SNOWMAN_HALF_WIDTH_PX < obstacle.right();
        if !overlaps_x {
            continue;
        }

        if snowman.vy >= 0.0 && snowman.prev_y <= obstacle.top() && snowman.y >= obstacle.top() {
            snowman.y = obstacle.top();
            snowman.vy = 0.0;
            if snowman.is_still() {
                snowman.vx = cruise_velocity(rng);
            }
            continue;
        }

        let head = snowman.y - SNOWMAN_HEIGHT_PX;
        if snowman.y > obstacle.top() && head < obstacle.bottom() {
            snowman.x = if snowman.x < obstacle.center_x() {
                obstacle.left() - SNOWMAN_HALF_WIDTH_PX
            } else {
                obstacle.right() + SNOWMAN_HALF_WIDTH_PX
            };
            snowman.vx = -snowman.vx;
        }
    }
}
