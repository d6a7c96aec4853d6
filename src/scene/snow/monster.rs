#![allow(clippy::cast_precision_loss)]

use super::snowman::Snowman;
use crate::scene::surface::{CELL_HEIGHT_PX, Point};

pub const MONSTER_SIZE_PX: f32 = 80.0;
pub const EAT_RADIUS_PX: f32 = 40.0;
pub const SUCTION_RADIUS_PX: f32 = 160.0;
const SUCTION_PULL: f32 = 0.05;
const ENTER_SPEED: f32 = 3.0;
const CHASE_SPEED: f32 = 4.0;
const LEAVE_SPEED: f32 = 4.0;

const SPRITE_OPEN: [&str; 4] = [" /\\___/\\ ", "( O   O )", " \\ ___ / ", "  \\VVV/  "];
const SPRITE_CHOMP: [&str; 4] = [" /\\___/\\ ", "( >   < )", " \\ === / ", "  \\___/  "];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonsterPhase {
    Entering,
    Eating,
    Leaving,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonsterStep {
    pub eaten: usize,
    pub departed: bool,
}

#[derive(Debug, Clone)]
pub struct Monster {
    pub x: f32,
    pub y: f32,
    pub target_y: f32,
    pub size: f32,
    phase: MonsterPhase,
    eaten: usize,
    clock: u64,
}

impl Monster {
    /// Places a new monster just below the bottom edge, aiming for mid-screen.
    #[must_use]
    pub fn spawn(width: f32, height: f32) -> Self {
        Self {
            x: width / 2.0,
            y: height + MONSTER_SIZE_PX,
            target_y: height / 2.0,
            size: MONSTER_SIZE_PX,
            phase: MonsterPhase::Entering,
            eaten: 0,
            clock: 0,
        }
    }

    pub fn phase(&self) -> MonsterPhase {
        self.phase
    }

    pub fn eaten(&self) -> usize {
        self.eaten
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn sprite(&self) -> &'static [&'static str] {
        if self.phase == MonsterPhase::Eating && !(self.clock / 8).is_multiple_of(2) {
            &SPRITE_CHOMP
        } else {
            &SPRITE_OPEN
        }
    }

    /// Bottom-centre anchor for drawing the sprite around the monster's centre.
    pub fn sprite_anchor(&self) -> Point {
        let half_height = SPRITE_OPEN.len() as f32 * CELL_HEIGHT_PX / 2.0;
        Point::new(self.x, self.y + half_height)
    }

    pub fn step(&mut self, snowmen: &mut Vec<Snowman>, viewport_height: f32) -> MonsterStep {
        self.clock += 1;
        let mut step = MonsterStep::default();
        match self.phase {
            MonsterPhase::Entering => {
                self.y -= ENTER_SPEED;
                if self.y <= self.target_y {
                    self.y = self.target_y;
                    self.phase = MonsterPhase::Eating;
                }
            }
            MonsterPhase::Eating => step.eaten = self.eat(snowmen),
            MonsterPhase::Leaving => {
                self.y += LEAVE_SPEED;
                step.departed = self.y - self.size / 2.0 > viewport_height;
            }
        }
        step
    }

    fn eat(&mut self, snowmen: &mut Vec<Snowman>) -> usize {
        if snowmen.is_empty() {
            self.phase = MonsterPhase::Leaving;
            return 0;
        }

        let me = self.position();
        let nearest = snowmen
            .iter()
            .map(Snowman::center)
            .min_by(|a, b| a.distance_sq(me).total_cmp(&b.distance_sq(me)));
        if let Some(target) = nearest {
            let distance = target.distance(me);
            if distance > f32::EPSILON {
                let advance = CHASE_SPEED.min(distance);
                self.x += (target.x - me.x) / distance * advance;
                self.y += (target.y - me.y) / distance * advance;
            }
        }

        let me = self.position();
        for snowman in snowmen.iter_mut() {
            let center = snowman.center();
            if center.distance(me) < SUCTION_RADIUS_PX {
                snowman.x += (me.x - center.x) * SUCTION_PULL;
                snowman.y += (me.y - center.y) * SUCTION_PULL;
            }
        }

        let before = snowmen.len();
        snowmen.retain(|snowman| snowman.center().distance(me) >= EAT_RADIUS_PX);
        let eaten = before - snowmen.len();
        self.eaten += eaten;
        if snowmen.is_empty() {
            self.phase = MonsterPhase::Leaving;
        }
        eaten
    }
}
