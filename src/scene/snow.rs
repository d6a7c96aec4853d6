//! Snow theme: falling flakes plus the interactive snowman game.
//!
//! Each frame runs in a fixed order: flakes, auto-spawn, snowman physics,
//! off-screen pruning, the monster, then drawing. Pointer input arrives
//! between frames and only records intent or moves the held snowman.

mod config;
mod monster;
mod physics;
mod snowman;

use std::time::Duration;

use rand::{Rng, rngs::StdRng};
use thiserror::Error;

pub use config::{QualityMode, SnowConfig, SnowOverrides};
pub use monster::{EAT_RADIUS_PX, MONSTER_SIZE_PX, Monster, MonsterPhase, SUCTION_RADIUS_PX};
pub use physics::{GRAVITY, World};
pub use snowman::{
    CRUISE_SPEED, SNOWMAN_HALF_WIDTH_PX, SNOWMAN_HEIGHT_PX, SNOWMAN_SPRITE, SNOWMAN_WIDTH_PX,
    Snowman, SnowmanId,
};

use super::{
    surface::{Point, RectPx, Rgb, Surface, Viewport},
    theme::FrameCues,
};

const FADE: Rgb = Rgb(20, 20, 25);
const FADE_ALPHA: f32 = 0.2;
const FLAKE_COLOR: Rgb = Rgb(235, 235, 240);
const SNOWMAN_COLOR: Rgb = Rgb(245, 248, 255);
const HELD_COLOR: Rgb = Rgb(170, 210, 255);
const MONSTER_COLOR: Rgb = Rgb(190, 90, 220);
pub const PRUNE_MARGIN_PX: f32 = 200.0;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SpawnError {
    #[error("snowman cap of {0} reached")]
    CapReached(usize),
    #[error("spawns are suppressed while the backdrop is hidden")]
    Hidden,
    #[error("could not allocate room for another snowman")]
    Allocation,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flake {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub speed: f32,
    pub drift: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Instructions {
    Hidden,
    Showing { since: Duration },
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Grab {
    id: SnowmanId,
    offset: Point,
    pressed_at: Duration,
    moved: bool,
}

#[derive(Debug)]
pub struct SnowTheme {
    config: SnowConfig,
    flakes: Vec<Flake>,
    snowmen: Vec<Snowman>,
    monster: Option<Monster>,
    monster_spawns: u32,
    grab: Option<Grab>,
    obstacle: Option<RectPx>,
    width: f32,
    height: f32,
    clock: Duration,
    frame: u64,
    visible: bool,
    last_auto_spawn: Duration,
    last_bounce: Option<Duration>,
    instructions: Instructions,
    pending: FrameCues,
    next_id: SnowmanId,
    rng: StdRng,
}

impl SnowTheme {
    pub fn new(
        config: SnowConfig,
        viewport: &Viewport,
        now: Duration,
        instructions_shown: bool,
        mut rng: StdRng,
    ) -> Self {
        let flakes = (0..config.flake_count)
            .map(|_| Flake {
                x: rng.random_range(0.0..=viewport.width.max(1.0)),
                y: rng.random_range(0.0..=viewport.height.max(1.0)),
                radius: rng.random_range(1.0..3.5),
                speed: rng.random_range(0.5..1.5),
                drift: rng.random_range(-1.0..1.0),
            })
            .collect();
        let instructions = if instructions_shown {
            Instructions::Hidden
        } else {
            Instructions::Showing { since: now }
        };

        let mut theme = Self {
            config,
            flakes,
            snowmen: Vec::new(),
            monster: None,
            monster_spawns: 0,
            grab: None,
            obstacle: None,
            width: viewport.width,
            height: viewport.height,
            clock: now,
            frame: 0,
            visible: true,
            last_auto_spawn: now,
            last_bounce: None,
            instructions,
            pending: FrameCues::default(),
            next_id: 0,
            rng,
        };
        theme.place_initial_snowmen();
        theme
    }

    fn place_initial_snowmen(&mut self) {
        let count = self.config.initial_snowmen;
        let spacing = SNOWMAN_WIDTH_PX + 4.0;
        let start = self.width / 2.0 - spacing * (count.saturating_sub(1) as f32) / 2.0;
        for idx in 0..count {
            self.next_id += 1;
            let mut snowman = Snowman::new(
                self.next_id,
                self.clamp_x(start + spacing * idx as f32),
                self.height,
            );
            snowman.vx = snowman::cruise_velocity(&mut self.rng);
            self.snowmen.push(snowman);
        }
    }

    pub fn config(&self) -> &SnowConfig {
        &self.config
    }

    pub fn flakes(&self) -> &[Flake] {
        &self.flakes
    }

    pub fn snowmen(&self) -> &[Snowman] {
        &self.snowmen
    }

    pub fn monster(&self) -> Option<&Monster> {
        self.monster.as_ref()
    }

    /// How many monsters this session has ever created.
    pub fn monster_spawns(&self) -> u32 {
        self.monster_spawns
    }

    pub fn held(&self) -> Option<SnowmanId> {
        self.grab.map(|grab| grab.id)
    }

    pub fn instructions_visible(&self) -> bool {
        matches!(self.instructions, Instructions::Showing { .. })
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn set_obstacle(&mut self, obstacle: Option<RectPx>) {
        self.obstacle = obstacle;
    }

    pub fn stop(&mut self) {
        self.flakes.clear();
        self.snowmen.clear();
        self.monster = None;
        self.grab = None;
    }

    /// Adds a snowman with its feet at `(x, y)`, subject to the cap and visibility.
    pub fn spawn(&mut self, x: f32, y: f32) -> Result<SnowmanId, SpawnError> {
        if !self.visible {
            return Err(SpawnError::Hidden);
        }
        if self.snowmen.len() >= self.config.max_snowmen {
            self.bounce();
            return Err(SpawnError::CapReached(self.config.max_snowmen));
        }
        if let Err(err) = self.snowmen.try_reserve(1) {
            log::warn!("snowman allocation failed: {err}");
            return Err(SpawnError::Allocation);
        }

        self.next_id += 1;
        let id = self.next_id;
        let x = self.clamp_x(x);
        self.snowmen.push(Snowman::new(id, x, y.min(self.height)));
        self.maybe_trigger_monster();
        Ok(id)
    }

    /// Starts the monster once the population reaches the trigger threshold.
    /// Returns `true` only on the call that created it.
    pub fn maybe_trigger_monster(&mut self) -> bool {
        if self.monster.is_some() || self.snowmen.len() < self.config.monster_threshold {
            return false;
        }
        self.monster = Some(Monster::spawn(self.width, self.height));
        self.monster_spawns += 1;
        self.pending.tint = true;
        self.pending.haptic = true;
        log::info!(
            "monster triggered with {} snowmen on screen",
            self.snowmen.len()
        );
        true
    }

    pub fn pointer_down(&mut self, point: Point) {
        let clock = self.clock;
        self.grab = self
            .snowmen
            .iter()
            .rev()
            .find(|snowman| snowman.hit(point))
            .map(|snowman| Grab {
                id: snowman.id,
                offset: Point::new(point.x - snowman.x, point.y - snowman.y),
                pressed_at: clock,
                moved: false,
            });
    }

    pub fn pointer_move(&mut self, point: Point) {
        let Some(grab) = self.grab else {
            return;
        };
        let Some(snowman) = self.snowmen.iter_mut().find(|s| s.id == grab.id) else {
            self.grab = None;
            return;
        };
        snowman.dragging = true;
        snowman.trapped = false;
        snowman.vx = 0.0;
        snowman.vy = 0.0;
        snowman.x = point.x - grab.offset.x;
        snowman.y = point.y - grab.offset.y;
        self.grab = Some(Grab {
            moved: true,
            ..grab
        });
    }

    pub fn pointer_up(&mut self, point: Point) {
        let Some(grab) = self.grab.take() else {
            return;
        };

        if grab.moved {
            self.release(grab, point);
            return;
        }
        if self.clock.saturating_sub(grab.pressed_at) > self.config.click_window {
            return;
        }
        let Some(origin) = self.snowmen.iter().find(|s| s.id == grab.id) else {
            return;
        };
        let (x, y) = (origin.x, origin.y - SNOWMAN_HEIGHT_PX);
        if let Err(err) = self.spawn(x, y) {
            log::debug!("click spawn rejected: {err}");
        }
    }

    fn release(&mut self, grab: Grab, point: Point) {
        let ground = self.height;
        let Some(snowman) = self.snowmen.iter_mut().find(|s| s.id == grab.id) else {
            return;
        };
        snowman.x = point.x - grab.offset.x;
        snowman.y = point.y - grab.offset.y;
        snowman.dragging = false;
        if snowman.y >= ground {
            snowman.y = ground;
            snowman.vy = 0.0;
            snowman.vx = snowman::cruise_velocity(&mut self.rng);
        }
    }

    pub fn tick(&mut self, now: Duration, viewport: &Viewport, surface: &mut dyn Surface) -> FrameCues {
        self.clock = now;
        self.width = viewport.width;
        self.height = viewport.height;
        self.frame += 1;

        self.draw_flakes(surface);
        self.auto_spawn();

        let world = World {
            width: self.width,
            ground: self.height,
            obstacle: self.obstacle,
        };
        let cheap = self.use_cheap_physics();
        physics::step(&mut self.snowmen, &world, cheap, &mut self.rng);
        self.prune();
        self.step_monster();
        self.drop_stale_grab();
        self.maybe_trigger_monster();
        self.draw_entities(surface);
        self.advance_instructions(now);

        std::mem::take(&mut self.pending)
    }

    fn use_cheap_physics(&self) -> bool {
        self.config.quality == QualityMode::Adaptive
            && self.snowmen.len() > self.config.governor_threshold
            && !self.frame.is_multiple_of(2)
    }

    fn auto_spawn(&mut self) {
        let Some(every) = self.config.auto_spawn_every else {
            return;
        };
        if !self.visible
            || self.monster.is_some()
            || self.snowmen.len() >= self.config.max_snowmen
            || self.clock.saturating_sub(self.last_auto_spawn) < every
        {
            return;
        }
        self.last_auto_spawn = self.clock;
        let x = self
            .rng
            .random_range(SNOWMAN_HALF_WIDTH_PX..=self.width.max(SNOWMAN_WIDTH_PX));
        if let Err(err) = self.spawn(x, 0.0) {
            log::warn!("auto-spawn skipped: {err}");
        }
    }

    fn prune(&mut self) {
        let (width, height) = (self.width, self.height);
        let before = self.snowmen.len();
        self.snowmen.retain(|s| {
            s.x > -PRUNE_MARGIN_PX
                && s.x < width + PRUNE_MARGIN_PX
                && s.y > -PRUNE_MARGIN_PX
                && s.y < height + PRUNE_MARGIN_PX
        });
        if self.snowmen.len() != before {
            log::debug!("pruned {} off-screen snowmen", before - self.snowmen.len());
        }
    }

    fn step_monster(&mut self) {
        let Some(monster) = self.monster.as_mut() else {
            return;
        };
        let step = monster.step(&mut self.snowmen, self.height);
        if step.eaten > 0 {
            self.pending.shake = true;
        }
        if step.departed {
            log::info!("monster left after eating {}", monster.eaten());
            self.monster = None;
        }
    }

    fn drop_stale_grab(&mut self) {
        if let Some(grab) = self.grab
            && !self.snowmen.iter().any(|s| s.id == grab.id)
        {
            self.grab = None;
        }
    }

    fn bounce(&mut self) {
        let cooldown = self.config.bounce_cooldown;
        let clock = self.clock;
        if self
            .last_bounce
            .is_none_or(|at| clock.saturating_sub(at) >= cooldown)
        {
            self.pending.bounce = true;
            self.last_bounce = Some(clock);
        }
    }

    fn advance_instructions(&mut self, now: Duration) {
        if let Instructions::Showing { since } = self.instructions
            && now.saturating_sub(since) >= self.config.instructions_delay
        {
            self.instructions = Instructions::Done;
            self.pending.instructions_done = true;
        }
    }

    fn draw_flakes(&mut self, surface: &mut dyn Surface) {
        surface.fade(FADE, FADE_ALPHA);
        let (width, height) = (self.width, self.height);
        for flake in &mut self.flakes {
            surface.circle(Point::new(flake.x, flake.y), flake.radius, FLAKE_COLOR);
            flake.y += flake.speed;
            flake.x += flake.drift;
            if flake.y > height {
                flake.y = -flake.radius;
                flake.x = self.rng.random_range(0.0..=width.max(1.0));
            }
            if flake.x > width + flake.radius {
                flake.x = -flake.radius;
            }
            if flake.x < -flake.radius {
                flake.x = width + flake.radius;
            }
        }
    }

    fn draw_entities(&self, surface: &mut dyn Surface) {
        for snowman in &self.snowmen {
            let color = if snowman.dragging {
                HELD_COLOR
            } else {
                SNOWMAN_COLOR
            };
            surface.sprite(Point::new(snowman.x, snowman.y), &SNOWMAN_SPRITE, color);
        }
        if let Some(monster) = &self.monster {
            surface.sprite(monster.sprite_anchor(), monster.sprite(), MONSTER_COLOR);
        }
    }

    fn clamp_x(&self, x: f32) -> f32 {
        x.clamp(
            SNOWMAN_HALF_WIDTH_PX,
            (self.width - SNOWMAN_HALF_WIDTH_PX).max(SNOWMAN_HALF_WIDTH_PX),
        )
    }
}
