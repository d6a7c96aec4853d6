use std::time::Duration;

use rand::{SeedableRng, rngs::StdRng};

use super::{
    constellation::ConstellationTheme,
    listeners::ListenerKind,
    rain::{RainTheme, ThunderstormTheme},
    snow::{SnowConfig, SnowOverrides, SnowTheme},
    surface::{Point, RectPx, Surface, Viewport},
};
use crate::domain::weather::ThemeSelection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeKind {
    Constellation,
    Rain,
    Snow,
    Thunderstorm,
}

/// One-shot effects a frame asks the host to perform outside the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameCues {
    /// Opacity of a full-screen lightning flash drawn this frame.
    pub flash: Option<f32>,
    pub shake: bool,
    pub tint: bool,
    pub haptic: bool,
    pub bounce: bool,
    pub instructions_done: bool,
}

impl FrameCues {
    pub fn merge(&mut self, other: FrameCues) {
        self.flash = self.flash.or(other.flash);
        self.shake |= other.shake;
        self.tint |= other.tint;
        self.haptic |= other.haptic;
        self.bounce |= other.bounce;
        self.instructions_done |= other.instructions_done;
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up(Point),
}

impl PointerEvent {
    pub fn kind(self) -> ListenerKind {
        match self {
            Self::Down(_) => ListenerKind::PointerDown,
            Self::Move(_) => ListenerKind::PointerMove,
            Self::Up(_) => ListenerKind::PointerUp,
        }
    }

    pub fn point(self) -> Point {
        match self {
            Self::Down(point) | Self::Move(point) | Self::Up(point) => point,
        }
    }
}

/// Inputs a theme constructor reads once at session start.
#[derive(Debug, Clone, Copy)]
pub struct StartContext<'a> {
    pub viewport: &'a Viewport,
    pub now: Duration,
    pub snow: &'a SnowOverrides,
    pub instructions_shown: bool,
}

const SNOW_LISTENERS: [ListenerKind; 3] = [
    ListenerKind::PointerDown,
    ListenerKind::PointerMove,
    ListenerKind::PointerUp,
];

/// The closed set of backdrop themes, each owning its entities outright.
#[derive(Debug)]
pub enum Theme {
    Constellation(ConstellationTheme),
    Rain(RainTheme),
    Snow(Box<SnowTheme>),
    Thunderstorm(ThunderstormTheme),
}

impl Theme {
    pub fn start(selection: ThemeSelection, ctx: &StartContext<'_>, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        match selection {
            ThemeSelection::Constellation(density) => {
                Self::Constellation(ConstellationTheme::new(density, ctx.viewport, &mut rng))
            }
            ThemeSelection::Rain { heavy } => {
                Self::Rain(RainTheme::new(heavy, true, ctx.viewport, rng))
            }
            ThemeSelection::Snow => {
                let config = ctx
                    .snow
                    .apply(SnowConfig::for_device(ctx.viewport.device_class()));
                Self::Snow(Box::new(SnowTheme::new(
                    config,
                    ctx.viewport,
                    ctx.now,
                    ctx.instructions_shown,
                    rng,
                )))
            }
            ThemeSelection::Thunderstorm => {
                let flash_rng = StdRng::seed_from_u64(seed.rotate_left(17) ^ 0x5eed);
                Self::Thunderstorm(ThunderstormTheme::new(
                    ctx.viewport,
                    ctx.now,
                    rng,
                    flash_rng,
                ))
            }
        }
    }

    pub fn kind(&self) -> ThemeKind {
        match self {
            Self::Constellation(_) => ThemeKind::Constellation,
            Self::Rain(_) => ThemeKind::Rain,
            Self::Snow(_) => ThemeKind::Snow,
            Self::Thunderstorm(_) => ThemeKind::Thunderstorm,
        }
    }

    /// Pointer listeners the session registers while it is active.
    pub fn listeners(&self) -> &'static [ListenerKind] {
        match self {
            Self::Snow(_) => &SNOW_LISTENERS,
            Self::Constellation(_) | Self::Rain(_) | Self::Thunderstorm(_) => &[],
        }
    }

    pub fn tick(
        &mut self,
        now: Duration,
        viewport: &Viewport,
        surface: &mut dyn Surface,
    ) -> FrameCues {
        match self {
            Self::Constellation(theme) => {
                theme.tick(viewport, surface);
                FrameCues::default()
            }
            Self::Rain(theme) => {
                theme.tick(viewport, surface);
                FrameCues::default()
            }
            Self::Snow(theme) => theme.tick(now, viewport, surface),
            Self::Thunderstorm(theme) => FrameCues {
                flash: theme.tick(now, viewport, surface),
                ..FrameCues::default()
            },
        }
    }

    pub fn pointer(&mut self, event: PointerEvent) {
        if let Self::Snow(theme) = self {
            match event {
                PointerEvent::Down(point) => theme.pointer_down(point),
                PointerEvent::Move(point) => theme.pointer_move(point),
                PointerEvent::Up(point) => theme.pointer_up(point),
            }
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        if let Self::Snow(theme) = self {
            theme.set_visible(visible);
        }
    }

    pub fn set_obstacle(&mut self, obstacle: Option<RectPx>) {
        if let Self::Snow(theme) = self {
            theme.set_obstacle(obstacle);
        }
    }

    /// Releases every entity the theme owns.
    pub fn stop(&mut self) {
        match self {
            Self::Constellation(theme) => theme.stop(),
            Self::Rain(theme) => theme.stop(),
            Self::Snow(theme) => theme.stop(),
            Self::Thunderstorm(theme) => theme.stop(),
        }
    }

    pub fn snow(&self) -> Option<&SnowTheme> {
        match self {
            Self::Snow(theme) => Some(theme.as_ref()),
            _ => None,
        }
    }

    pub fn snow_mut(&mut self) -> Option<&mut SnowTheme> {
        match self {
            Self::Snow(theme) => Some(theme.as_mut()),
            _ => None,
        }
    }

    pub fn rain(&self) -> Option<&RainTheme> {
        match self {
            Self::Rain(theme) => Some(theme),
            Self::Thunderstorm(theme) => Some(theme.rain()),
            _ => None,
        }
    }

    pub fn storm(&self) -> Option<&ThunderstormTheme> {
        match self {
            Self::Thunderstorm(theme) => Some(theme),
            _ => None,
        }
    }

    pub fn constellation(&self) -> Option<&ConstellationTheme> {
        match self {
            Self::Constellation(theme) => Some(theme),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cues_merge_keeps_first_flash_and_ors_flags() {
        let mut cues = FrameCues {
            flash: Some(0.4),
            ..FrameCues::default()
        };
        cues.merge(FrameCues {
            flash: Some(0.7),
            shake: true,
            ..FrameCues::default()
        });
        assert_eq!(cues.flash, Some(0.4));
        assert!(cues.shake);
        assert!(!cues.tint);
        assert!(!cues.is_empty());
        assert!(FrameCues::default().is_empty());
    }

    #[test]
    fn only_snow_registers_pointer_listeners() {
        let viewport = Viewport::from_cells(120, 40);
        let overrides = SnowOverrides::default();
        let ctx = StartContext {
            viewport: &viewport,
            now: Duration::ZERO,
            snow: &overrides,
            instructions_shown: true,
        };
        let snow = Theme::start(ThemeSelection::Snow, &ctx, 1);
        let storm = Theme::start(ThemeSelection::Thunderstorm, &ctx, 1);
        assert_eq!(snow.listeners().len(), 3);
        assert!(storm.listeners().is_empty());
        assert_eq!(storm.kind(), ThemeKind::Thunderstorm);
        assert!(storm.rain().is_some_and(RainTheme::is_heavy));
    }
}
