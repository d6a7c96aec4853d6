//! The theme switcher bar and its hit testing.

#![allow(clippy::cast_possible_truncation)]

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
};

use super::palette::{self, ColorCapability};
use crate::{
    domain::weather::{Density, ThemeSelection},
    scene::RectPx,
};

/// Rows between the bar and the bottom edge, leaving room for grounded snowmen.
pub const BAR_LIFT_ROWS: u16 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Clear,
    Rain,
    Snow,
    Storm,
}

impl Trigger {
    pub const ALL: [Trigger; 4] = [Self::Clear, Self::Rain, Self::Snow, Self::Storm];

    pub fn selection(self) -> ThemeSelection {
        match self {
            Self::Clear => ThemeSelection::Constellation(Density::Low),
            Self::Rain => ThemeSelection::Rain { heavy: false },
            Self::Snow => ThemeSelection::Snow,
            Self::Storm => ThemeSelection::Thunderstorm,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Storm => "storm",
        }
    }

    pub fn key(self) -> char {
        match self {
            Self::Clear => '1',
            Self::Rain => '2',
            Self::Snow => '3',
            Self::Storm => '4',
        }
    }

    /// Which trigger lights up for a running selection.
    pub fn for_selection(selection: ThemeSelection) -> Self {
        match selection {
            ThemeSelection::Constellation(_) => Self::Clear,
            ThemeSelection::Rain { .. } => Self::Rain,
            ThemeSelection::Snow => Self::Snow,
            ThemeSelection::Thunderstorm => Self::Storm,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitcherAction {
    Trigger(Trigger),
    Auto,
    Quit,
}

impl SwitcherAction {
    pub fn from_key(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            'a' => Some(Self::Auto),
            'q' => Some(Self::Quit),
            other => Trigger::ALL
                .into_iter()
                .find(|trigger| trigger.key() == other)
                .map(Self::Trigger),
        }
    }

    fn text(self) -> String {
        match self {
            Self::Trigger(trigger) => format!(" {} {} ", trigger.key(), trigger.label()),
            Self::Auto => " a auto ".to_string(),
            Self::Quit => " q quit ".to_string(),
        }
    }
}

fn actions() -> impl Iterator<Item = SwitcherAction> {
    Trigger::ALL
        .into_iter()
        .map(SwitcherAction::Trigger)
        .chain([SwitcherAction::Auto, SwitcherAction::Quit])
}

fn segments(bar: Rect) -> impl Iterator<Item = (Rect, SwitcherAction)> {
    let mut x = bar.x;
    actions().map(move |action| {
        let width = action.text().chars().count() as u16;
        let rect = Rect::new(x, bar.y, width, 1).intersection(bar);
        x = x.saturating_add(width);
        (rect, action)
    })
}

pub fn bar_rect(area: Rect) -> Rect {
    let width: u16 = actions().map(|action| action.text().chars().count() as u16).sum();
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.bottom().saturating_sub(BAR_LIFT_ROWS).max(area.y),
        width,
        height: 1.min(area.height),
    }
}

/// The bar in simulation pixels, used as the falling-snowman obstacle.
pub fn obstacle(area: Rect) -> RectPx {
    let bar = bar_rect(area);
    RectPx::from_cells(bar.x, bar.y, bar.width, bar.height)
}

/// Resolves a click at terminal cell `(col, row)` to a switcher action.
pub fn action_at(area: Rect, col: u16, row: u16) -> Option<SwitcherAction> {
    segments(bar_rect(area))
        .find(|(rect, _)| rect.contains((col, row).into()))
        .map(|(_, action)| action)
}

#[derive(Debug, Clone, Copy)]
pub struct SwitcherView<'a> {
    pub active: Option<Trigger>,
    pub auto: bool,
    /// Cap-reached cue: the bar flashes the warning colour while set.
    pub bounce: bool,
    pub status: &'a str,
}

pub fn render(buf: &mut Buffer, area: Rect, view: &SwitcherView<'_>, capability: ColorCapability) {
    let bar = bar_rect(area);
    if bar.is_empty() {
        return;
    }
    let color = |rgb| palette::quantize(rgb, capability);
    let base = Style::default()
        .fg(color(palette::BAR_TEXT))
        .bg(color(if view.bounce {
            palette::WARNING
        } else {
            palette::BAR_BG
        }));

    for (rect, action) in segments(bar) {
        let highlighted = match action {
            SwitcherAction::Trigger(trigger) => view.active == Some(trigger),
            SwitcherAction::Auto => view.auto,
            SwitcherAction::Quit => false,
        };
        let style = if highlighted {
            base.fg(color(palette::ACCENT)).add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            base
        };
        buf.set_stringn(rect.x, rect.y, action.text(), usize::from(rect.width), style);
    }

    let status_row = bar.y + 1;
    if !view.status.is_empty() && status_row < area.bottom() {
        let width = (view.status.chars().count() as u16).min(area.width);
        let x = area.x + (area.width - width) / 2;
        buf.set_stringn(
            x,
            status_row,
            view.status,
            usize::from(width),
            Style::default().fg(color(palette::MUTED)),
        );
    }
}
