#![allow(clippy::cast_possible_truncation)]

pub mod backdrop;
pub mod palette;
pub mod switcher;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::state::AppState;

const INSTRUCTIONS: [&str; 2] = [
    "Click a snowman to add another one.",
    "Drag a snowman to move it.",
];

pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    backdrop::render(
        frame.buffer_mut(),
        area,
        state.controller.canvas(),
        state.effects(),
        state.capability,
    );

    let status = state.status();
    switcher::render(
        frame.buffer_mut(),
        area,
        &switcher::SwitcherView {
            active: state.active_trigger(),
            auto: state.manual.is_none(),
            bounce: state.bouncing(),
            status: &status,
        },
        state.capability,
    );

    if state.instructions_visible() {
        render_instructions(frame, area, state);
    }
}

fn render_instructions(frame: &mut Frame, area: Rect, state: &AppState) {
    let width = INSTRUCTIONS
        .iter()
        .map(|line| line.chars().count() as u16 + 4)
        .max()
        .unwrap_or(0)
        .min(area.width);
    let height = (INSTRUCTIONS.len() as u16 + 2).min(area.height);
    let panel = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 3,
        width,
        height,
    };

    let accent = palette::quantize(palette::ACCENT, state.capability);
    let text = palette::quantize(palette::BAR_TEXT, state.capability);
    let surface = palette::quantize(palette::BAR_BG, state.capability);
    let body = Paragraph::new(INSTRUCTIONS.iter().map(|line| Line::from(*line)).collect::<Vec<_>>())
        .style(Style::default().fg(text).bg(surface))
        .centered()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent))
                .title(" snowmen ")
                .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD)),
        );
    frame.render_widget(Clear, panel);
    frame.render_widget(body, panel);
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

    use super::*;
    use crate::{cli::Cli, domain::weather::ThemeSelection, ui::palette::ColorCapability};

    fn screen_text(buf: &Buffer) -> String {
        (buf.area.y..buf.area.bottom())
            .map(|y| {
                (buf.area.x..buf.area.right())
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn draw(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).expect("terminal");
        terminal.draw(|frame| render(frame, state)).expect("draw");
        screen_text(terminal.backend().buffer())
    }

    #[test]
    fn first_snow_session_shows_instructions_over_the_backdrop() {
        let cli = Cli::parse_from(["weather-backdrop", "--no-state", "--seed", "3", "--theme", "snow"]);
        let mut state = AppState::new(&cli, 120, 40);
        state.capability = ColorCapability::TrueColor;
        state.controller.switch_to(ThemeSelection::Snow);

        let text = draw(&state);
        assert!(text.contains(" snowmen "));
        assert!(text.contains("Click a snowman to add another one."));
        assert!(text.contains("3 snow"));
        assert!(text.contains("manual: snow"));
    }

    #[test]
    fn rain_session_has_no_instruction_panel() {
        let cli = Cli::parse_from(["weather-backdrop", "--no-state", "--seed", "3"]);
        let mut state = AppState::new(&cli, 120, 40);
        state.capability = ColorCapability::Basic16;
        state.controller.switch_to(ThemeSelection::Rain { heavy: false });

        let text = draw(&state);
        assert!(!text.contains(" snowmen "));
        assert!(text.contains("a auto"));
        assert!(text.contains("locating..."));
    }
}
