use ratatui::{buffer::Buffer, layout::Rect, style::Style};

use super::palette::{self, ColorCapability};
use crate::scene::{Canvas, Rgb};

/// Host-side effects layered over the canvas for a few frames.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Effects {
    /// Strength of the red monster tint, 0 when inactive.
    pub tint: f32,
    /// Whole-backdrop jitter in cells.
    pub shake: (i16, i16),
}

pub fn render(
    buf: &mut Buffer,
    area: Rect,
    canvas: &Canvas,
    effects: Effects,
    capability: ColorCapability,
) {
    let (dx, dy) = effects.shake;
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            let col = i32::from(x - area.x) - i32::from(dx);
            let row = i32::from(y - area.y) - i32::from(dy);
            let cell = u16::try_from(col)
                .ok()
                .zip(u16::try_from(row).ok())
                .and_then(|(col, row)| canvas.cell(col, row));
            let (glyph, fg, bg) = match cell {
                Some(cell) => (cell.glyph, cell.fg, cell.bg),
                None => (' ', Rgb::BLACK, Rgb::BLACK),
            };
            let (fg, bg) = if effects.tint > 0.0 {
                (
                    fg.mix(palette::TINT, effects.tint * 0.5),
                    bg.mix(palette::TINT, effects.tint),
                )
            } else {
                (fg, bg)
            };
            buf[(x, y)].set_char(glyph).set_style(
                Style::default()
                    .fg(palette::quantize(fg, capability))
                    .bg(palette::quantize(bg, capability)),
            );
        }
    }
}
