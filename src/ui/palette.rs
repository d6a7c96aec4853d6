#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use ratatui::style::Color;

use crate::scene::Rgb;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCapability {
    TrueColor,
    Xterm256,
    Basic16,
}

pub const TINT: Rgb = Rgb(200, 30, 40);
pub const ACCENT: Rgb = Rgb(120, 200, 255);
pub const BAR_BG: Rgb = Rgb(30, 32, 44);
pub const BAR_TEXT: Rgb = Rgb(200, 204, 220);
pub const MUTED: Rgb = Rgb(120, 124, 140);
pub const WARNING: Rgb = Rgb(255, 190, 80);

pub fn detect_color_capability() -> ColorCapability {
    capability_from(
        std::env::var("TERM").ok().as_deref(),
        std::env::var("COLORTERM").ok().as_deref(),
        std::env::var_os("NO_COLOR").is_some(),
    )
}

fn capability_from(term: Option<&str>, colorterm: Option<&str>, no_color: bool) -> ColorCapability {
    let term = term.unwrap_or_default().to_lowercase();
    let colorterm = colorterm.unwrap_or_default().to_lowercase();
    if no_color || term == "dumb" {
        return ColorCapability::Basic16;
    }
    if ["truecolor", "24bit"]
        .iter()
        .any(|hint| colorterm.contains(hint) || term.contains(hint))
        || term.ends_with("direct")
    {
        return ColorCapability::TrueColor;
    }
    if term.contains("256color") {
        ColorCapability::Xterm256
    } else {
        ColorCapability::Basic16
    }
}

pub fn quantize(color: Rgb, capability: ColorCapability) -> Color {
    let Rgb(r, g, b) = color;
    match capability {
        ColorCapability::TrueColor => Color::Rgb(r, g, b),
        ColorCapability::Xterm256 => {
            let cube = |v: u8| -> u8 { ((f32::from(v) / 255.0) * 5.0).round() as u8 };
            Color::Indexed(16 + 36 * cube(r) + 6 * cube(g) + cube(b))
        }
        ColorCapability::Basic16 => basic16(color),
    }
}

/// Nearest of the sixteen ANSI colours by lightness and hue bucket.
fn basic16(color: Rgb) -> Color {
    let channels = [color.0, color.1, color.2].map(|v| f32::from(v) / 255.0);
    let [r, g, b] = channels;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let light = (max + min) / 2.0;

    if delta < 0.08 {
        return match light {
            l if l < 0.2 => Color::Black,
            l if l < 0.4 => Color::DarkGray,
            l if l < 0.72 => Color::Gray,
            _ => Color::White,
        };
    }

    let hue = if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let bucket = (((hue + 30.0) / 60.0) as usize) % 6;
    let (dark, bright) = [
        (Color::Red, Color::LightRed),
        (Color::Yellow, Color::LightYellow),
        (Color::Green, Color::LightGreen),
        (Color::Cyan, Color::LightCyan),
        (Color::Blue, Color::LightBlue),
        (Color::Magenta, Color::LightMagenta),
    ][bucket];
    if light >= 0.55 { bright } else { dark }
}
