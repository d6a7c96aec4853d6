#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

//! Pixel-space drawing surface backed by a terminal cell raster.
//!
//! Themes simulate in virtual pixels. Each terminal cell covers
//! `CELL_WIDTH_PX` x `CELL_HEIGHT_PX` pixels, so pointer radii and device
//! breakpoints keep their pixel meaning on any terminal size.

pub const CELL_WIDTH_PX: f32 = 8.0;
pub const CELL_HEIGHT_PX: f32 = 16.0;
pub const POINTER_RADIUS_PX: f32 = 100.0;
pub const CONSTRAINED_BREAKPOINT_PX: f32 = 768.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance_sq(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    #[must_use]
    pub fn distance(self, other: Point) -> f32 {
        self.distance_sq(other).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectPx {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectPx {
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Converts a cell-space rectangle into pixel space.
    #[must_use]
    pub fn from_cells(col: u16, row: u16, cols: u16, rows: u16) -> Self {
        Self::new(
            f32::from(col) * CELL_WIDTH_PX,
            f32::from(row) * CELL_HEIGHT_PX,
            f32::from(cols) * CELL_WIDTH_PX,
            f32::from(rows) * CELL_HEIGHT_PX,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Desktop,
    Constrained,
}

#[derive(Debug, Clone)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub interaction_radius: f32,
    pointer: Option<Point>,
    forced_class: Option<DeviceClass>,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            interaction_radius: POINTER_RADIUS_PX,
            pointer: None,
            forced_class: None,
        }
    }

    #[must_use]
    pub fn from_cells(cols: u16, rows: u16) -> Self {
        let mut viewport = Self::new(0.0, 0.0);
        viewport.resize_cells(cols, rows);
        viewport
    }

    #[must_use]
    pub fn with_device_class(mut self, class: Option<DeviceClass>) -> Self {
        self.forced_class = class;
        self
    }

    pub fn resize_cells(&mut self, cols: u16, rows: u16) {
        self.width = f32::from(cols) * CELL_WIDTH_PX;
        self.height = f32::from(rows) * CELL_HEIGHT_PX;
    }

    pub fn device_class(&self) -> DeviceClass {
        if let Some(class) = self.forced_class {
            return class;
        }
        if self.width < CONSTRAINED_BREAKPOINT_PX {
            DeviceClass::Constrained
        } else {
            DeviceClass::Desktop
        }
    }

    pub fn is_constrained(&self) -> bool {
        self.device_class() == DeviceClass::Constrained
    }

    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    pub fn set_pointer(&mut self, pointer: Option<Point>) {
        self.pointer = pointer;
    }

    /// Centre of a terminal cell in pixel space.
    #[must_use]
    pub fn cell_center(col: u16, row: u16) -> Point {
        Point::new(
            (f32::from(col) + 0.5) * CELL_WIDTH_PX,
            (f32::from(row) + 0.5) * CELL_HEIGHT_PX,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Self = Self(0, 0, 0);
    pub const WHITE: Self = Self(255, 255, 255);

    #[must_use]
    pub fn mix(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |x: u8, y: u8| -> u8 {
            (f32::from(x) + (f32::from(y) - f32::from(x)) * t)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Rgb(
            mix(self.0, other.0),
            mix(self.1, other.1),
            mix(self.2, other.2),
        )
    }

    #[must_use]
    pub fn luma(self) -> f32 {
        (0.2126 * f32::from(self.0)) + (0.7152 * f32::from(self.1)) + (0.0722 * f32::from(self.2))
    }

    /// `hue` in degrees, `saturation` and `lightness` in `0.0..=1.0`.
    #[must_use]
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Rgb {
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let x = c * (1.0 - (h.rem_euclid(2.0) - 1.0).abs());
        let m = lightness - c / 2.0;
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgb(to_u8(r), to_u8(g), to_u8(b))
    }
}

/// Drawing operations a theme needs from the shared backdrop.
pub trait Surface {
    fn size(&self) -> (f32, f32);
    fn clear(&mut self);
    /// Translucent full-surface fill that leaves fading trails behind.
    fn fade(&mut self, color: Rgb, alpha: f32);
    /// Translucent full-surface fill that tints the background too.
    fn fill(&mut self, color: Rgb, alpha: f32);
    fn circle(&mut self, center: Point, radius: f32, color: Rgb);
    fn line(&mut self, from: Point, to: Point, color: Rgb, alpha: f32);
    /// Draws glyph rows with `anchor` at the bottom-centre. Spaces are transparent.
    fn sprite(&mut self, anchor: Point, rows: &[&str], color: Rgb);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub fg: Rgb,
    pub bg: Rgb,
}

const BLANK: Cell = Cell {
    glyph: ' ',
    fg: Rgb::BLACK,
    bg: Rgb::BLACK,
};

const LINE_GLYPHS: [char; 5] = ['─', '│', '╱', '╲', '·'];

#[derive(Debug, Clone)]
pub struct Canvas {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    #[must_use]
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            cells: vec![BLANK; usize::from(cols) * usize::from(rows)],
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![BLANK; usize::from(cols) * usize::from(rows)];
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<&Cell> {
        self.index(i32::from(col), i32::from(row))
            .map(|idx| &self.cells[idx])
    }

    /// Number of cells currently showing a glyph.
    pub fn lit_cells(&self) -> usize {
        self.cells.iter().filter(|cell| cell.glyph != ' ').count()
    }

    pub fn row_text(&self, row: u16) -> String {
        (0..self.cols)
            .filter_map(|col| self.cell(col, row).map(|cell| cell.glyph))
            .collect()
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 || col >= i32::from(self.cols) || row >= i32::from(self.rows) {
            return None;
        }
        Some(row as usize * usize::from(self.cols) + col as usize)
    }

    fn cell_of(point: Point) -> (i32, i32) {
        (
            (point.x / CELL_WIDTH_PX).floor() as i32,
            (point.y / CELL_HEIGHT_PX).floor() as i32,
        )
    }

    fn plot(&mut self, col: i32, row: i32, glyph: char, fg: Rgb) {
        if let Some(idx) = self.index(col, row) {
            let cell = &mut self.cells[idx];
            cell.glyph = glyph;
            cell.fg = fg;
        }
    }

    fn blend_line_cell(&mut self, col: i32, row: i32, glyph: char, color: Rgb, alpha: f32) {
        let Some(idx) = self.index(col, row) else {
            return;
        };
        let cell = &mut self.cells[idx];
        if cell.glyph != ' ' && !LINE_GLYPHS.contains(&cell.glyph) {
            return;
        }
        cell.glyph = glyph;
        cell.fg = cell.bg.mix(color, alpha);
    }
}

impl Surface for Canvas {
    fn size(&self) -> (f32, f32) {
        (
            f32::from(self.cols) * CELL_WIDTH_PX,
            f32::from(self.rows) * CELL_HEIGHT_PX,
        )
    }

    fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    fn fade(&mut self, color: Rgb, alpha: f32) {
        for cell in &mut self.cells {
            cell.fg = cell.fg.mix(color, alpha);
            cell.bg = cell.bg.mix(color, alpha);
            if cell.glyph != ' ' && (cell.fg.luma() - cell.bg.luma()).abs() < 10.0 {
                cell.glyph = ' ';
            }
        }
    }

    fn fill(&mut self, color: Rgb, alpha: f32) {
        for cell in &mut self.cells {
            cell.bg = cell.bg.mix(color, alpha);
            cell.fg = cell.fg.mix(color, alpha * 0.5);
        }
    }

    fn circle(&mut self, center: Point, radius: f32, color: Rgb) {
        let glyph = if radius < 1.0 {
            '·'
        } else if radius < 2.0 {
            '•'
        } else {
            '●'
        };
        let (col, row) = Self::cell_of(center);
        self.plot(col, row, glyph, color);
    }

    fn line(&mut self, from: Point, to: Point, color: Rgb, alpha: f32) {
        let (x0, y0) = Self::cell_of(from);
        let (x1, y1) = Self::cell_of(to);
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let glyph = if dy.abs() < dx.abs() * 0.4 {
            '─'
        } else if dx.abs() < dy.abs() * 0.4 {
            '│'
        } else if (dx > 0.0) == (dy > 0.0) {
            '╲'
        } else {
            '╱'
        };

        let (mut x, mut y) = (x0, y0);
        let step_x = (x1 - x0).abs();
        let step_y = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = step_x + step_y;
        loop {
            self.blend_line_cell(x, y, glyph, color, alpha);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= step_y {
                err += step_y;
                x += sx;
            }
            if e2 <= step_x {
                err += step_x;
                y += sy;
            }
        }
    }

    fn sprite(&mut self, anchor: Point, rows: &[&str], color: Rgb) {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
        let left = ((anchor.x / CELL_WIDTH_PX) - width as f32 / 2.0).round() as i32;
        let bottom = ((anchor.y - 0.5) / CELL_HEIGHT_PX).floor() as i32;
        let top = bottom - rows.len() as i32 + 1;
        for (dy, text) in rows.iter().enumerate() {
            for (dx, glyph) in text.chars().enumerate() {
                if glyph != ' ' {
                    self.plot(left + dx as i32, top + dy as i32, glyph, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_classifies_narrow_terminals_as_constrained() {
        assert_eq!(
            Viewport::from_cells(80, 24).device_class(),
            DeviceClass::Constrained
        );
        assert_eq!(
            Viewport::from_cells(96, 24).device_class(),
            DeviceClass::Desktop
        );
        let forced = Viewport::from_cells(80, 24).with_device_class(Some(DeviceClass::Desktop));
        assert_eq!(forced.device_class(), DeviceClass::Desktop);
    }

    #[test]
    fn cell_center_maps_into_pixel_space() {
        let p = Viewport::cell_center(2, 1);
        assert!((p.x - 20.0).abs() < f32::EPSILON);
        assert!((p.y - 24.0).abs() < f32::EPSILON);
    }

    #[test]
    fn hsl_primaries() {
        assert_eq!(Rgb::from_hsl(0.0, 1.0, 0.5), Rgb(255, 0, 0));
        assert_eq!(Rgb::from_hsl(120.0, 1.0, 0.5), Rgb(0, 255, 0));
        assert_eq!(Rgb::from_hsl(240.0, 1.0, 0.5), Rgb(0, 0, 255));
        assert_eq!(Rgb::from_hsl(360.0, 1.0, 0.5), Rgb(255, 0, 0));
    }

    #[test]
    fn repeated_fade_erases_glyphs() {
        let mut canvas = Canvas::new(10, 5);
        canvas.circle(Point::new(12.0, 20.0), 1.5, Rgb::WHITE);
        assert_eq!(canvas.lit_cells(), 1);
        for _ in 0..60 {
            canvas.fade(Rgb(17, 17, 17), 0.1);
        }
        assert_eq!(canvas.lit_cells(), 0);
    }

    #[test]
    fn vertical_line_uses_bar_glyph() {
        let mut canvas = Canvas::new(4, 4);
        canvas.line(
            Point::new(12.0, 0.0),
            Point::new(12.0, 40.0),
            Rgb(170, 180, 230),
            0.5,
        );
        assert_eq!(canvas.cell(1, 0).map(|c| c.glyph), Some('│'));
        assert_eq!(canvas.cell(1, 2).map(|c| c.glyph), Some('│'));
        assert_eq!(canvas.lit_cells(), 3);
    }

    #[test]
    fn lines_do_not_overwrite_particles() {
        let mut canvas = Canvas::new(6, 2);
        canvas.circle(Point::new(4.0, 8.0), 1.5, Rgb::WHITE);
        canvas.line(
            Point::new(4.0, 8.0),
            Point::new(44.0, 8.0),
            Rgb::WHITE,
            1.0,
        );
        assert_eq!(canvas.cell(0, 0).map(|c| c.glyph), Some('•'));
        assert_eq!(canvas.cell(3, 0).map(|c| c.glyph), Some('─'));
    }

    #[test]
    fn sprite_is_bottom_anchored_and_clipped() {
        let mut canvas = Canvas::new(10, 4);
        canvas.sprite(Point::new(40.0, 64.0), &["ab", "cd"], Rgb::WHITE);
        assert_eq!(canvas.row_text(2).trim(), "ab");
        assert_eq!(canvas.row_text(3).trim(), "cd");

        canvas.clear();
        canvas.sprite(Point::new(0.0, 16.0), &["xy", "zw"], Rgb::WHITE);
        assert_eq!(canvas.row_text(0), "w         ");
    }

    #[test]
    fn flash_fill_brightens_background() {
        let mut canvas = Canvas::new(2, 2);
        canvas.fill(Rgb::WHITE, 0.5);
        let cell = canvas.cell(0, 0).copied().expect("cell");
        assert!(cell.bg.luma() > 100.0);
    }
}
