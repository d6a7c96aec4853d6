//! Frame-driven theme engine: the drawing surface, the particle themes and
//! the controller that keeps exactly one of them running.

pub mod constellation;
pub mod controller;
pub mod listeners;
pub mod rain;
pub mod scheduler;
pub mod snow;
pub mod surface;
pub mod theme;

pub use controller::{ControllerOptions, HIDDEN_RECHECK, ThemeController};
pub use surface::{Canvas, DeviceClass, Point, RectPx, Rgb, Surface, Viewport};
pub use theme::{FrameCues, PointerEvent, Theme, ThemeKind};
