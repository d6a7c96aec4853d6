use std::{path::PathBuf, time::Duration, time::Instant};

use anyhow::Result;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use tokio::sync::mpsc;

use crate::{
    app::{
        events::{AppEvent, start_frame_task, start_resolution},
        settings::{PersistedState, load_persisted_state, save_persisted_state},
    },
    cli::Cli,
    data::{
        forecast::ForecastClient,
        geoip::GeoLocator,
        resolver::{Resolution, WeatherResolver},
    },
    domain::weather::ThemeSelection,
    scene::{
        ControllerOptions, FrameCues, PointerEvent, Theme, ThemeController, Viewport,
        snow::SnowTheme,
    },
    ui::{
        backdrop::Effects,
        palette::{ColorCapability, detect_color_capability},
        switcher::{self, SwitcherAction, Trigger},
    },
};

const TINT_FRAMES: u16 = 45;
const SHAKE_FRAMES: u16 = 10;
const BOUNCE_FRAMES: u16 = 12;
const SHAKE_PATTERN: [(i16, i16); 4] = [(1, 0), (-1, 0), (0, 1), (-1, -1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Running,
    Quit,
}

#[derive(Debug)]
pub struct AppState {
    pub mode: AppMode,
    pub running: bool,
    pub controller: ThemeController,
    /// Fixed theme chosen by flag or switcher; `None` follows the weather.
    pub manual: Option<ThemeSelection>,
    pub weather: Option<Resolution>,
    pub capability: ColorCapability,
    pub frame_count: u64,
    tint_frames: u16,
    shake_frames: u16,
    bounce_frames: u16,
    bell_pending: bool,
    bell: bool,
    started: Instant,
    state_path: Option<PathBuf>,
    resolver: WeatherResolver,
}

impl AppState {
    pub fn new(cli: &Cli, cols: u16, rows: u16) -> Self {
        let (persisted, state_path) = load_persisted_state(!cli.no_state);
        let controller = ThemeController::new(
            cols,
            rows,
            ControllerOptions {
                device: cli.device_class(),
                snow: cli.snow_overrides(),
                seed: cli.seed,
                instructions_shown: persisted.instructions_shown,
            },
        );
        let resolver = WeatherResolver::new(
            GeoLocator::with_url(&cli.geoip_url),
            ForecastClient::with_base_url(&cli.forecast_url),
            cli.fixed_location(),
        );

        Self {
            mode: AppMode::Running,
            running: true,
            controller,
            manual: cli.theme.selection(),
            weather: None,
            capability: detect_color_capability(),
            frame_count: 0,
            tint_frames: 0,
            shake_frames: 0,
            bounce_frames: 0,
            bell_pending: false,
            bell: cli.bell,
            started: Instant::now(),
            state_path,
            resolver,
        }
    }

    pub async fn handle_event(
        &mut self,
        event: AppEvent,
        tx: &mpsc::Sender<AppEvent>,
        cli: &Cli,
    ) -> Result<()> {
        match event {
            AppEvent::Bootstrap => {
                cli.validate()?;
                start_frame_task(tx.clone(), cli.fps);
                match self.manual {
                    Some(selection) => self.controller.switch_to(selection),
                    None => {
                        self.controller.switch_to(ThemeSelection::FALLBACK);
                        start_resolution(tx.clone(), self.resolver.clone());
                    }
                }
            }
            AppEvent::TickFrame => {
                let now = self.started.elapsed();
                self.advance_frame(now);
            }
            AppEvent::Input(event) => self.handle_input(event, tx).await?,
            AppEvent::WeatherResolved(resolution) => self.apply_resolution(resolution),
            AppEvent::Quit => {
                self.mode = AppMode::Quit;
            }
        }

        Ok(())
    }

    /// Runs one frame against the frame clock `now`.
    pub fn advance_frame(&mut self, now: Duration) {
        self.frame_count = self.frame_count.wrapping_add(1);
        self.tint_frames = self.tint_frames.saturating_sub(1);
        self.shake_frames = self.shake_frames.saturating_sub(1);
        self.bounce_frames = self.bounce_frames.saturating_sub(1);

        let obstacle = switcher::obstacle(self.area());
        self.controller.set_obstacle(Some(obstacle));
        let cues = self.controller.on_frame(now);
        self.apply_cues(cues);
    }

    fn apply_cues(&mut self, cues: FrameCues) {
        if cues.tint {
            self.tint_frames = TINT_FRAMES;
        }
        if cues.shake {
            self.shake_frames = SHAKE_FRAMES;
        }
        if cues.bounce {
            self.bounce_frames = BOUNCE_FRAMES;
        }
        if cues.haptic && self.bell {
            self.bell_pending = true;
        }
        if cues.instructions_done {
            self.persist_instructions_shown();
        }
    }

    fn persist_instructions_shown(&self) {
        let Some(path) = &self.state_path else {
            return;
        };
        let state = PersistedState {
            instructions_shown: true,
        };
        if let Err(err) = save_persisted_state(path, state) {
            log::warn!("saving first-run state failed: {err:#}");
        }
    }

    pub fn apply_resolution(&mut self, resolution: Resolution) {
        if self.manual.is_none() {
            self.controller.switch_to(resolution.selection);
        } else {
            log::debug!(
                "weather resolved to {} while a manual theme is active",
                resolution.selection.label()
            );
        }
        self.weather = Some(resolution);
    }

    async fn handle_input(&mut self, event: Event, tx: &mpsc::Sender<AppEvent>) -> Result<()> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if key.code == KeyCode::Esc {
                    tx.send(AppEvent::Quit).await?;
                } else if let Some(action) = command_char(key).and_then(SwitcherAction::from_key) {
                    self.apply_action(action, tx).await?;
                }
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse, tx).await?,
            Event::Resize(cols, rows) => {
                self.controller.resize(cols, rows);
                if let Some(selection) = self.controller.selection() {
                    self.controller.switch_to(selection);
                }
                if self.manual.is_none() {
                    start_resolution(tx.clone(), self.resolver.clone());
                }
            }
            Event::FocusGained => self.controller.set_visible(true),
            Event::FocusLost => {
                self.controller.set_visible(false);
                self.controller.pointer_left();
            }
            _ => {}
        }

        Ok(())
    }

    async fn handle_mouse(&mut self, mouse: MouseEvent, tx: &mpsc::Sender<AppEvent>) -> Result<()> {
        let point = Viewport::cell_center(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                match switcher::action_at(self.area(), mouse.column, mouse.row) {
                    Some(action) => self.apply_action(action, tx).await?,
                    None => self.controller.pointer(PointerEvent::Down(point)),
                }
            }
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                self.controller.pointer(PointerEvent::Move(point));
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.controller.pointer(PointerEvent::Up(point));
            }
            _ => {}
        }
        Ok(())
    }

    async fn apply_action(&mut self, action: SwitcherAction, tx: &mpsc::Sender<AppEvent>) -> Result<()> {
        match action {
            SwitcherAction::Trigger(trigger) => {
                let selection = trigger.selection();
                self.manual = Some(selection);
                self.controller.switch_to(selection);
            }
            SwitcherAction::Auto => {
                self.manual = None;
                if let Some(resolution) = &self.weather {
                    self.controller.switch_to(resolution.selection);
                }
                start_resolution(tx.clone(), self.resolver.clone());
            }
            SwitcherAction::Quit => tx.send(AppEvent::Quit).await?,
        }
        Ok(())
    }

    pub fn area(&self) -> Rect {
        let canvas = self.controller.canvas();
        Rect::new(0, 0, canvas.cols(), canvas.rows())
    }

    pub fn effects(&self) -> Effects {
        let tint = f32::from(self.tint_frames) / f32::from(TINT_FRAMES) * 0.6;
        let shake = if self.shake_frames > 0 {
            SHAKE_PATTERN[(self.frame_count % SHAKE_PATTERN.len() as u64) as usize]
        } else {
            (0, 0)
        };
        Effects { tint, shake }
    }

    pub fn bouncing(&self) -> bool {
        self.bounce_frames > 0
    }

    /// Returns and clears a pending bell request.
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell_pending)
    }

    pub fn active_trigger(&self) -> Option<Trigger> {
        self.controller.selection().map(Trigger::for_selection)
    }

    pub fn instructions_visible(&self) -> bool {
        self.controller
            .theme()
            .and_then(Theme::snow)
            .is_some_and(SnowTheme::instructions_visible)
    }

    pub fn status(&self) -> String {
        if let Some(selection) = self.manual {
            return format!("manual: {}", selection.label());
        }
        match &self.weather {
            Some(Resolution {
                selection,
                code: Some(code),
                location,
            }) => {
                let place = location
                    .as_ref()
                    .map_or_else(|| "here".to_string(), |loc| loc.display_name());
                format!("{place}: {} (code {code})", selection.label())
            }
            Some(resolution) => format!("weather unavailable: {}", resolution.selection.label()),
            None => "locating...".to_string(),
        }
    }
}

fn command_char(key: KeyEvent) -> Option<char> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
    {
        return None;
    }
    if let KeyCode::Char(ch) = key.code {
        Some(ch.to_ascii_lowercase())
    } else {
        None
    }
}
