//! Owns the single active theme session and drives its tick chain.

use std::time::Duration;

use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{
    listeners::{ListenerId, ListenerRegistry},
    scheduler::{FrameScheduler, SessionId, TickHandle},
    snow::SnowOverrides,
    surface::{Canvas, DeviceClass, RectPx, Surface, Viewport},
    theme::{FrameCues, PointerEvent, StartContext, Theme},
};
use crate::domain::weather::ThemeSelection;

/// Delay between re-checks while the backdrop is not visible.
pub const HIDDEN_RECHECK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerOptions {
    pub device: Option<DeviceClass>,
    pub snow: SnowOverrides,
    pub seed: Option<u64>,
    pub instructions_shown: bool,
}

#[derive(Debug)]
struct Session {
    id: SessionId,
    selection: ThemeSelection,
    theme: Theme,
    handle: Option<TickHandle>,
    listeners: Vec<ListenerId>,
}

#[derive(Debug)]
pub struct ThemeController {
    viewport: Viewport,
    canvas: Canvas,
    scheduler: FrameScheduler,
    listeners: ListenerRegistry,
    session: Option<Session>,
    next_session: u64,
    rng: StdRng,
    clock: Duration,
    visible: bool,
    snow: SnowOverrides,
    instructions_shown: bool,
    obstacle: Option<RectPx>,
}

impl ThemeController {
    pub fn new(cols: u16, rows: u16, options: ControllerOptions) -> Self {
        let rng = options
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self {
            viewport: Viewport::from_cells(cols, rows).with_device_class(options.device),
            canvas: Canvas::new(cols, rows),
            scheduler: FrameScheduler::new(),
            listeners: ListenerRegistry::new(),
            session: None,
            next_session: 0,
            rng,
            clock: Duration::ZERO,
            visible: true,
            snow: options.snow,
            instructions_shown: options.instructions_shown,
            obstacle: None,
        }
    }

    /// Tears down the current session, clears the surface and starts `selection`.
    pub fn switch_to(&mut self, selection: ThemeSelection) {
        self.stop_session();
        self.canvas.clear();

        self.next_session += 1;
        let id = SessionId(self.next_session);
        let ctx = StartContext {
            viewport: &self.viewport,
            now: self.clock,
            snow: &self.snow,
            instructions_shown: self.instructions_shown,
        };
        let mut theme = Theme::start(selection, &ctx, self.rng.random());
        theme.set_visible(self.visible);
        theme.set_obstacle(self.obstacle);

        let listeners = theme
            .listeners()
            .iter()
            .map(|kind| self.listeners.register(id, *kind))
            .collect();
        let handle = Some(self.schedule(id));
        log::info!(
            "theme session {} started: {} ({:?})",
            id.0,
            selection.label(),
            self.viewport.device_class()
        );
        self.session = Some(Session {
            id,
            selection,
            theme,
            handle,
            listeners,
        });
    }

    fn stop_session(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        if let Some(handle) = session.handle.take() {
            self.scheduler.cancel(handle);
        }
        let detached = self.listeners.detach_session(session.id);
        debug_assert_eq!(detached, session.listeners.len());
        session.theme.stop();
        log::debug!(
            "theme session {} stopped, {detached} listeners detached",
            session.id.0
        );
    }

    fn schedule(&mut self, id: SessionId) -> TickHandle {
        if self.visible {
            self.scheduler.request_frame(id)
        } else {
            self.scheduler.request_after(id, self.clock + HIDDEN_RECHECK)
        }
    }

    /// Runs the active session's tick if one is due at `now`.
    pub fn on_frame(&mut self, now: Duration) -> FrameCues {
        self.clock = now;
        let due = self.scheduler.take_due(now);
        let Some(active) = self.session.as_ref().map(|session| session.id) else {
            return FrameCues::default();
        };
        if !due.iter().any(|handle| handle.session() == active) {
            return FrameCues::default();
        }

        let mut cues = FrameCues::default();
        if self.visible
            && let Some(session) = self.session.as_mut()
        {
            cues = session.theme.tick(now, &self.viewport, &mut self.canvas);
        }
        let handle = self.schedule(active);
        if let Some(session) = self.session.as_mut() {
            session.handle = Some(handle);
        }
        if cues.instructions_done {
            self.instructions_shown = true;
        }
        cues
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        log::debug!("backdrop visibility changed: {visible}");
        let Some(id) = self.session.as_ref().map(|session| session.id) else {
            return;
        };
        if let Some(session) = self.session.as_mut() {
            session.theme.set_visible(visible);
            if let Some(handle) = session.handle.take() {
                self.scheduler.cancel(handle);
            }
        }
        let handle = self.schedule(id);
        if let Some(session) = self.session.as_mut() {
            session.handle = Some(handle);
        }
    }

    /// Records the pointer position and forwards the event to a listening session.
    pub fn pointer(&mut self, event: PointerEvent) {
        self.viewport.set_pointer(Some(event.point()));
        if let Some(session) = self.session.as_mut()
            && self.listeners.is_listening(session.id, event.kind())
        {
            session.theme.pointer(event);
        }
    }

    pub fn pointer_left(&mut self) {
        self.viewport.set_pointer(None);
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.viewport.resize_cells(cols, rows);
        self.canvas.resize(cols, rows);
    }

    pub fn set_obstacle(&mut self, obstacle: Option<RectPx>) {
        self.obstacle = obstacle;
        if let Some(session) = self.session.as_mut() {
            session.theme.set_obstacle(obstacle);
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn theme(&self) -> Option<&Theme> {
        self.session.as_ref().map(|session| &session.theme)
    }

    pub fn theme_mut(&mut self) -> Option<&mut Theme> {
        self.session.as_mut().map(|session| &mut session.theme)
    }

    pub fn selection(&self) -> Option<ThemeSelection> {
        self.session.as_ref().map(|session| session.selection)
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|session| session.id)
    }

    pub fn outstanding_ticks(&self) -> usize {
        self.scheduler.outstanding()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.count()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn instructions_shown(&self) -> bool {
        self.instructions_shown
    }
}
