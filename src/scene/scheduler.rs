//! Single tick-chain scheduling for theme sessions.
//!
//! Every pending tick is tagged with the session that requested it, so the
//! controller can refuse to run a tick that outlived its session.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickHandle {
    id: u64,
    session: SessionId,
    due: Option<Duration>,
}

impl TickHandle {
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// `None` for a next-refresh tick, `Some(at)` for a delayed re-check.
    pub fn due(&self) -> Option<Duration> {
        self.due
    }
}

#[derive(Debug, Default)]
pub struct FrameScheduler {
    next_id: u64,
    pending: Vec<TickHandle>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_frame(&mut self, session: SessionId) -> TickHandle {
        self.push(session, None)
    }

    pub fn request_after(&mut self, session: SessionId, at: Duration) -> TickHandle {
        self.push(session, Some(at))
    }

    /// Returns `false` when the handle already fired or was cancelled.
    pub fn cancel(&mut self, handle: TickHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|pending| pending.id != handle.id);
        self.pending.len() != before
    }

    pub fn outstanding(&self) -> usize {
        self.pending.len()
    }

    /// Removes and returns every handle due at `now`, oldest first.
    pub fn take_due(&mut self, now: Duration) -> Vec<TickHandle> {
        let (due, waiting): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|handle| handle.due.is_none_or(|at| at <= now));
        self.pending = waiting;
        due
    }

    fn push(&mut self, session: SessionId, due: Option<Duration>) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle {
            id: self.next_id,
            session,
            due,
        };
        self.pending.push(handle);
        handle
    }
}
