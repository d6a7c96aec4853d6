use super::scheduler::SessionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    PointerDown,
    PointerMove,
    PointerUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone, Copy)]
struct Registration {
    id: ListenerId,
    session: SessionId,
    kind: ListenerKind,
}

/// Pointer listeners attached by theme sessions.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next_id: u64,
    registrations: Vec<Registration>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, session: SessionId, kind: ListenerKind) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.registrations.push(Registration { id, session, kind });
        id
    }

    /// Detaches every listener owned by `session`, returning how many were removed.
    pub fn detach_session(&mut self, session: SessionId) -> usize {
        let before = self.registrations.len();
        self.registrations.retain(|reg| reg.session != session);
        before - self.registrations.len()
    }

    pub fn is_listening(&self, session: SessionId, kind: ListenerKind) -> bool {
        self.registrations
            .iter()
            .any(|reg| reg.session == session && reg.kind == kind)
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.registrations.iter().any(|reg| reg.id == id)
    }

    pub fn count(&self) -> usize {
        self.registrations.len()
    }
}
