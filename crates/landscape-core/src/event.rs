//! Server events pushed by the host runtime.

/// Category of a server event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerEventKind {
    /// Host lifecycle notification (pause, resume, focus).
    Lifecycle,
    /// Completion of work the app delegated to the host.
    Completion,
    /// Anything else, tagged with a host-defined code.
    Custom(u32),
}

/// An opaque message delivered by the host outside the tick cadence.
///
/// Events are transient: handlers borrow them for the duration of the call
/// and must not retain them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEvent {
    kind: ServerEventKind,
    payload: Vec<u8>,
}

impl ServerEvent {
    pub fn new(kind: ServerEventKind, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            payload: payload.into(),
        }
    }

    /// Event with no payload.
    pub const fn bare(kind: ServerEventKind) -> Self {
        Self {
            kind,
            payload: Vec::new(),
        }
    }

    #[inline]
    pub const fn kind(&self) -> ServerEventKind {
        self.kind
    }

    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}
