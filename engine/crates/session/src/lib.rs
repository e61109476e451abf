pub mod registry;
pub mod state;

pub use registry::{ActorRegistry, SessionHandle};
pub use state::{Mode, Session, SessionMsg};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

/// One outbound text message, routed by session id.
#[derive(Debug, Clone)]
pub struct SessionOutput {
    pub session_id: SessionId,
    pub text: String,
    /// When true, the output router closes the session's write channel
    /// after delivering this message, shutting the connection down.
    pub disconnect: bool,
}

impl SessionOutput {
    pub fn new(session_id: SessionId, text: impl Into<String>) -> Self {
        Self {
            session_id,
            text: text.into(),
            disconnect: false,
        }
    }

    /// Create a final message that will disconnect the session after delivery.
    pub fn with_disconnect(session_id: SessionId, text: impl Into<String>) -> Self {
        Self {
            session_id,
            text: text.into(),
            disconnect: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_constructors() {
        let out = SessionOutput::new(SessionId(1), "hello");
        assert!(!out.disconnect);
        let out = SessionOutput::with_disconnect(SessionId(1), "bye");
        assert!(out.disconnect);
    }
}
