use session::{SessionId, SessionOutput};

use crate::channels::OutputTx;

/// Outbound capability handed to a session and to anything broadcasting at
/// it. Delivery is best effort; once the router drops the session, sends
/// vanish quietly.
#[derive(Debug, Clone)]
pub struct Socket {
    session_id: SessionId,
    output_tx: OutputTx,
}

impl Socket {
    pub fn new(session_id: SessionId, output_tx: OutputTx) -> Self {
        Self {
            session_id,
            output_tx,
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn echo(&self, text: impl Into<String>) {
        let _ = self
            .output_tx
            .send(SessionOutput::new(self.session_id, text));
    }

    /// Deliver a final line and close the connection behind the session.
    pub fn disconnect(&self, text: impl Into<String>) {
        let _ = self
            .output_tx
            .send(SessionOutput::with_disconnect(self.session_id, text));
    }
}
