use session::{SessionId, SessionOutput};
use tokio::sync::mpsc;

/// Messages from the transport layer to the session supervisor.
#[derive(Debug)]
pub enum ConnEvent {
    /// A new connection was accepted.
    Opened { session_id: SessionId },
    /// Player typed a line of input.
    Line { session_id: SessionId, line: String },
    /// Connection closed.
    Closed { session_id: SessionId },
}

/// Sender from connection tasks to the supervisor.
pub type ConnTx = mpsc::UnboundedSender<ConnEvent>;
/// Receiver in the supervisor for connection events.
pub type ConnRx = mpsc::UnboundedReceiver<ConnEvent>;

/// Sender into the output router.
pub type OutputTx = mpsc::UnboundedSender<SessionOutput>;
/// Receiver in the output router.
pub type OutputRx = mpsc::UnboundedReceiver<SessionOutput>;

/// Per-session write channel (output router -> connection writer task).
pub type SessionWriteTx = mpsc::UnboundedSender<String>;
pub type SessionWriteRx = mpsc::UnboundedReceiver<String>;

/// Registration message for the output router.
#[derive(Debug)]
pub struct RegisterSession {
    pub session_id: SessionId,
    pub write_tx: SessionWriteTx,
}

pub type RegisterTx = mpsc::UnboundedSender<RegisterSession>;
pub type RegisterRx = mpsc::UnboundedReceiver<RegisterSession>;

pub type UnregisterTx = mpsc::UnboundedSender<SessionId>;
pub type UnregisterRx = mpsc::UnboundedReceiver<SessionId>;
