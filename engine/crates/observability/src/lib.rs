use std::time::Instant;

use tracing_subscriber::{fmt, EnvFilter};

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(true).init();
}

/// Per-session counters, logged once when the session closes.
#[derive(Debug, Clone)]
pub struct SessionMetrics {
    pub session_id: u64,
    pub opened_at: Instant,
    pub commands: u64,
    pub casts: u64,
    pub broadcasts: u64,
}

impl SessionMetrics {
    pub fn new(session_id: u64) -> Self {
        Self {
            session_id,
            opened_at: Instant::now(),
            commands: 0,
            casts: 0,
            broadcasts: 0,
        }
    }

    pub fn log(&self) {
        tracing::info!(
            session_id = self.session_id,
            uptime_s = self.opened_at.elapsed().as_secs(),
            commands = self.commands,
            casts = self.casts,
            broadcasts = self.broadcasts,
            "session closed"
        );
    }
}
