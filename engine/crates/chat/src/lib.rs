use std::collections::BTreeMap;

use net::Socket;
use session::SessionId;

/// Outcome of a join attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinReply {
    Joined,
    /// Joining twice is a no-op, reported but never an error.
    AlreadyJoined,
    NoSuchChannel,
}

/// Outcome of a leave attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveReply {
    Left,
    NotJoined,
    NoSuchChannel,
}

/// Outcome of a send attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendReply {
    Sent,
    NotJoined,
    NoSuchChannel,
}

#[derive(Debug, Default)]
struct Channel {
    subscribers: BTreeMap<SessionId, Socket>,
}

/// Named broadcast channels and their subscriber sets.
///
/// The bus only tracks live subscriptions; each player's durable membership
/// lives in their own save and is replayed through `join` on login, so the
/// two views are kept consistent by the join/leave operations themselves.
///
/// Broadcast walks the subscriber set and pushes one copy at each socket.
/// Messages from a single sender arrive in their send order; interleaving
/// between concurrent senders is unspecified.
#[derive(Debug, Default)]
pub struct ChannelBus {
    channels: BTreeMap<String, Channel>,
}

impl ChannelBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a channel if it does not exist yet.
    pub fn create(&mut self, name: impl Into<String>) {
        self.channels.entry(name.into()).or_default();
    }

    pub fn has(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.channels.keys().cloned().collect()
    }

    pub fn is_subscribed(&self, name: &str, session_id: SessionId) -> bool {
        self.channels
            .get(name)
            .map(|c| c.subscribers.contains_key(&session_id))
            .unwrap_or(false)
    }

    pub fn subscriber_count(&self, name: &str) -> usize {
        self.channels
            .get(name)
            .map(|c| c.subscribers.len())
            .unwrap_or(0)
    }

    pub fn join(&mut self, name: &str, session_id: SessionId, socket: Socket) -> JoinReply {
        let Some(channel) = self.channels.get_mut(name) else {
            return JoinReply::NoSuchChannel;
        };
        if channel.subscribers.contains_key(&session_id) {
            return JoinReply::AlreadyJoined;
        }
        channel.subscribers.insert(session_id, socket);
        tracing::debug!(channel = name, ?session_id, "channel joined");
        JoinReply::Joined
    }

    pub fn leave(&mut self, name: &str, session_id: SessionId) -> LeaveReply {
        let Some(channel) = self.channels.get_mut(name) else {
            return LeaveReply::NoSuchChannel;
        };
        if channel.subscribers.remove(&session_id).is_none() {
            return LeaveReply::NotJoined;
        }
        tracing::debug!(channel = name, ?session_id, "channel left");
        LeaveReply::Left
    }

    /// Broadcast `message` from `sender_name` to every subscriber,
    /// including the sender. Requires the sender to be subscribed.
    pub fn send(
        &self,
        name: &str,
        session_id: SessionId,
        sender_name: &str,
        message: &str,
    ) -> SendReply {
        let Some(channel) = self.channels.get(name) else {
            return SendReply::NoSuchChannel;
        };
        if !channel.subscribers.contains_key(&session_id) {
            return SendReply::NotJoined;
        }

        let line = format!("[{}] {}: {}", name, sender_name, message);
        for socket in channel.subscribers.values() {
            socket.echo(line.clone());
        }
        SendReply::Sent
    }

    /// Drop one session from every channel. Returns the channels it was in.
    pub fn leave_all(&mut self, session_id: SessionId) -> Vec<String> {
        let mut left = Vec::new();
        for (name, channel) in &mut self.channels {
            if channel.subscribers.remove(&session_id).is_some() {
                left.push(name.clone());
            }
        }
        left
    }
}
