use std::collections::HashMap;
use std::sync::RwLock;

use game_core::Character;
use tokio::sync::mpsc;

use crate::state::SessionMsg;

/// Address of a running actor's mailbox.
pub type SessionHandle = mpsc::UnboundedSender<SessionMsg>;

/// Directory of live actor handles, keyed by character identity.
///
/// Handles are registered on login and removed on disconnect. Delivery is
/// best effort: a handle whose actor has stopped is dropped on the first
/// failed send, and the message is lost. That is expected, never an error.
#[derive(Debug, Default)]
pub struct ActorRegistry {
    handles: RwLock<HashMap<Character, SessionHandle>>,
}

impl ActorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, who: Character, handle: SessionHandle) {
        let mut handles = self.handles.write().expect("actor registry lock poisoned");
        handles.insert(who, handle);
    }

    pub fn contains(&self, who: &Character) -> bool {
        let handles = self.handles.read().expect("actor registry lock poisoned");
        handles.contains_key(who)
    }

    pub fn unregister(&self, who: &Character) {
        let mut handles = self.handles.write().expect("actor registry lock poisoned");
        handles.remove(who);
    }

    /// Deliver a message to whoever owns `who`, if they are still running.
    /// Returns whether the message was accepted into a live mailbox.
    pub fn deliver(&self, who: &Character, msg: SessionMsg) -> bool {
        let stale = {
            let handles = self.handles.read().expect("actor registry lock poisoned");
            match handles.get(who) {
                Some(handle) => {
                    if handle.send(msg).is_ok() {
                        return true;
                    }
                    true // send failed: handle is stale
                }
                None => false,
            }
        };
        if stale {
            tracing::debug!(who = %who, "dropping stale actor handle");
            self.unregister(who);
        }
        false
    }

    /// All live handles, for shutdown fan-out.
    pub fn handles(&self) -> Vec<SessionHandle> {
        let handles = self.handles.read().expect("actor registry lock poisoned");
        handles.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        let handles = self.handles.read().expect("actor registry lock poisoned");
        handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
