//! In-memory session store with an idle timeout.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub last_activity: Instant,
}

/// Result of stamping a request against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCheck {
    /// Known session, activity stamped.
    Active,
    /// No usable session was presented; a new one was created.
    Started(String),
    /// Idle for longer than the timeout; the session was removed.
    Expired,
}

/// Sessions keyed by id.
///
/// Idle entries are swept lazily when a new session starts, at most once per
/// idle timeout. Clients that never send the cookie back leave one entry per
/// request, and the sweep is what bounds those.
pub struct SessionStore {
    sessions: DashMap<String, SessionState>,
    idle_timeout: Duration,
    last_sweep: Mutex<Option<Instant>>,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            idle_timeout,
            last_sweep: Mutex::new(None),
        }
    }

    /// Stamp activity for `session_id` at `now`.
    ///
    /// Unknown or missing ids start a fresh session under a new random id
    /// rather than adopting the client's value.
    pub fn touch(&self, session_id: Option<&str>, now: Instant) -> SessionCheck {
        if let Some(id) = session_id {
            if let Some(mut state) = self.sessions.get_mut(id) {
                let idle = now.saturating_duration_since(state.last_activity);
                if idle > self.idle_timeout {
                    drop(state);
                    self.sessions.remove(id);
                    tracing::debug!(session = %id, idle = ?idle, "Session idle timeout");
                    return SessionCheck::Expired;
                }
                state.last_activity = now;
                return SessionCheck::Active;
            }
        }

        self.maybe_sweep(now);

        let id = Uuid::new_v4().to_string();
        self.sessions
            .insert(id.clone(), SessionState { last_activity: now });
        tracing::debug!(session = %id, store_size = self.sessions.len(), "Session started");
        SessionCheck::Started(id)
    }

    pub fn get(&self, session_id: &str) -> Option<SessionState> {
        self.sessions.get(session_id).map(|r| *r.value())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop every session idle for longer than the timeout. Returns how many
    /// were removed.
    pub fn prune_expired(&self, now: Instant) -> usize {
        let before = self.sessions.len();
        let idle_timeout = self.idle_timeout;
        self.sessions
            .retain(|_, state| now.saturating_duration_since(state.last_activity) <= idle_timeout);
        before.saturating_sub(self.sessions.len())
    }

    fn maybe_sweep(&self, now: Instant) {
        {
            let mut last = self.last_sweep.lock();
            let due = last.map_or(true, |at| now.saturating_duration_since(at) > self.idle_timeout);
            if !due {
                return;
            }
            *last = Some(now);
        }
        let removed = self.prune_expired(now);
        if removed > 0 {
            tracing::debug!(removed, remaining = self.sessions.len(), "Swept idle sessions");
        }
    }
}
