//! In-memory session store.
//!
//! Locking layout: a global `RwLock` guards the session-id → entry map
//! (lookup and insertion only); each entry carries its own `Mutex` so
//! mutations of one session never block another. Callers get clone-out
//! snapshots or run a closure under the per-session lock — the lock is
//! never held across backend I/O.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use ig_domain::lead::Lead;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session state
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One recorded line of conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptLine {
    pub role: String,
    pub content: String,
    pub at: DateTime<Utc>,
}

/// State for one active conversation.
///
/// History is recorded for inspection but not replayed into model calls;
/// the lead is the only state carried across turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub lead: Lead,
    pub history: Vec<TranscriptLine>,
    pub tenant_id: String,
    /// Set once a CRM export succeeds.
    pub export_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl SessionState {
    fn new(default_language: &str) -> Self {
        Self {
            lead: Lead::with_language(default_language),
            history: Vec::new(),
            tenant_id: String::new(),
            export_id: None,
            updated_at: Utc::now(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Owner of all live sessions, keyed by opaque session id.
pub struct SessionStore {
    default_language: String,
    sessions: RwLock<HashMap<String, Arc<Mutex<SessionState>>>>,
}

impl SessionStore {
    pub fn new(default_language: impl Into<String>) -> Self {
        Self {
            default_language: default_language.into(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Get or atomically create the entry for a session id.
    fn entry(&self, session_id: &str) -> Arc<Mutex<SessionState>> {
        // Fast path: session already exists.
        {
            let sessions = self.sessions.read();
            if let Some(entry) = sessions.get(session_id) {
                return Arc::clone(entry);
            }
        }

        // Slow path: insert, rechecking under the write lock.
        let mut sessions = self.sessions.write();
        Arc::clone(sessions.entry(session_id.to_owned()).or_insert_with(|| {
            tracing::debug!(session_id, "session created");
            Arc::new(Mutex::new(SessionState::new(&self.default_language)))
        }))
    }

    /// Clone-out snapshot of a session, creating it first if absent.
    /// Never fails; calling twice with the same id observes the same state.
    pub fn snapshot(&self, session_id: &str) -> SessionState {
        self.entry(session_id).lock().clone()
    }

    /// Atomically replace the whole lead record, creating the session
    /// first if absent. Callers must read-modify-write rather than patch
    /// fields independently.
    pub fn set_lead(&self, session_id: &str, lead: Lead) {
        self.update(session_id, |state| state.lead = lead);
    }

    /// Run a read-modify-write under the per-session lock.
    pub fn update<F, R>(&self, session_id: &str, f: F) -> R
    where
        F: FnOnce(&mut SessionState) -> R,
    {
        let entry = self.entry(session_id);
        let mut state = entry.lock();
        let result = f(&mut state);
        state.updated_at = Utc::now();
        result
    }

    /// Append one line of conversation history.
    pub fn append_history(&self, session_id: &str, role: &str, content: &str) {
        self.update(session_id, |state| {
            state.history.push(TranscriptLine {
                role: role.to_owned(),
                content: content.to_owned(),
                at: Utc::now(),
            });
        });
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Drop sessions idle for longer than `max_idle`. Returns the number
    /// evicted.
    pub fn prune_idle(&self, max_idle: Duration) -> usize {
        let cutoff = Utc::now() - max_idle;
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, entry| entry.lock().updated_at >= cutoff);
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, remaining = sessions.len(), "idle sessions evicted");
        }
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_is_idempotent_and_defaults_language() {
        let store = SessionStore::new("en");
        let first = store.snapshot("s1");
        let second = store.snapshot("s1");
        assert_eq!(first.lead, second.lead);
        assert_eq!(first.lead.language.as_deref(), Some("en"));
        assert!(first.history.is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn set_lead_replaces_whole_record_and_creates_session() {
        let store = SessionStore::new("en");
        let lead = Lead {
            first_name: Some("Jane".into()),
            ..Lead::default()
        };
        store.set_lead("s1", lead.clone());
        assert_eq!(store.snapshot("s1").lead, lead);
        // The replace dropped the defaulted language: whole-record semantics.
        assert!(store.snapshot("s1").lead.language.is_none());
    }

    #[test]
    fn concurrent_updates_to_one_session_serialize() {
        let store = Arc::new(SessionStore::new("en"));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    store.update("s1", |state| {
                        let n: u64 = state
                            .lead
                            .notes
                            .as_deref()
                            .map_or(0, |s| s.parse().unwrap());
                        state.lead.notes = Some((n + 1).to_string());
                    });
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.snapshot("s1").lead.notes.as_deref(), Some("800"));
    }

    #[test]
    fn prune_idle_drops_only_stale_sessions() {
        let store = SessionStore::new("en");
        store.snapshot("stale");
        store.snapshot("fresh");
        // update() touches updated_at after the closure runs, so backdate
        // the entry directly.
        store.entry("stale").lock().updated_at = Utc::now() - Duration::hours(2);
        let evicted = store.prune_idle(Duration::hours(1));
        assert_eq!(evicted, 1);
        assert_eq!(store.len(), 1);
        store.snapshot("fresh");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn append_history_records_ordered_lines() {
        let store = SessionStore::new("en");
        store.append_history("s1", "user", "hello");
        store.append_history("s1", "assistant", "hi there");
        let history = store.snapshot("s1").history;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, "user");
        assert_eq!(history[1].content, "hi there");
    }
}
