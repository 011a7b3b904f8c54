//! In-process session ledger
//!
//! A cache of active invite sessions keyed by `invite_id`, used so the
//! fast path can aggregate without round-tripping the durable store on
//! every event. The ledger is never a source of truth: a miss means the
//! caller rehydrates from the store, which also makes the coordinator
//! tolerant of process restarts mid-session.
//!
//! Concurrency uses a lock-map rather than one global lock: the outer
//! mutex is held only long enough to fetch or insert a per-session slot,
//! and the per-session `tokio` mutex is then held across the store calls
//! for that session. All read-modify-write for one `invite_id` is thereby
//! serialized while different `invite_id`s proceed fully in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use teamvote_domain::InviteSession;

/// Per-session slot guarded by its own async mutex
///
/// `None` is a cache miss: the session may still exist durably and must be
/// rehydrated before the caller can proceed.
pub type SessionSlot = Arc<tokio::sync::Mutex<Option<InviteSession>>>;

/// Cache of active sessions with per-key serialization
#[derive(Default)]
pub struct SessionLedger {
    slots: Mutex<HashMap<String, SessionSlot>>,
}

impl SessionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the slot for a session, creating an empty one on first access
    ///
    /// Callers lock the returned slot before touching session state; the
    /// outer map lock is released before that happens.
    pub fn slot(&self, invite_id: &str) -> SessionSlot {
        let mut slots = self.slots.lock().expect("ledger lock poisoned");
        slots
            .entry(invite_id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(None)))
            .clone()
    }

    /// Whether the ledger currently tracks this session
    pub fn contains(&self, invite_id: &str) -> bool {
        self.slots
            .lock()
            .expect("ledger lock poisoned")
            .contains_key(invite_id)
    }

    /// Retire a session from the cache
    ///
    /// Called once a terminal outcome has been durably persisted. A task
    /// already waiting on the evicted slot still observes the decided
    /// session it holds; a fresh caller gets a new empty slot and
    /// rehydrates the terminal state from the store.
    pub fn evict(&self, invite_id: &str) {
        self.slots
            .lock()
            .expect("ledger lock poisoned")
            .remove(invite_id);
    }

    /// Number of sessions currently cached
    pub fn len(&self) -> usize {
        self.slots.lock().expect("ledger lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_slot_is_shared_per_key() {
        let ledger = SessionLedger::new();
        let first = ledger.slot("reg-1");
        let second = ledger.slot("reg-1");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(ledger.len(), 1);
    }

    #[tokio::test]
    async fn test_different_keys_get_different_slots() {
        let ledger = SessionLedger::new();
        let first = ledger.slot("reg-1");
        let second = ledger.slot("reg-2");

        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_evict_removes_entry() {
        let ledger = SessionLedger::new();
        ledger.slot("reg-1");
        assert!(ledger.contains("reg-1"));

        ledger.evict("reg-1");
        assert!(!ledger.contains("reg-1"));
        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn test_fresh_slot_is_a_miss() {
        let ledger = SessionLedger::new();
        let slot = ledger.slot("reg-1");
        assert!(slot.lock().await.is_none());
    }
}
