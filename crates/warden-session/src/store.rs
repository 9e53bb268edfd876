//! The session store: one lazily-populated map per record type.
//!
//! # Concurrency note
//!
//! Unlike a single-owner registry, this store is shared between the
//! command-dispatch path and the background tick task, so it is built on
//! a `DashMap` (sharded, concurrent) and every record sits behind its own
//! `parking_lot::Mutex`.
//!
//! Lock order is always *map shard → record*, never the reverse: callers
//! obtain a [`SessionHandle`] first, release the map, then lock the
//! record. Code holding a record lock must not call back into the store.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::time::Instant;
use warden_host::{Identity, Population};

use crate::SessionRecord;

/// Shared, lockable handle to one identity's record.
///
/// The mutex is the per-identity lock: compound check-then-act sequences
/// (admission checks, sweep transitions) run entirely inside one `lock()`.
pub type SessionHandle<S> = Arc<Mutex<S>>;

/// All records of type `S`, keyed by identity.
///
/// ## Lifecycle
///
/// ```text
/// get_or_create() ──→ handle_disconnect() ──→ handle_reconnect()
///        │                   │                        │
///        ▼                   ▼                        ▼
///   [Connected]        [Disconnected]            [Connected]
///                            │
///                            ▼ (stale, owner offline)
///                        reap() ──→ removed
/// ```
pub struct SessionStore<S: SessionRecord> {
    sessions: DashMap<Identity, SessionHandle<S>>,
}

impl<S: SessionRecord> SessionStore<S> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Returns the record for `identity`, creating it on first access.
    ///
    /// Idempotent under concurrency: two threads racing on the same new
    /// identity get the same `Arc`, because `entry()` holds the shard's
    /// write lock while the record is built.
    pub fn get_or_create(&self, identity: &Identity) -> SessionHandle<S> {
        // Fast path: shared read lock only.
        if let Some(existing) = self.sessions.get(identity) {
            return Arc::clone(existing.value());
        }

        let entry = self.sessions.entry(identity.clone()).or_insert_with(|| {
            tracing::debug!(%identity, kind = S::KIND, "session created");
            Arc::new(Mutex::new(S::create(Instant::now())))
        });
        Arc::clone(entry.value())
    }

    /// Looks up a record without creating one.
    pub fn get(&self, identity: &Identity) -> Option<SessionHandle<S>> {
        self.sessions.get(identity).map(|entry| Arc::clone(entry.value()))
    }

    /// Snapshot of every record, for sweeps.
    ///
    /// The returned handles stay valid even if the reaper removes the
    /// entry mid-sweep; no map lock is held while the caller iterates.
    pub fn all(&self) -> Vec<(Identity, SessionHandle<S>)> {
        self.sessions
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect()
    }

    /// Marks the owner as gone and starts the staleness clock.
    /// No-op if the identity has no record.
    pub fn handle_disconnect(&self, identity: &Identity) {
        let Some(handle) = self.get(identity) else {
            return;
        };
        let mut session = handle.lock();
        session.lifecycle_mut().disconnect(Instant::now());
        session.on_disconnect();
    }

    /// Marks the owner as present again. No-op if the identity has no
    /// record.
    pub fn handle_reconnect(&self, identity: &Identity) {
        let Some(handle) = self.get(identity) else {
            return;
        };
        let mut session = handle.lock();
        let away = session.lifecycle_mut().reconnect(Instant::now());
        session.on_reconnect(away);
    }

    /// Removes records whose owner is offline and whose `is_recent()` is
    /// false. Console records are never removed.
    ///
    /// Returns the identities that were removed.
    pub fn reap(&self, now: Instant, population: &dyn Population) -> Vec<Identity> {
        let mut reaped = Vec::new();

        // `retain` keeps only entries where the closure returns `true`.
        self.sessions.retain(|identity, handle| {
            if identity.is_console() || population.is_online(identity) {
                return true;
            }
            if handle.lock().is_recent(now) {
                return true;
            }
            reaped.push(identity.clone());
            false
        });

        reaped
    }

    /// Number of records (any state).
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if there are no records.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl<S: SessionRecord> Default for SessionStore<S> {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
