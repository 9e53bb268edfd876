//! The session registry: one [`SessionStore`] per record type.
//!
//! Engines ask the registry for their store once at construction
//! (`registry.store::<AfkSession>()`) and keep the `Arc`. The registry
//! itself only needs the type-erased side of each store, to fan out
//! connect/disconnect events and to reap.

use std::any::{Any, TypeId};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::time::Instant;
use warden_host::{Identity, Population};

use crate::{SessionHandle, SessionRecord, SessionStore};

/// Type-erased view of a [`SessionStore`], for operations that apply to
/// every record type alike.
pub trait StoreLifecycle: Send + Sync {
    /// The record type's [`SessionRecord::KIND`].
    fn kind(&self) -> &'static str;

    fn handle_disconnect(&self, identity: &Identity);

    fn handle_reconnect(&self, identity: &Identity);

    /// See [`SessionStore::reap`].
    fn reap(&self, now: Instant, population: &dyn Population) -> Vec<Identity>;

    fn len(&self) -> usize;
}

impl<S: SessionRecord> StoreLifecycle for SessionStore<S> {
    fn kind(&self) -> &'static str {
        S::KIND
    }

    fn handle_disconnect(&self, identity: &Identity) {
        SessionStore::handle_disconnect(self, identity);
    }

    fn handle_reconnect(&self, identity: &Identity) {
        SessionStore::handle_reconnect(self, identity);
    }

    fn reap(&self, now: Instant, population: &dyn Population) -> Vec<Identity> {
        SessionStore::reap(self, now, population)
    }

    fn len(&self) -> usize {
        SessionStore::len(self)
    }
}

#[derive(Clone)]
struct RegisteredStore {
    typed: Arc<dyn Any + Send + Sync>,
    lifecycle: Arc<dyn StoreLifecycle>,
}

/// Owns every session store, keyed by record type.
///
/// Create one per server and share it (`Arc<SessionRegistry>`) with the
/// engines and the reaper.
#[derive(Default)]
pub struct SessionRegistry {
    stores: DashMap<TypeId, RegisteredStore>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The store for record type `S`, created on first request.
    pub fn store<S: SessionRecord>(&self) -> Arc<SessionStore<S>> {
        let entry = self.stores.entry(TypeId::of::<S>()).or_insert_with(|| {
            let store = Arc::new(SessionStore::<S>::new());
            let typed: Arc<dyn Any + Send + Sync> = store.clone();
            RegisteredStore {
                typed,
                lifecycle: store,
            }
        });

        Arc::clone(&entry.typed)
            .downcast::<SessionStore<S>>()
            // The map key is the TypeId of the value's own record type.
            .expect("store registered under its own TypeId")
    }

    /// `getOrCreate(type, identity)`.
    pub fn get_or_create<S: SessionRecord>(&self, identity: &Identity) -> SessionHandle<S> {
        self.store::<S>().get_or_create(identity)
    }

    /// Forwards a disconnect to every store.
    pub fn handle_disconnect(&self, identity: &Identity) {
        for store in self.stores() {
            store.handle_disconnect(identity);
        }
        tracing::debug!(%identity, "sessions marked disconnected");
    }

    /// Forwards a reconnect to every store.
    pub fn handle_reconnect(&self, identity: &Identity) {
        for store in self.stores() {
            store.handle_reconnect(identity);
        }
        tracing::debug!(%identity, "sessions marked connected");
    }

    /// Snapshot of every registered store.
    pub fn stores(&self) -> Vec<Arc<dyn StoreLifecycle>> {
        self.stores
            .iter()
            .map(|entry| Arc::clone(&entry.value().lifecycle))
            .collect()
    }

    /// Total records across all stores.
    pub fn session_count(&self) -> usize {
        self.stores().iter().map(|store| store.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UserSession;

    #[test]
    fn test_store_returns_same_store_per_type() {
        let registry = SessionRegistry::new();

        let a = registry.store::<UserSession>();
        let b = registry.store::<UserSession>();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.stores().len(), 1);
    }

    #[test]
    fn test_get_or_create_goes_through_typed_store() {
        let registry = SessionRegistry::new();
        let steve = Identity::player("Steve");

        let handle = registry.get_or_create::<UserSession>(&steve);
        let again = registry.store::<UserSession>().get_or_create(&steve);

        assert!(Arc::ptr_eq(&handle, &again));
        assert_eq!(registry.session_count(), 1);
    }

    #[test]
    fn test_handle_disconnect_fans_out() {
        let registry = SessionRegistry::new();
        let steve = Identity::player("Steve");
        let handle = registry.get_or_create::<UserSession>(&steve);

        registry.handle_disconnect(&steve);

        assert!(!handle.lock().lifecycle().is_connected());
    }

    #[test]
    fn test_store_lifecycle_kind() {
        let registry = SessionRegistry::new();
        registry.store::<UserSession>();

        let kinds: Vec<_> =
            registry.stores().iter().map(|s| s.kind()).collect();
        assert_eq!(kinds, vec!["user"]);
    }
}
