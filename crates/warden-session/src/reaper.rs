//! The reaper: evicts records of players who left and stayed gone.
//!
//! Runs as a [`Sweep`] on its own low-frequency [`TickDriver`]
//! (once a minute by default, see [`SessionConfig`](crate::SessionConfig)).
//!
//! [`TickDriver`]: warden_tick::TickDriver

use std::sync::Arc;

use tokio::time::Instant;
use tracing::info;
use warden_host::Population;
use warden_tick::{Sweep, TickInfo};

use crate::SessionRegistry;

/// Removes stale records from every store in a [`SessionRegistry`].
///
/// A record is removed when its owner is offline and it has not been
/// touched for its type's `MAX_AGE`. Console records are never removed.
pub struct Reaper<P: Population> {
    registry: Arc<SessionRegistry>,
    population: Arc<P>,
}

impl<P: Population> Reaper<P> {
    pub fn new(registry: Arc<SessionRegistry>, population: Arc<P>) -> Self {
        Self {
            registry,
            population,
        }
    }

    /// Runs one reap pass over every store. Returns the number of records
    /// removed.
    pub fn sweep_now(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;

        for store in self.registry.stores() {
            let reaped = store.reap(now, &*self.population);
            for identity in &reaped {
                info!(%identity, kind = store.kind(), "stale session reaped");
            }
            removed += reaped.len();
        }
        removed
    }
}

impl<P: Population> Sweep for Reaper<P> {
    fn name(&self) -> &'static str {
        "reaper"
    }

    fn sweep(&self, _tick: &TickInfo) {
        self.sweep_now();
    }
}
