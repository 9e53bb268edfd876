//! Per-identity session storage for Warden.
//!
//! This crate owns every piece of transient, per-player state:
//!
//! 1. **Records** — the [`SessionRecord`] trait and its shared
//!    [`Lifecycle`] (connected/disconnected, last update, max age)
//! 2. **Stores** — [`SessionStore`], one lazily-populated map per record
//!    type, and the [`SessionRegistry`] that owns all of them
//! 3. **Reaping** — the [`Reaper`] sweep that evicts records of players
//!    who left and did not come back in time
//!
//! # How it fits in the stack
//!
//! ```text
//! AFK machine / cooldown engine (above)  ← define their own record types
//!     ↕
//! Session layer (this crate)  ← get-or-create, snapshots, reaping
//!     ↕
//! Host layer (below)  ← Identity, Population
//! ```

mod reaper;
mod record;
mod registry;
mod store;
mod user;

pub use reaper::Reaper;
pub use record::{Lifecycle, SessionConfig, SessionRecord, SessionState};
pub use registry::{SessionRegistry, StoreLifecycle};
pub use store::{SessionHandle, SessionStore};
pub use user::UserSession;
