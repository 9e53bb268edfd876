//! Host-platform boundary for Warden.
//!
//! Warden does not own players, chat, or the command dispatcher. The game
//! server does. This crate defines what Warden needs from that server:
//!
//! - **Identity** ([`Identity`]) — the key every session is stored under:
//!   a player name or the console sentinel.
//! - **Collaborators** ([`Population`], [`Permissions`], [`Messenger`],
//!   [`CommandDispatcher`], [`Protection`], [`ActorControl`]) — one small
//!   trait per capability, bundled by the [`Host`] super-trait.
//! - **In-memory host** ([`InMemoryHost`], `memory` feature) — a
//!   thread-safe fake that records every side effect. Tests and the demo
//!   run against it.
//!
//! # Architecture
//!
//! ```text
//! Game server (above)  ← implements the collaborator traits
//!     ↕
//! Warden engines       ← AFK machine, cooldown/warmup gates, reaper
//!     ↕
//! Host layer (this crate)  ← Identity + traits, no logic
//! ```

mod host;
mod identity;
#[cfg(feature = "memory")]
mod memory;

pub use host::{
    ActorControl, CommandDispatcher, Host, Messenger, Permissions,
    Population, Protection,
};
pub use identity::{CONSOLE_NAME, Identity};
#[cfg(feature = "memory")]
pub use memory::InMemoryHost;
