//! # Warden
//!
//! Session lifecycle and timed-state engine for multiplayer game servers.
//!
//! Warden keeps transient per-player state (idle timers, command
//! cooldowns, pending warmups, reply targets) in typed session stores,
//! advances it from a low-frequency background tick, and evicts it once
//! a player has been gone long enough. On top of that it provides two
//! state machines:
//!
//! - **AFK detection** with a population-sensitive auto-kick
//!   ([`warden_afk`])
//! - **Command cooldowns and warmups** as admission gates in front of the
//!   server's command dispatcher ([`warden_cooldown`])
//!
//! The game server plugs in by implementing the collaborator traits in
//! [`warden_host`] and forwarding its events to a running [`Warden`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use warden::prelude::*;
//!
//! # async fn run() -> Result<(), WardenError> {
//! warden::telemetry::init().ok();
//!
//! let host = Arc::new(InMemoryHost::new(20));
//! let mut warden = Warden::builder().host(host).start()?;
//!
//! let steve = Identity::player("Steve");
//! warden.player_joined(&steve);
//! if warden.command_preprocess(&steve, "/home") {
//!     // run the command
//! }
//!
//! warden.shutdown().await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod runtime;
pub mod telemetry;

pub use config::{ConfigError, WardenConfig};
pub use error::WardenError;
pub use runtime::{Warden, WardenBuilder};

pub use warden_afk;
pub use warden_cooldown;
pub use warden_host;
pub use warden_session;
pub use warden_tick;

pub mod prelude {
    pub use crate::{ConfigError, Warden, WardenBuilder, WardenConfig, WardenError};
    pub use warden_afk::{ActivityEvent, AfkConfig, AfkError, AfkMachine, Position};
    pub use warden_cooldown::{CommandLimits, CooldownConfig, CooldownEngine, CooldownError};
    pub use warden_host::{
        ActorControl, CommandDispatcher, Host, Identity, InMemoryHost, Messenger, Permissions,
        Population, Protection,
    };
    pub use warden_session::{SessionConfig, SessionRegistry, UserSession};
    pub use warden_tick::{TickConfig, TickPolicy};
}
