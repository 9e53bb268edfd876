//! Command cooldowns and warmups for Warden.
//!
//! Two admission gates sit in front of the host's command dispatcher:
//!
//! - **Cooldown**: a command may only be used again once enough ticks
//!   have passed since it was last refused.
//! - **Warmup**: the command is held back, then replayed as the original
//!   player once its warmup has elapsed.
//!
//! Both are counted in ticks (one per second with the default driver) by
//! [`CooldownEngine::sweep_now`], and both are configured per command in
//! [`CooldownConfig`].
//!
//! # How it fits in the stack
//!
//! ```text
//! command line ──→ CooldownEngine::admit() ──→ allowed? ──→ host runs it
//!                          │
//!                          ▼
//!               SessionStore<CooldownState>
//!                          ▲
//! TickDriver (1 s) ──→ sweep_now() ──→ warmup done ──→ CommandDispatcher
//! ```

mod config;
mod engine;
mod error;
mod format;
mod state;

pub use config::{CommandLimits, CooldownConfig};
pub use engine::CooldownEngine;
pub use error::{CooldownError, LimitKind};
pub use format::{command_line, command_name, format_remaining};
pub use state::CooldownState;
