//! AFK detection for Warden.
//!
//! Players that stop doing anything for a while are marked AFK: their
//! list name is greyed out, they are told about it, and (depending on
//! config) they stop blocking night skips and become invulnerable. If
//! they stay idle long enough they are kicked, sooner when the server is
//! full.
//!
//! - [`AfkMachine`] — the state machine and its per-tick sweep
//! - [`AfkSession`] / [`AfkState`] — the per-player record
//! - [`ActivityEvent`] — the things that count as "doing something"
//! - [`AfkConfig`] — thresholds and policy toggles
//!
//! # How it fits in the stack
//!
//! ```text
//! Game server events ──→ ActivityEvent ──→ AfkMachine::update()
//!                                              │
//! TickDriver (1 s) ──→ AfkMachine::sweep_now() ┤
//!                                              ▼
//!                               SessionStore<AfkSession>
//!                                              │
//!                      Host: display name, sleep-ignore, protection, kick
//! ```

mod activity;
mod config;
mod error;
mod machine;
mod session;

pub use activity::{ActivityEvent, Position};
pub use config::AfkConfig;
pub use error::AfkError;
pub use machine::{AfkMachine, kick_threshold_minutes};
pub use session::{AfkSession, AfkState};
