//! Low-frequency tick scheduling for Warden.
//!
//! Every timed transition in Warden (AFK detection, cooldown counters,
//! warmup replays, session reaping) is advanced by a recurring tick rather
//! than by per-player timers. This crate provides:
//!
//! - [`TickScheduler`] — a fixed-interval clock with overrun handling,
//!   budget monitoring and pause/resume
//! - [`TickDriver`] — a background Tokio task that owns a scheduler and
//!   runs a list of [`Sweep`] jobs on every tick
//!
//! # Integration
//!
//! ```ignore
//! let mut driver = TickDriver::new("sweeps", TickConfig::default())
//!     .with_sweep(afk_machine.clone())
//!     .with_sweep(cooldown_engine.clone());
//! driver.start()?;
//! // ...
//! driver.shutdown().await?;
//! ```

mod driver;
mod error;
mod scheduler;

pub use driver::{Sweep, TickDriver};
pub use error::TickError;
pub use scheduler::{TickConfig, TickInfo, TickMetrics, TickPolicy, TickScheduler};
