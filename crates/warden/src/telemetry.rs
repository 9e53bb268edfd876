//! Tracing subscriber setup for binaries embedding Warden.
//!
//! Libraries only emit `tracing` events; installing a subscriber is the
//! binary's job. `init()` is the one-liner for hosts that have no
//! logging of their own.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt};

/// Installs a formatted subscriber filtered by `RUST_LOG`, defaulting to
/// `info`.
///
/// # Errors
/// Fails if a global subscriber is already installed.
pub fn init() -> Result<(), TryInitError> {
    init_with_default("info")
}

/// Like [`init`], with custom fallback directives
/// (e.g. `"warden_afk=debug,info"`) used when `RUST_LOG` is unset or
/// invalid.
pub fn init_with_default(directives: &str) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()
}
