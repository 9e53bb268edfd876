//! Error types for the AFK layer.

use warden_host::Identity;

/// Errors from explicit AFK requests.
#[derive(Debug, thiserror::Error)]
pub enum AfkError {
    /// Only players can mark themselves as away.
    #[error("{0} is not a player")]
    NotAPlayer(Identity),
}
