//! Collaborator traits implemented by the game server.
//!
//! Warden never talks to the platform directly. Each capability it needs
//! is a small trait, so a host can be assembled from whatever the server
//! already has, and tests can substitute the in-memory fake.
//!
//! # Trait bounds
//!
//! Every trait is `Send + Sync + 'static`: the engines hold the host in an
//! `Arc` and call it both from command dispatch and from the background
//! tick task.
//!
//! # Re-entrancy
//!
//! Engines never hold a session lock while calling a collaborator that
//! may call back into Warden ([`CommandDispatcher::dispatch`],
//! [`ActorControl::kick`]). The other collaborators are expected to be
//! cheap, non-blocking setters.

use crate::Identity;

/// Population and connectivity of the server.
pub trait Population: Send + Sync + 'static {
    /// Number of players currently online.
    fn online_count(&self) -> usize;

    /// Maximum number of player slots.
    fn max_players(&self) -> usize;

    /// Whether the identity is currently connected. The console is
    /// always online.
    fn is_online(&self, identity: &Identity) -> bool;
}

/// Permission oracle.
pub trait Permissions: Send + Sync + 'static {
    /// Returns `true` if `identity` holds `node`
    /// (e.g. `warden.cooldown.override.home`).
    fn has_permission(&self, identity: &Identity, node: &str) -> bool;
}

/// Delivers a line of text to an actor.
pub trait Messenger: Send + Sync + 'static {
    fn send_message(&self, identity: &Identity, text: &str);
}

/// Programmatic command execution.
pub trait CommandDispatcher: Send + Sync + 'static {
    /// Runs `command_line` (without the leading `/`) as `identity`.
    ///
    /// Used by warmup completion. The host must execute the command
    /// directly, without routing it back through Warden's admission
    /// gates, otherwise the replayed command would start a new warmup.
    ///
    /// Returns `true` if the host found and ran the command.
    fn dispatch(&self, identity: &Identity, command_line: &str) -> bool;
}

/// Protective ("god") mode owned by another component.
pub trait Protection: Send + Sync + 'static {
    fn has_protection(&self, identity: &Identity) -> bool;
    fn enable_protection(&self, identity: &Identity);
    fn disable_protection(&self, identity: &Identity);
}

/// Direct control over a connected actor.
pub trait ActorControl: Send + Sync + 'static {
    /// Sets the name shown in the player list. `None` restores the
    /// platform default (the actor's own name).
    fn set_display_name(&self, identity: &Identity, name: Option<&str>);

    /// Whether the actor is excluded from the "everyone is asleep" check.
    fn is_sleep_ignored(&self, identity: &Identity) -> bool;

    fn set_sleep_ignored(&self, identity: &Identity, ignored: bool);

    /// Removes the actor from the server with a reason.
    fn kick(&self, identity: &Identity, reason: &str);
}

/// Everything Warden needs from the game server.
///
/// Blanket-implemented: any type implementing all collaborator traits is
/// a `Host`, so servers never implement this directly.
pub trait Host:
    Population + Permissions + Messenger + CommandDispatcher + Protection + ActorControl
{
}

impl<T> Host for T where
    T: Population
        + Permissions
        + Messenger
        + CommandDispatcher
        + Protection
        + ActorControl
{
}
