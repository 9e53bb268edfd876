//! In-memory host: a thread-safe fake of the game server.
//!
//! Records every side effect Warden produces (messages, dispatched
//! commands, kicks, display names, flags) so tests can assert on them,
//! and lets callers script connectivity, capacity and permissions.

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;

use crate::{
    ActorControl, CommandDispatcher, Identity, Messenger, Permissions,
    Population, Protection,
};

#[derive(Debug, Default)]
struct HostState {
    max_players: usize,
    online: HashSet<Identity>,
    permissions: HashMap<Identity, HashSet<String>>,
    messages: Vec<(Identity, String)>,
    dispatched: Vec<(Identity, String)>,
    kicks: Vec<(Identity, String)>,
    display_names: HashMap<Identity, String>,
    protected: HashSet<Identity>,
    sleep_ignored: HashSet<Identity>,
}

/// A scripted, recording implementation of every collaborator trait.
///
/// Kicking an actor also takes them offline, like a real server would.
#[derive(Debug, Default)]
pub struct InMemoryHost {
    state: Mutex<HostState>,
}

impl InMemoryHost {
    /// Creates an empty host with the given number of player slots.
    pub fn new(max_players: usize) -> Self {
        Self {
            state: Mutex::new(HostState {
                max_players,
                ..HostState::default()
            }),
        }
    }

    pub fn set_max_players(&self, max_players: usize) {
        self.state.lock().max_players = max_players;
    }

    /// Marks a player as online.
    pub fn connect(&self, identity: &Identity) {
        self.state.lock().online.insert(identity.clone());
    }

    /// Marks a player as offline. Display name, protection and
    /// sleep-ignore are player data and stay set across a relog.
    pub fn disconnect(&self, identity: &Identity) {
        self.state.lock().online.remove(identity);
    }

    /// Grants a permission node.
    pub fn grant(&self, identity: &Identity, node: impl Into<String>) {
        self.state
            .lock()
            .permissions
            .entry(identity.clone())
            .or_default()
            .insert(node.into());
    }

    /// Messages delivered to `identity`, oldest first.
    pub fn messages_for(&self, identity: &Identity) -> Vec<String> {
        self.state
            .lock()
            .messages
            .iter()
            .filter(|(to, _)| to == identity)
            .map(|(_, text)| text.clone())
            .collect()
    }

    /// Drains and returns every delivered message.
    pub fn take_messages(&self) -> Vec<(Identity, String)> {
        std::mem::take(&mut self.state.lock().messages)
    }

    /// Every command dispatched through [`CommandDispatcher`], in order.
    pub fn dispatched(&self) -> Vec<(Identity, String)> {
        self.state.lock().dispatched.clone()
    }

    /// Every kick issued, in order, with its reason.
    pub fn kicks(&self) -> Vec<(Identity, String)> {
        self.state.lock().kicks.clone()
    }

    /// The custom display name, if one is set.
    pub fn display_name(&self, identity: &Identity) -> Option<String> {
        self.state.lock().display_names.get(identity).cloned()
    }
}

impl Population for InMemoryHost {
    fn online_count(&self) -> usize {
        self.state.lock().online.len()
    }

    fn max_players(&self) -> usize {
        self.state.lock().max_players
    }

    fn is_online(&self, identity: &Identity) -> bool {
        identity.is_console() || self.state.lock().online.contains(identity)
    }
}

impl Permissions for InMemoryHost {
    fn has_permission(&self, identity: &Identity, node: &str) -> bool {
        self.state
            .lock()
            .permissions
            .get(identity)
            .is_some_and(|nodes| nodes.contains(node))
    }
}

impl Messenger for InMemoryHost {
    fn send_message(&self, identity: &Identity, text: &str) {
        self.state
            .lock()
            .messages
            .push((identity.clone(), text.to_owned()));
    }
}

impl CommandDispatcher for InMemoryHost {
    fn dispatch(&self, identity: &Identity, command_line: &str) -> bool {
        self.state
            .lock()
            .dispatched
            .push((identity.clone(), command_line.to_owned()));
        true
    }
}

impl Protection for InMemoryHost {
    fn has_protection(&self, identity: &Identity) -> bool {
        self.state.lock().protected.contains(identity)
    }

    fn enable_protection(&self, identity: &Identity) {
        self.state.lock().protected.insert(identity.clone());
    }

    fn disable_protection(&self, identity: &Identity) {
        self.state.lock().protected.remove(identity);
    }
}

impl ActorControl for InMemoryHost {
    fn set_display_name(&self, identity: &Identity, name: Option<&str>) {
        let mut state = self.state.lock();
        match name {
            Some(name) => {
                state.display_names.insert(identity.clone(), name.to_owned());
            }
            None => {
                state.display_names.remove(identity);
            }
        }
    }

    fn is_sleep_ignored(&self, identity: &Identity) -> bool {
        self.state.lock().sleep_ignored.contains(identity)
    }

    fn set_sleep_ignored(&self, identity: &Identity, ignored: bool) {
        let mut state = self.state.lock();
        if ignored {
            state.sleep_ignored.insert(identity.clone());
        } else {
            state.sleep_ignored.remove(identity);
        }
    }

    fn kick(&self, identity: &Identity, reason: &str) {
        let mut state = self.state.lock();
        state.kicks.push((identity.clone(), reason.to_owned()));
        state.online.remove(identity);
    }
}
