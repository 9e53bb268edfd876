//! Activity events: what counts as a player doing something.

use serde::{Deserialize, Serialize};

use crate::AfkConfig;

/// A point in the world. Only `x` and `z` matter for movement.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Squared distance on the horizontal plane.
    pub fn distance_squared_2d(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        dx * dx + dz * dz
    }
}

/// Something a player did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActivityEvent {
    Join,
    Chat,
    Command,
    Interact,
    Fish,
    InventoryOpen,
    InventoryClick,
    InventoryClose,
    DamageDealt,
    Movement {
        from: Position,
        to: Position,
        sneaking: bool,
    },
}

impl ActivityEvent {
    /// Whether the event resets the idle timer under `config`.
    ///
    /// Everything counts except small movements: a move must cover more
    /// than `movement_threshold` (squared, horizontal), or more than
    /// `sneak_movement_threshold` while sneaking, and movement is ignored
    /// entirely when `use_movement_event` is off.
    pub fn counts(&self, config: &AfkConfig) -> bool {
        match self {
            Self::Movement { from, to, sneaking } => {
                if !config.use_movement_event {
                    return false;
                }
                let distance = from.distance_squared_2d(to);
                distance > config.movement_threshold
                    || (*sneaking && distance > config.sneak_movement_threshold)
            }
            _ => true,
        }
    }
}
