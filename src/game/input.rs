//! Keyboard bindings and the held-key buffer

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    A,
    D,
    W,
    S,
    Space,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Enter,
    R,
}

/// Which side of the screen a fighter belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub const ALL: [PlayerSlot; 2] = [PlayerSlot::One, PlayerSlot::Two];

    /// Pointer clicks on the left half attack for player one
    pub fn for_click(x: f32, canvas_width: f32) -> Self {
        if x < canvas_width / 2.0 {
            PlayerSlot::One
        } else {
            PlayerSlot::Two
        }
    }
}

/// Key bindings for one player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlScheme {
    pub left: Key,
    pub right: Key,
    pub jump: Key,
    pub crouch: Key,
    pub attack: Key,
}

impl ControlScheme {
    /// WASD + Space
    pub const PLAYER_ONE: ControlScheme = ControlScheme {
        left: Key::A,
        right: Key::D,
        jump: Key::W,
        crouch: Key::S,
        attack: Key::Space,
    };

    /// Arrows + Enter
    pub const PLAYER_TWO: ControlScheme = ControlScheme {
        left: Key::ArrowLeft,
        right: Key::ArrowRight,
        jump: Key::ArrowUp,
        crouch: Key::ArrowDown,
        attack: Key::Enter,
    };

    pub fn for_slot(slot: PlayerSlot) -> Self {
        match slot {
            PlayerSlot::One => Self::PLAYER_ONE,
            PlayerSlot::Two => Self::PLAYER_TWO,
        }
    }

    /// The player whose attack key this is, if any
    pub fn attacker_for(key: Key) -> Option<PlayerSlot> {
        PlayerSlot::ALL
            .into_iter()
            .find(|slot| Self::for_slot(*slot).attack == key)
    }
}

/// Movement intent for one fighter during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub crouch: bool,
}

/// Keys currently held down
///
/// Written by input handlers, read by the simulation at tick boundaries.
/// Owned by a single driver, so no locking is involved.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press; returns false when the key was already held (OS repeat)
    pub fn press(&mut self, key: Key) -> bool {
        self.held.insert(key)
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn intent(&self, scheme: &ControlScheme) -> MoveIntent {
        MoveIntent {
            left: self.is_held(scheme.left),
            right: self.is_held(scheme.right),
            jump: self.is_held(scheme.jump),
            crouch: self.is_held(scheme.crouch),
        }
    }
}
