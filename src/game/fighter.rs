//! Fighter state and per-fighter constants

use serde::{Deserialize, Serialize};

use crate::render::{Color, Rect};

use super::input::PlayerSlot;
use super::physics::GROUND_Y;

pub const FIGHTER_WIDTH: f32 = 40.0;
pub const FIGHTER_HEIGHT: f32 = 60.0;
pub const MAX_HEALTH: u32 = 100;
/// Fraction of normal height kept while crouching
pub const CROUCH_HEIGHT_FACTOR: f32 = 0.7;

/// Direction a fighter is looking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Left,
    Right,
}

/// Attack kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackKind {
    Punch,
    Kick,
}

impl AttackKind {
    pub fn damage(self) -> u32 {
        match self {
            AttackKind::Punch => 15,
            AttackKind::Kick => 25,
        }
    }
}

/// A player-controlled combatant
#[derive(Debug, Clone, PartialEq)]
pub struct Fighter {
    pub name: String,
    pub color: Color,

    // Position and movement
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub facing: Facing,
    pub velocity_y: f32,
    pub is_jumping: bool,
    pub is_crouching: bool,

    // Combat
    pub health: u32,
    pub max_health: u32,
    /// Active attack, cleared once its duration has elapsed
    pub attack: Option<AttackKind>,
    /// Start time (match ms) of the most recent accepted attack
    pub last_attack_at: Option<u64>,
}

impl Fighter {
    pub fn new(name: impl Into<String>, color: Color, x: f32, facing: Facing) -> Self {
        Self {
            name: name.into(),
            color,
            x,
            y: GROUND_Y,
            width: FIGHTER_WIDTH,
            height: FIGHTER_HEIGHT,
            facing,
            velocity_y: 0.0,
            is_jumping: false,
            is_crouching: false,
            health: MAX_HEALTH,
            max_health: MAX_HEALTH,
            attack: None,
            last_attack_at: None,
        }
    }

    /// Spawn state for a slot
    pub fn spawn(slot: PlayerSlot) -> Self {
        match slot {
            PlayerSlot::One => Self::new("Player 1", Color::rgb(0xff, 0x44, 0x44), 150.0, Facing::Right),
            PlayerSlot::Two => Self::new("Player 2", Color::rgb(0x44, 0x44, 0xff), 600.0, Facing::Left),
        }
    }

    pub fn is_attacking(&self) -> bool {
        self.attack.is_some()
    }

    pub fn is_knocked_out(&self) -> bool {
        self.health == 0
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Current hittable body; shrinks while crouching with the feet kept planted
    pub fn body(&self) -> Rect {
        let height = if self.is_crouching {
            self.height * CROUCH_HEIGHT_FACTOR
        } else {
            self.height
        };
        Rect::new(self.x, self.y + (self.height - height), self.width, height)
    }
}
