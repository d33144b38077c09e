//! Fighter movement, jumping and gravity

use super::fighter::{Facing, Fighter};
use super::input::MoveIntent;

/// Logical canvas size
pub const ARENA_WIDTH: f32 = 800.0;
pub const ARENA_HEIGHT: f32 = 400.0;
/// Top edge of a standing fighter
pub const GROUND_Y: f32 = 320.0;

/// Horizontal speed per tick
pub const MOVE_SPEED: f32 = 4.0;
/// Initial vertical velocity of a jump (negative is up)
pub const JUMP_FORCE: f32 = -15.0;
/// Vertical acceleration per tick
pub const GRAVITY: f32 = 0.8;

/// Physics system for moving fighters
pub struct PhysicsSystem;

impl PhysicsSystem {
    /// Apply held movement keys for one tick.
    ///
    /// Left runs before right, so holding both ends facing right.
    pub fn apply_intent(fighter: &mut Fighter, intent: MoveIntent) {
        if intent.left {
            fighter.x = (fighter.x - MOVE_SPEED).max(0.0);
            fighter.facing = Facing::Left;
        }
        if intent.right {
            fighter.x = (fighter.x + MOVE_SPEED).min(ARENA_WIDTH - fighter.width);
            fighter.facing = Facing::Right;
        }
        if intent.jump && !fighter.is_jumping {
            fighter.velocity_y = JUMP_FORCE;
            fighter.is_jumping = true;
        }
        fighter.is_crouching = intent.crouch;
    }

    /// Advance an airborne fighter by one tick (semi-implicit Euler) and land it
    pub fn integrate(fighter: &mut Fighter) {
        if !fighter.is_jumping {
            return;
        }

        fighter.y += fighter.velocity_y;
        fighter.velocity_y += GRAVITY;

        if fighter.y >= GROUND_Y {
            fighter.y = GROUND_Y;
            fighter.is_jumping = false;
            fighter.velocity_y = 0.0;
        }
    }
}
