//! Combat system - attack classification, hit detection, damage

use serde::Serialize;

use super::fighter::{AttackKind, Facing, Fighter};

/// How long an attack stays active (ms)
pub const ATTACK_DURATION_MS: u64 = 300;
/// A new attack started within this window after the previous one is a kick (ms)
pub const KICK_COMBO_MS: u64 = 500;
/// Distance of the strike point in front of the attacker
pub const ATTACK_RANGE: f32 = 50.0;
/// Maximum horizontal distance from strike point to defender centre
pub const HIT_TOLERANCE_X: f32 = 60.0;
/// Maximum vertical offset between attacker and defender
pub const HIT_TOLERANCE_Y: f32 = 80.0;

/// Result of an attack trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttackOutcome {
    /// Attacker was still mid-attack
    Ignored,
    /// Out of range
    Missed { kind: AttackKind },
    /// Defender was crouching
    Dodged { kind: AttackKind },
    Hit {
        kind: AttackKind,
        damage: u32,
        defender_health: u32,
    },
}

/// Combat system for resolving attacks
pub struct CombatSystem;

impl CombatSystem {
    /// Punch, or kick when following the previous attack within the combo window
    pub fn classify(attacker: &Fighter, now_ms: u64) -> AttackKind {
        match attacker.last_attack_at {
            Some(last) if now_ms.saturating_sub(last) < KICK_COMBO_MS => AttackKind::Kick,
            _ => AttackKind::Punch,
        }
    }

    /// Horizontal position of the strike point
    pub fn reach_x(attacker: &Fighter) -> f32 {
        match attacker.facing {
            Facing::Right => attacker.x + attacker.width + ATTACK_RANGE,
            Facing::Left => attacker.x - ATTACK_RANGE,
        }
    }

    /// Whether an attack from `attacker` connects with `defender`.
    ///
    /// A crouching defender is never hit.
    pub fn check_collision(attacker: &Fighter, defender: &Fighter) -> bool {
        (Self::reach_x(attacker) - defender.center_x()).abs() < HIT_TOLERANCE_X
            && (attacker.y - defender.y).abs() < HIT_TOLERANCE_Y
            && !defender.is_crouching
    }

    /// Apply damage to health, returns (new_health, is_dead)
    pub fn apply_damage(current_health: u32, damage: u32) -> (u32, bool) {
        let new_health = current_health.saturating_sub(damage);
        (new_health, new_health == 0)
    }

    /// Start an attack on `attacker` and resolve it against `defender`.
    ///
    /// Attacker flags are committed before the hit test runs.
    pub fn resolve(attacker: &mut Fighter, defender: &mut Fighter, now_ms: u64) -> AttackOutcome {
        if attacker.is_attacking() {
            return AttackOutcome::Ignored;
        }

        let kind = Self::classify(attacker, now_ms);
        attacker.attack = Some(kind);
        attacker.last_attack_at = Some(now_ms);

        if defender.is_crouching {
            return AttackOutcome::Dodged { kind };
        }
        if !Self::check_collision(attacker, defender) {
            return AttackOutcome::Missed { kind };
        }

        let damage = kind.damage();
        let (new_health, _) = Self::apply_damage(defender.health, damage);
        defender.health = new_health;

        AttackOutcome::Hit {
            kind,
            damage,
            defender_health: new_health,
        }
    }

    /// Clear an attack whose duration has elapsed
    pub fn expire_attack(fighter: &mut Fighter, now_ms: u64) {
        let Some(started) = fighter.last_attack_at else {
            return;
        };
        if fighter.is_attacking() && now_ms.saturating_sub(started) > ATTACK_DURATION_MS {
            fighter.attack = None;
        }
    }
}
