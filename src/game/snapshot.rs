//! Serializable views of a match for logs and headless output

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::lobby::RoomCode;

use super::fighter::{AttackKind, Facing, Fighter};
use super::input::PlayerSlot;
use super::r#match::{GameMatch, MatchState};

/// Public view of one fighter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FighterSnapshot {
    pub name: String,
    pub color: String,
    pub x: f32,
    pub y: f32,
    pub facing: Facing,
    pub health: u32,
    pub is_jumping: bool,
    pub is_crouching: bool,
    pub attack: Option<AttackKind>,
}

impl From<&Fighter> for FighterSnapshot {
    fn from(fighter: &Fighter) -> Self {
        Self {
            name: fighter.name.clone(),
            color: fighter.color.to_hex(),
            x: fighter.x,
            y: fighter.y,
            facing: fighter.facing,
            health: fighter.health,
            is_jumping: fighter.is_jumping,
            is_crouching: fighter.is_crouching,
            attack: fighter.attack,
        }
    }
}

/// Public view of a match state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSnapshot {
    pub room_code: RoomCode,
    pub game_started: bool,
    pub winner: Option<String>,
    pub fighters: [FighterSnapshot; 2],
}

impl From<&MatchState> for MatchSnapshot {
    fn from(state: &MatchState) -> Self {
        Self {
            room_code: state.room_code.clone(),
            game_started: state.game_started,
            winner: state.winner_name().map(str::to_owned),
            fighters: [
                FighterSnapshot::from(&state.player1),
                FighterSnapshot::from(&state.player2),
            ],
        }
    }
}

/// Per-fighter match statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FighterSummary {
    pub name: String,
    pub health: u32,
    pub attacks: u32,
    pub hits: u32,
    pub damage_dealt: u32,
}

/// End-of-match report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    pub match_id: Uuid,
    pub room_code: RoomCode,
    pub winner: Option<String>,
    pub ticks: u64,
    pub fighters: Vec<FighterSummary>,
    pub finished_at: DateTime<Utc>,
}

impl MatchSummary {
    pub fn build(game: &GameMatch) -> Self {
        let state = game.state();
        let fighters = PlayerSlot::ALL
            .into_iter()
            .map(|slot| {
                let fighter = state.fighter(slot);
                let stats = game.stats(slot);
                FighterSummary {
                    name: fighter.name.clone(),
                    health: fighter.health,
                    attacks: stats.attacks,
                    hits: stats.hits,
                    damage_dealt: stats.damage_dealt,
                }
            })
            .collect();

        Self {
            match_id: game.id(),
            room_code: state.room_code.clone(),
            winner: state.winner_name().map(str::to_owned),
            ticks: game.tick_count(),
            fighters,
            finished_at: Utc::now(),
        }
    }
}
