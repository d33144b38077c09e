//! Match state, the per-tick simulation step and the match driver

use tracing::{debug, info};
use uuid::Uuid;

use crate::lobby::RoomCode;

use super::combat::{AttackOutcome, CombatSystem};
use super::fighter::Fighter;
use super::input::{ControlScheme, InputState, Key, PlayerSlot};
use super::physics::{PhysicsSystem, ARENA_WIDTH};

/// Snapshot of one match, replaced wholesale every tick
#[derive(Debug, Clone, PartialEq)]
pub struct MatchState {
    pub player1: Fighter,
    pub player2: Fighter,
    pub game_started: bool,
    pub winner: Option<PlayerSlot>,
    pub room_code: RoomCode,
}

impl MatchState {
    /// Lobby state: fighters placed, nothing running yet
    pub fn new(room_code: RoomCode) -> Self {
        Self {
            player1: Fighter::spawn(PlayerSlot::One),
            player2: Fighter::spawn(PlayerSlot::Two),
            game_started: false,
            winner: None,
            room_code,
        }
    }

    /// Fresh running match
    pub fn start(room_code: RoomCode) -> Self {
        Self {
            game_started: true,
            ..Self::new(room_code)
        }
    }

    pub fn fighter(&self, slot: PlayerSlot) -> &Fighter {
        match slot {
            PlayerSlot::One => &self.player1,
            PlayerSlot::Two => &self.player2,
        }
    }

    pub fn fighter_mut(&mut self, slot: PlayerSlot) -> &mut Fighter {
        match slot {
            PlayerSlot::One => &mut self.player1,
            PlayerSlot::Two => &mut self.player2,
        }
    }

    /// Attacker and defender borrowed mutably at the same time
    fn pair_mut(&mut self, attacker: PlayerSlot) -> (&mut Fighter, &mut Fighter) {
        match attacker {
            PlayerSlot::One => (&mut self.player1, &mut self.player2),
            PlayerSlot::Two => (&mut self.player2, &mut self.player1),
        }
    }

    pub fn winner_name(&self) -> Option<&str> {
        self.winner.map(|slot| self.fighter(slot).name.as_str())
    }

    pub fn is_running(&self) -> bool {
        self.game_started && self.winner.is_none()
    }

    /// Advance the simulation by one tick.
    ///
    /// Returns the previous state unchanged when the match is not running.
    pub fn step(&self, input: &InputState, now_ms: u64) -> MatchState {
        let mut next = self.clone();
        if !self.is_running() {
            return next;
        }

        for slot in PlayerSlot::ALL {
            let intent = input.intent(&ControlScheme::for_slot(slot));
            PhysicsSystem::apply_intent(next.fighter_mut(slot), intent);
        }

        for slot in PlayerSlot::ALL {
            let fighter = next.fighter_mut(slot);
            PhysicsSystem::integrate(fighter);
            CombatSystem::expire_attack(fighter, now_ms);
        }

        next.winner = next.check_winner();
        next
    }

    /// Player two's knockout is checked before player one's so that a
    /// double knockout goes to player two.
    fn check_winner(&self) -> Option<PlayerSlot> {
        let mut winner = None;
        if self.player2.is_knocked_out() {
            winner = Some(PlayerSlot::One);
        }
        if self.player1.is_knocked_out() {
            winner = Some(PlayerSlot::Two);
        }
        winner
    }

    /// Resolve an attack trigger for `attacker` against the latest state
    pub fn resolve_attack(&self, attacker: PlayerSlot, now_ms: u64) -> (MatchState, AttackOutcome) {
        let mut next = self.clone();
        if !self.is_running() {
            return (next, AttackOutcome::Ignored);
        }

        let (striker, defender) = next.pair_mut(attacker);
        let outcome = CombatSystem::resolve(striker, defender, now_ms);
        (next, outcome)
    }
}

/// Per-fighter statistics for the match summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FighterStats {
    pub attacks: u32,
    pub hits: u32,
    pub damage_dealt: u32,
}

/// Something the driver reports back to the platform layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEvent {
    Attacked {
        attacker: PlayerSlot,
        outcome: AttackOutcome,
    },
    KnockedOut {
        winner: PlayerSlot,
    },
    Restarted,
}

/// Owns the live match: current snapshot plus the held-key buffer.
///
/// Input handlers and the tick both go through `&mut self`, so every state
/// change is funnelled through one owner.
pub struct GameMatch {
    id: Uuid,
    state: MatchState,
    input: InputState,
    tick: u64,
    stats: [FighterStats; 2],
}

impl GameMatch {
    pub fn start(room_code: RoomCode) -> Self {
        let id = Uuid::new_v4();
        info!(match_id = %id, room_code = %room_code, "Match started");
        Self {
            id,
            state: MatchState::start(room_code),
            input: InputState::new(),
            tick: 0,
            stats: [FighterStats::default(); 2],
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn stats(&self, slot: PlayerSlot) -> FighterStats {
        self.stats[slot_index(slot)]
    }

    /// Handle a key press
    pub fn key_down(&mut self, key: Key, now_ms: u64) -> Option<MatchEvent> {
        let newly_pressed = self.input.press(key);

        if key == Key::R {
            return self.restart().then_some(MatchEvent::Restarted);
        }

        // OS key-repeat must not fire extra attacks
        if !newly_pressed {
            return None;
        }

        let attacker = ControlScheme::attacker_for(key)?;
        Some(self.attack(attacker, now_ms))
    }

    pub fn key_up(&mut self, key: Key) {
        self.input.release(key);
    }

    /// Drop every held key (window lost focus)
    pub fn release_all(&mut self) {
        self.input.clear();
    }

    /// Pointer click at logical x; left half attacks for player one
    pub fn click(&mut self, x: f32, now_ms: u64) -> MatchEvent {
        self.attack(PlayerSlot::for_click(x, ARENA_WIDTH), now_ms)
    }

    /// Resolve an attack immediately against the latest committed state
    pub fn attack(&mut self, attacker: PlayerSlot, now_ms: u64) -> MatchEvent {
        let (next, outcome) = self.state.resolve_attack(attacker, now_ms);
        self.state = next;

        let stats = &mut self.stats[slot_index(attacker)];
        match outcome {
            AttackOutcome::Ignored => {}
            AttackOutcome::Missed { kind } | AttackOutcome::Dodged { kind } => {
                stats.attacks += 1;
                debug!(match_id = %self.id, ?attacker, ?kind, ?outcome, "Attack did not connect");
            }
            AttackOutcome::Hit {
                kind,
                damage,
                defender_health,
            } => {
                stats.attacks += 1;
                stats.hits += 1;
                stats.damage_dealt += damage;
                debug!(
                    match_id = %self.id,
                    ?attacker,
                    ?kind,
                    damage,
                    defender_health,
                    "Attack landed"
                );
            }
        }

        MatchEvent::Attacked { attacker, outcome }
    }

    /// Run one simulation tick
    pub fn tick(&mut self, now_ms: u64) -> Option<MatchEvent> {
        let was_running = self.state.is_running();
        self.state = self.state.step(&self.input, now_ms);
        if was_running {
            self.tick += 1;
        }

        let winner = self.state.winner.filter(|_| was_running)?;
        info!(
            match_id = %self.id,
            winner = self.state.fighter(winner).name.as_str(),
            ticks = self.tick,
            "Match decided"
        );
        Some(MatchEvent::KnockedOut { winner })
    }

    /// Start a fresh match with the same room code; only allowed once decided
    pub fn restart(&mut self) -> bool {
        if self.state.winner.is_none() {
            return false;
        }

        let room_code = self.state.room_code.clone();
        let input = std::mem::take(&mut self.input);
        *self = Self::start(room_code);
        self.input = input;
        true
    }
}

fn slot_index(slot: PlayerSlot) -> usize {
    match slot {
        PlayerSlot::One => 0,
        PlayerSlot::Two => 1,
    }
}
