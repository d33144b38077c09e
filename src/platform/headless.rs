//! Headless driver: replays a scripted input timeline on a fixed-rate timer

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::Config;
use crate::game::{GameMatch, Key, MatchEvent, MatchSnapshot, MatchSummary};
use crate::lobby::RoomCode;
use crate::render::{DisplayList, Renderer};
use crate::util::time::{tick_duration, tick_to_millis};

/// One scripted input
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptAction {
    KeyDown { key: Key },
    KeyUp { key: Key },
    Click { x: f32 },
    Restart,
}

/// An input applied right before the given tick runs
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptEvent {
    pub tick: u64,
    pub action: ScriptAction,
}

/// Timeline of inputs for a headless match
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InputScript {
    #[serde(default)]
    pub room_code: Option<RoomCode>,
    pub events: Vec<ScriptEvent>,
}

impl InputScript {
    pub fn parse(raw: &str) -> Result<Self, ScriptError> {
        let script: InputScript = serde_json::from_str(raw)?;
        script.validate()?;
        Ok(script)
    }

    pub async fn load(path: &Path) -> Result<Self, ScriptError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ScriptError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(&raw)
    }

    fn validate(&self) -> Result<(), ScriptError> {
        match self
            .events
            .windows(2)
            .position(|pair| pair[1].tick < pair[0].tick)
        {
            Some(index) => Err(ScriptError::OutOfOrder { index: index + 1 }),
            None => Ok(()),
        }
    }

    /// Player one walks in and strings attacks together while player two
    /// ducks one of them
    pub fn demo() -> Self {
        let mut events = vec![
            ScriptEvent {
                tick: 0,
                action: ScriptAction::KeyDown { key: Key::D },
            },
            ScriptEvent {
                tick: 104,
                action: ScriptAction::KeyUp { key: Key::D },
            },
        ];

        for n in 0..8u64 {
            let at = 110 + n * 24;
            if at == 158 {
                events.push(ScriptEvent {
                    tick: 150,
                    action: ScriptAction::KeyDown {
                        key: Key::ArrowDown,
                    },
                });
            }
            events.push(ScriptEvent {
                tick: at,
                action: ScriptAction::KeyDown { key: Key::Space },
            });
            events.push(ScriptEvent {
                tick: at + 1,
                action: ScriptAction::KeyUp { key: Key::Space },
            });
            if at == 158 {
                events.push(ScriptEvent {
                    tick: 165,
                    action: ScriptAction::KeyUp {
                        key: Key::ArrowDown,
                    },
                });
            }
        }

        Self {
            room_code: None,
            events,
        }
    }
}

/// Script loading errors
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("Failed to read script {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Script event {index} is scheduled before the event preceding it")]
    OutOfOrder { index: usize },
}

/// Load the configured script (or the demo) and play it
pub async fn run_from_config(config: &Config) -> anyhow::Result<MatchSummary> {
    let script = match &config.script_path {
        Some(path) => InputScript::load(path).await?,
        None => InputScript::demo(),
    };

    let room_code = match script.room_code.clone() {
        Some(code) => code,
        None => config.lobby.clone().into_room_code(&mut rand::thread_rng()),
    };

    Ok(run(GameMatch::start(room_code), script, config.max_ticks).await)
}

/// Drive `game` with `script` at the simulation rate until a winner is
/// decided and the script is used up, or `max_ticks` have run.
///
/// Match time is derived from the tick number so replays are deterministic.
pub async fn run(mut game: GameMatch, script: InputScript, max_ticks: u64) -> MatchSummary {
    let mut tick_interval = interval(tick_duration());
    tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut pending = script.events.into_iter().peekable();
    let mut frame = DisplayList::new();

    for tick in 0..max_ticks {
        tick_interval.tick().await;
        let now_ms = tick_to_millis(tick);

        while let Some(scripted) = pending.next_if(|scripted| scripted.tick <= tick) {
            if let Some(event) = apply(&mut game, scripted.action, now_ms) {
                debug!(match_id = %game.id(), tick, ?event, "Scripted input");
            }
        }

        let knocked_out = game.tick(now_ms);

        frame.clear();
        Renderer::draw(Some(&mut frame), game.state());

        if knocked_out.is_some() {
            let snapshot = MatchSnapshot::from(game.state());
            info!(
                match_id = %game.id(),
                tick,
                draw_calls = frame.commands().len(),
                snapshot = %serde_json::to_string(&snapshot).unwrap_or_default(),
                "Headless match decided"
            );
        }

        // a decided match only changes again through a scripted restart
        if game.state().winner.is_some() && pending.peek().is_none() {
            break;
        }
    }

    MatchSummary::build(&game)
}

fn apply(game: &mut GameMatch, action: ScriptAction, now_ms: u64) -> Option<MatchEvent> {
    match action {
        ScriptAction::KeyDown { key } => game.key_down(key, now_ms),
        ScriptAction::KeyUp { key } => {
            game.key_up(key);
            None
        }
        ScriptAction::Click { x } => Some(game.click(x, now_ms)),
        ScriptAction::Restart => game.restart().then_some(MatchEvent::Restarted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    fn room() -> RoomCode {
        RoomCode::parse("HEAD01").unwrap()
    }

    #[test]
    fn parses_tagged_actions() {
        let script = assert_ok!(InputScript::parse(
            r#"{
                "room_code": "abc123",
                "events": [
                    { "tick": 0, "action": { "type": "key_down", "key": "arrow_left" } },
                    { "tick": 5, "action": { "type": "click", "x": 120.5 } },
                    { "tick": 9, "action": { "type": "restart" } }
                ]
            }"#
        ));

        assert_eq!(script.room_code, Some(RoomCode::parse("ABC123").unwrap()));
        assert_eq!(
            script.events[0].action,
            ScriptAction::KeyDown {
                key: Key::ArrowLeft
            }
        );
        assert_eq!(script.events[1].action, ScriptAction::Click { x: 120.5 });
        assert_eq!(script.events[2].action, ScriptAction::Restart);
    }

    #[test]
    fn rejects_out_of_order_events() {
        let err = InputScript::parse(
            r#"{ "events": [
                { "tick": 4, "action": { "type": "key_up", "key": "d" } },
                { "tick": 2, "action": { "type": "key_up", "key": "d" } }
            ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ScriptError::OutOfOrder { index: 1 }));
    }

    #[test]
    fn rejects_bad_room_codes() {
        let err = InputScript::parse(r#"{ "room_code": "NO", "events": [] }"#).unwrap_err();
        assert!(matches!(err, ScriptError::Parse(_)));
    }

    #[test]
    fn demo_script_is_ordered() {
        assert_ok!(InputScript::demo().validate());
    }

    #[tokio::test]
    async fn missing_script_file_is_an_io_error() {
        let err = InputScript::load(Path::new("/definitely/not/here.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScriptError::Io { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn demo_match_ends_in_knockout() {
        let summary = run(GameMatch::start(room()), InputScript::demo(), 3600).await;

        assert_eq!(summary.winner.as_deref(), Some("Player 1"));
        assert_eq!(summary.room_code, room());
        assert!(summary.ticks < 300);

        let one = &summary.fighters[0];
        let two = &summary.fighters[1];
        assert_eq!(two.health, 0);
        assert_eq!(one.health, 100);
        assert_eq!(one.attacks, 6);
        assert_eq!(one.hits, 5);
        assert_eq!(one.damage_dealt, 15 + 25 * 4);
    }

    #[tokio::test(start_paused = true)]
    async fn scripted_restart_starts_a_fresh_match() {
        let mut script = InputScript::demo();
        script.events.push(ScriptEvent {
            tick: 300,
            action: ScriptAction::Restart,
        });
        let game = GameMatch::start(room());
        let first_id = game.id();

        let summary = run(game, script, 400).await;

        assert_ne!(summary.match_id, first_id);
        assert_eq!(summary.room_code, room());
        assert_eq!(summary.winner, None);
        assert_eq!(summary.ticks, 100);
        assert!(summary.fighters.iter().all(|f| f.health == 100 && f.attacks == 0));
    }

    #[tokio::test(start_paused = true)]
    async fn tick_cap_stops_an_idle_match() {
        let script = InputScript {
            room_code: None,
            events: Vec::new(),
        };
        let summary = run(GameMatch::start(room()), script, 30).await;

        assert_eq!(summary.winner, None);
        assert_eq!(summary.ticks, 30);
        assert!(summary.fighters.iter().all(|f| f.health == 100));
    }

    #[tokio::test(start_paused = true)]
    async fn right_half_click_attacks_for_player_two() {
        let script = InputScript {
            room_code: None,
            events: vec![
                ScriptEvent {
                    tick: 1,
                    action: ScriptAction::Click { x: 700.0 },
                },
                ScriptEvent {
                    tick: 2,
                    action: ScriptAction::KeyDown {
                        key: Key::ArrowLeft,
                    },
                },
            ],
        };
        let summary = run(GameMatch::start(room()), script, 10).await;

        assert_eq!(summary.fighters[0].attacks, 0);
        assert_eq!(summary.fighters[1].attacks, 1);
        assert_eq!(summary.ticks, 10);
    }
}
