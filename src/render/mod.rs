//! Match rendering onto a 2D drawing surface

pub mod display_list;
pub mod font;
pub mod raster;

use serde::Serialize;

use crate::game::fighter::{AttackKind, Facing, Fighter, FIGHTER_HEIGHT};
use crate::game::physics::{ARENA_HEIGHT, ARENA_WIDTH, GROUND_Y};
use crate::game::MatchState;

pub use display_list::DisplayList;
pub use raster::FrameBuffer;

/// RGBA colour, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const SKY: Color = Color::rgb(0x87, 0xce, 0xeb);
    pub const GROUND: Color = Color::rgb(0x8b, 0x45, 0x13);
    pub const KICK: Color = Color::rgb(0xff, 0xff, 0x00);
    pub const PUNCH: Color = Color::rgb(0xff, 0x88, 0x00);
    pub const HEALTH_TRACK: Color = Color::rgb(0x33, 0x33, 0x33);
    pub const HEALTH_OK: Color = Color::rgb(0x44, 0xff, 0x44);
    pub const HEALTH_LOW: Color = Color::rgb(0xff, 0x44, 0x44);
    pub const OVERLAY: Color = Color::rgba(0, 0, 0, 204);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Axis-aligned rectangle in logical units
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    Center,
}

/// Font size (px), colour and alignment for `fill_text`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStyle {
    pub size: f32,
    pub color: Color,
    pub align: TextAlign,
}

impl TextStyle {
    pub const fn left(size: f32, color: Color) -> Self {
        Self {
            size,
            color,
            align: TextAlign::Left,
        }
    }

    pub const fn centered(size: f32, color: Color) -> Self {
        Self {
            size,
            color,
            align: TextAlign::Center,
        }
    }
}

/// A 2D drawing surface
pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Outline centred on the rectangle's edges
    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32);

    /// Draw text with its baseline at `y`
    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle);
}

const HEALTH_BAR_WIDTH: f32 = 200.0;
const HEALTH_BAR_HEIGHT: f32 = 20.0;
const HEALTH_BAR_Y: f32 = 30.0;
const LOW_HEALTH_THRESHOLD: u32 = 30;

const HELP_LINES: [&str; 3] = [
    "P1: WASD + Space (punch/kick)",
    "P2: Arrows + Enter (punch/kick)",
    "Double tap attack for kick",
];

/// Paints a match state; holds no state of its own
pub struct Renderer;

impl Renderer {
    /// Draw one frame. A missing surface skips the frame.
    pub fn draw<C: Canvas + ?Sized>(surface: Option<&mut C>, state: &MatchState) {
        let Some(canvas) = surface else {
            return;
        };

        canvas.fill_rect(Rect::new(0.0, 0.0, ARENA_WIDTH, ARENA_HEIGHT), Color::SKY);
        let ground_top = GROUND_Y + FIGHTER_HEIGHT;
        canvas.fill_rect(
            Rect::new(0.0, ground_top, ARENA_WIDTH, ARENA_HEIGHT - ground_top),
            Color::GROUND,
        );

        if !state.game_started {
            return;
        }

        Self::draw_fighter(canvas, &state.player1);
        Self::draw_fighter(canvas, &state.player2);

        Self::draw_health_bar(canvas, &state.player1, 50.0);
        Self::draw_health_bar(canvas, &state.player2, ARENA_WIDTH - 250.0);

        if let Some(winner) = state.winner_name() {
            Self::draw_winner(canvas, winner);
        }

        Self::draw_help(canvas);
    }

    fn draw_fighter<C: Canvas + ?Sized>(canvas: &mut C, fighter: &Fighter) {
        let body = fighter.body();
        canvas.fill_rect(body, fighter.color);

        let eye_x = match fighter.facing {
            Facing::Right => body.right() - 8.0,
            Facing::Left => body.x + 4.0,
        };
        canvas.fill_rect(Rect::new(eye_x, body.y + 8.0, 4.0, 4.0), Color::WHITE);

        if let Some(kind) = fighter.attack {
            let color = match kind {
                AttackKind::Kick => Color::KICK,
                AttackKind::Punch => Color::PUNCH,
            };
            let strike_x = match fighter.facing {
                Facing::Right => body.right(),
                Facing::Left => body.x - 20.0,
            };
            canvas.fill_rect(Rect::new(strike_x, body.y + 10.0, 20.0, 8.0), color);
        }
    }

    fn draw_health_bar<C: Canvas + ?Sized>(canvas: &mut C, fighter: &Fighter, x: f32) {
        let track = Rect::new(x, HEALTH_BAR_Y, HEALTH_BAR_WIDTH, HEALTH_BAR_HEIGHT);
        canvas.fill_rect(track, Color::HEALTH_TRACK);

        let color = if fighter.health > LOW_HEALTH_THRESHOLD {
            Color::HEALTH_OK
        } else {
            Color::HEALTH_LOW
        };
        let filled = fighter.health as f32 * HEALTH_BAR_WIDTH / fighter.max_health.max(1) as f32;
        canvas.fill_rect(
            Rect::new(x, HEALTH_BAR_Y, filled, HEALTH_BAR_HEIGHT),
            color,
        );

        canvas.stroke_rect(track, Color::WHITE, 2.0);

        let label = format!("{}: {}/{}", fighter.name, fighter.health, fighter.max_health);
        canvas.fill_text(
            &label,
            x,
            HEALTH_BAR_Y - 5.0,
            TextStyle::left(14.0, Color::WHITE),
        );
    }

    fn draw_winner<C: Canvas + ?Sized>(canvas: &mut C, winner: &str) {
        canvas.fill_rect(Rect::new(0.0, 0.0, ARENA_WIDTH, ARENA_HEIGHT), Color::OVERLAY);

        let center_x = ARENA_WIDTH / 2.0;
        let center_y = ARENA_HEIGHT / 2.0;
        canvas.fill_text(
            &format!("{winner} Wins!"),
            center_x,
            center_y,
            TextStyle::centered(48.0, Color::WHITE),
        );
        canvas.fill_text(
            "Press R to restart",
            center_x,
            center_y + 60.0,
            TextStyle::centered(24.0, Color::WHITE),
        );
    }

    fn draw_help<C: Canvas + ?Sized>(canvas: &mut C) {
        let style = TextStyle::left(12.0, Color::WHITE);
        for (i, line) in HELP_LINES.iter().enumerate() {
            let baseline = ARENA_HEIGHT - 40.0 + 15.0 * i as f32;
            canvas.fill_text(line, 10.0, baseline, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::display_list::DrawCommand;
    use crate::game::input::PlayerSlot;
    use crate::lobby::RoomCode;

    fn running() -> MatchState {
        MatchState::start(RoomCode::parse("PAINT1").unwrap())
    }

    fn render(state: &MatchState) -> Vec<DrawCommand> {
        let mut list = DisplayList::new();
        Renderer::draw(Some(&mut list), state);
        list.commands().to_vec()
    }

    fn fills(commands: &[DrawCommand]) -> Vec<(Rect, Color)> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillRect { rect, color } => Some((*rect, *color)),
                _ => None,
            })
            .collect()
    }

    fn texts(commands: &[DrawCommand]) -> Vec<String> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillText { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn missing_surface_is_a_no_op() {
        Renderer::draw(None::<&mut DisplayList>, &running());
    }

    #[test]
    fn rendering_is_idempotent() {
        let mut state = running();
        state.player1.attack = Some(AttackKind::Kick);
        state.player2.is_crouching = true;
        assert_eq!(render(&state), render(&state));
    }

    #[test]
    fn lobby_state_draws_only_the_backdrop() {
        let state = MatchState::new(RoomCode::parse("PAINT1").unwrap());
        let commands = render(&state);
        assert_eq!(commands.len(), 2);
        assert_eq!(
            fills(&commands),
            vec![
                (Rect::new(0.0, 0.0, 800.0, 400.0), Color::SKY),
                (Rect::new(0.0, 380.0, 800.0, 20.0), Color::GROUND),
            ]
        );
    }

    #[test]
    fn crouching_fighter_is_drawn_shorter_with_feet_planted() {
        let mut state = running();
        state.player1.is_crouching = true;
        let body = fills(&render(&state))
            .into_iter()
            .find(|(_, color)| *color == state.player1.color)
            .map(|(rect, _)| rect)
            .unwrap();

        assert!((body.h - 42.0).abs() < 1e-4);
        assert!((body.bottom() - 380.0).abs() < 1e-4);
    }

    #[test]
    fn strike_colour_depends_on_attack_kind() {
        let mut state = running();
        state.player1.attack = Some(AttackKind::Punch);
        state.player2.attack = Some(AttackKind::Kick);
        let rects = fills(&render(&state));

        assert!(rects.contains(&(Rect::new(190.0, 330.0, 20.0, 8.0), Color::PUNCH)));
        assert!(rects.contains(&(Rect::new(580.0, 330.0, 20.0, 8.0), Color::KICK)));
    }

    #[test]
    fn facing_marker_follows_direction() {
        let state = running();
        let rects = fills(&render(&state));
        assert!(rects.contains(&(Rect::new(182.0, 328.0, 4.0, 4.0), Color::WHITE)));
        assert!(rects.contains(&(Rect::new(604.0, 328.0, 4.0, 4.0), Color::WHITE)));
    }

    #[test]
    fn health_bar_turns_red_at_threshold() {
        let mut state = running();
        state.player1.health = 31;
        state.player2.health = 30;
        let rects = fills(&render(&state));

        assert!(rects.contains(&(Rect::new(50.0, 30.0, 62.0, 20.0), Color::HEALTH_OK)));
        assert!(rects.contains(&(Rect::new(550.0, 30.0, 60.0, 20.0), Color::HEALTH_LOW)));

        let labels = texts(&render(&state));
        assert!(labels.contains(&"Player 1: 31/100".to_string()));
        assert!(labels.contains(&"Player 2: 30/100".to_string()));
    }

    #[test]
    fn winner_overlay_sits_above_fighters_and_below_help() {
        let mut state = running();
        state.winner = Some(PlayerSlot::Two);
        let commands = render(&state);

        let overlay = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::FillRect { color, .. } if *color == Color::OVERLAY))
            .unwrap();
        let last_fighter = commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::FillRect { color, .. } if *color == state.player2.color))
            .unwrap();
        let help = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::FillText { text, .. } if text == HELP_LINES[0]))
            .unwrap();

        assert!(last_fighter < overlay);
        assert!(overlay < help);

        let labels = texts(&commands);
        assert!(labels.contains(&"Player 2 Wins!".to_string()));
        assert!(labels.contains(&"Press R to restart".to_string()));
    }

    #[test]
    fn no_overlay_without_winner() {
        let commands = render(&running());
        assert!(!fills(&commands).iter().any(|(_, c)| *c == Color::OVERLAY));
        assert_eq!(texts(&commands).len(), 2 + HELP_LINES.len());
    }
}
