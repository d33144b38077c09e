//! Desktop window driver built on winit and pixels

use std::time::Instant;

use anyhow::Context;
use pixels::{Pixels, SurfaceTexture};
use tracing::{error, info, warn};
use winit::dpi::LogicalSize;
use winit::event::{
    ElementState, Event, KeyboardInput, MouseButton, VirtualKeyCode, WindowEvent,
};
use winit::event_loop::EventLoop;
use winit::window::WindowBuilder;

use crate::config::Config;
use crate::game::physics::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::game::{GameMatch, Key};
use crate::lobby::RoomCode;
use crate::render::{FrameBuffer, Renderer};
use crate::util::time::{tick_duration, Timer, MAX_CATCH_UP_TICKS};

const CANVAS_WIDTH: u32 = ARENA_WIDTH as u32;
const CANVAS_HEIGHT: u32 = ARENA_HEIGHT as u32;

/// Game keys for a physical key; Escape is handled by the window itself
pub fn map_key(code: VirtualKeyCode) -> Option<Key> {
    let key = match code {
        VirtualKeyCode::A => Key::A,
        VirtualKeyCode::D => Key::D,
        VirtualKeyCode::W => Key::W,
        VirtualKeyCode::S => Key::S,
        VirtualKeyCode::Space => Key::Space,
        VirtualKeyCode::Left => Key::ArrowLeft,
        VirtualKeyCode::Right => Key::ArrowRight,
        VirtualKeyCode::Up => Key::ArrowUp,
        VirtualKeyCode::Down => Key::ArrowDown,
        VirtualKeyCode::Return | VirtualKeyCode::NumpadEnter => Key::Enter,
        VirtualKeyCode::R => Key::R,
        _ => return None,
    };
    Some(key)
}

/// Open the game window and run until it is closed
pub fn run(config: &Config, room_code: RoomCode) -> anyhow::Result<()> {
    let event_loop = EventLoop::new();

    let scale = config.window_scale;
    let window = WindowBuilder::new()
        .with_title(format!("Pixel Fighter - Room {room_code}"))
        .with_inner_size(LogicalSize::new(
            CANVAS_WIDTH as f64 * scale,
            CANVAS_HEIGHT as f64 * scale,
        ))
        .with_min_inner_size(LogicalSize::new(CANVAS_WIDTH / 2, CANVAS_HEIGHT / 2))
        .build(&event_loop)
        .context("Failed to create window")?;

    let mut pixels = {
        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width, size.height, &window);
        Pixels::new(CANVAS_WIDTH, CANVAS_HEIGHT, surface).context("Failed to create pixel surface")?
    };

    let mut game = GameMatch::start(room_code);
    let clock = Timer::new();
    let mut next_tick = Instant::now() + tick_duration();
    let mut cursor: Option<(f32, f32)> = None;

    info!(scale, "Window open");

    event_loop.run(move |event, _, control_flow| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        state: ElementState::Pressed,
                        virtual_keycode: Some(VirtualKeyCode::Escape),
                        ..
                    },
                ..
            } => {
                info!(match_id = %game.id(), "Window closed");
                control_flow.set_exit();
            }
            WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        state,
                        virtual_keycode: Some(code),
                        ..
                    },
                ..
            } => {
                let Some(key) = map_key(code) else {
                    return;
                };
                match state {
                    ElementState::Pressed => {
                        game.key_down(key, clock.elapsed_ms());
                    }
                    ElementState::Released => game.key_up(key),
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                cursor = Some((position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => cursor = None,
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                // clicks in the letterbox around the canvas are ignored
                if let Some((x, _)) = cursor.and_then(|pos| pixels.window_pos_to_pixel(pos).ok()) {
                    game.click(x as f32, clock.elapsed_ms());
                }
            }
            WindowEvent::Focused(false) => game.release_all(),
            WindowEvent::Resized(size) => {
                if let Err(err) = pixels.resize_surface(size.width, size.height) {
                    error!(error = %err, "Failed to resize surface");
                    control_flow.set_exit();
                }
            }
            _ => {}
        },
        Event::MainEventsCleared => {
            let now = Instant::now();
            if now >= next_tick {
                let mut steps = 0;
                while now >= next_tick && steps < MAX_CATCH_UP_TICKS {
                    game.tick(clock.elapsed_ms());
                    next_tick += tick_duration();
                    steps += 1;
                }
                if now >= next_tick {
                    warn!(match_id = %game.id(), "Simulation fell behind, dropping ticks");
                    next_tick = now + tick_duration();
                }
                window.request_redraw();
            }
            control_flow.set_wait_until(next_tick);
        }
        Event::RedrawRequested(_) => {
            let mut frame = FrameBuffer::wrap(pixels.frame_mut(), CANVAS_WIDTH, CANVAS_HEIGHT);
            Renderer::draw(frame.as_mut(), game.state());

            if let Err(err) = pixels.render() {
                error!(error = %err, "Failed to present frame");
                control_flow.set_exit();
            }
        }
        _ => {}
    })
}
