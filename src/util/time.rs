//! Time utilities for the fixed-rate simulation

use std::time::{Duration, Instant};

/// Tick rate configuration
pub const SIMULATION_TPS: u32 = 60; // 60 ticks per second
pub const TICK_DURATION_MICROS: u64 = 1_000_000 / SIMULATION_TPS as u64;

/// How many ticks the window loop may fall behind before it drops them
pub const MAX_CATCH_UP_TICKS: u32 = 5;

/// Wall-clock length of one simulation tick
pub fn tick_duration() -> Duration {
    Duration::from_micros(TICK_DURATION_MICROS)
}

/// Simulated match time (ms) at a given tick, used by deterministic replays
pub fn tick_to_millis(tick: u64) -> u64 {
    tick * 1000 / SIMULATION_TPS as u64
}

/// Monotonic match clock measuring milliseconds since it was started
#[derive(Debug, Clone)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
