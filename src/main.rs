//! Pixel Fighter - local two-player fighting game
//!
//! Two fighters share one keyboard on an 800x400 canvas. The game runs
//! either in a desktop window or headless, replaying a scripted input
//! timeline and printing a JSON match summary.

mod config;
mod game;
mod lobby;
mod platform;
mod render;
mod util;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, RunMode};

fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    info!("Starting Pixel Fighter");

    match config.run_mode {
        RunMode::Window => {
            let room_code = config
                .lobby
                .clone()
                .into_room_code(&mut rand::thread_rng());
            info!(room_code = %room_code, "Room ready");
            platform::window::run(&config, room_code)
        }
        RunMode::Headless => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to build runtime")?;

            let summary = runtime.block_on(platform::headless::run_from_config(&config))?;
            println!("{}", serde_json::to_string_pretty(&summary)?);

            info!("Headless run complete");
            Ok(())
        }
    }
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}
