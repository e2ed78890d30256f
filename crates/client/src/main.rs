//! Dungeon game client binary.
//!
//! Headless composition root: reads the environment, installs logging,
//! opens a session and lets the autopilot play the configured number of
//! rounds.
//!
//! ```bash
//! ROUNDS=5 GAME_SEED=7 RUST_LOG=game::ai=debug cargo run -p dungeon-client
//! ```

mod autopilot;
mod logging;

use anyhow::{Context, Result};
use runtime::{GameSession, RuntimeConfig, Topic};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = RuntimeConfig::from_env();
    let _guard = logging::setup_logging(&config.log_dir)?;

    tracing::info!("Starting Dungeon client");
    tracing::info!("Data directory: {}", config.data_dir.display());
    tracing::info!("Save directory: {}", config.save_dir.display());

    let mut session = GameSession::open(&config).context("failed to open session")?;
    session.bus_mut().subscribe(Topic::All, |event| {
        tracing::info!(target: "dungeon::events", kind = %event.kind(), ?event);
        Ok(())
    });

    for _ in 0..config.rounds {
        if !autopilot::play_round(&mut session) {
            tracing::warn!("No one left standing, stopping");
            break;
        }
    }

    session.save().context("failed to save the session")?;
    let stats = session.stats();
    tracing::info!(
        round = stats.round,
        enemies = stats.living_enemies,
        "Client shutdown complete"
    );
    Ok(())
}
