//! Hex-grid bubble matching and trajectory engine.
//!
//! Add [`plugin`] to a Bevy app, then drive it with [`AimShot`], [`FireShot`]
//! and [`RestartGame`]. Or use [`GameSession`] directly without any
//! schedule at all.

pub mod game;

use bevy::prelude::*;

pub use game::{
    EngineSystems,
    bubble::{Bubble, BubbleColor, BubbleId, BubbleMoved, BubbleRemoved, BubbleSpawned},
    config::EngineConfig,
    error::{EngineError, Result},
    grid::Board,
    hex::{AxialCoord, grid_to_world, world_to_grid},
    highscore::{HighScoreStore, JsonFileStore, MemoryStore},
    session::{BoardEvent, GameSession},
    shooter::{AimShot, FireShot, RestartGame, ShooterState},
    state::{GameScore, GameStatus, ShotOutcome, ShotResolved, ShotResult},
    trajectory::{TrajectoryPreview, predict_trajectory},
};

pub fn plugin(app: &mut App) {
    app.add_plugins(game::plugin);
}
