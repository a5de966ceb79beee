//! The game engine for the hex bubble shooter.
//!
//! This module contains all the gameplay logic including:
//! - Hexagonal grid system (axial coordinates)
//! - Board state and bubble colors
//! - Attachment, matching and pruning
//! - Projectile stepping and the aim preview
//! - Score, shot budget and high score

pub mod attach;
pub mod bubble;
pub mod cluster;
pub mod config;
pub mod error;
pub mod grid;
pub mod hex;
pub mod highscore;
pub mod projectile;
pub mod session;
pub mod shooter;
pub mod state;
pub mod trajectory;

use bevy::prelude::*;

use self::{
    config::EngineConfig,
    highscore::{HighScoreStore, JsonFileStore, MemoryStore},
    session::GameSession,
};

pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        config::plugin,
        hex::plugin,
        bubble::plugin,
        state::plugin,
        trajectory::plugin,
        shooter::plugin,
    ));

    app.add_systems(Startup, start_session);
}

/// Systems that drive the session each frame. Order host systems against it.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineSystems;

/// Start a game unless the host already inserted a session.
fn start_session(
    mut commands: Commands,
    config: Res<EngineConfig>,
    existing: Option<Res<GameSession>>,
) {
    if existing.is_some() {
        return;
    }

    let store: Box<dyn HighScoreStore> = match JsonFileStore::in_data_dir() {
        Some(store) => {
            info!("Using high score file {:?}", store.path());
            Box::new(store)
        }
        None => {
            warn!("No local data directory, high score will not persist");
            Box::new(MemoryStore::default())
        }
    };

    commands.insert_resource(GameSession::new(config.clone(), store));
    info!("Game started - bubble shooter ready!");
}
