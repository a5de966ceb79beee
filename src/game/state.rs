//! Game state management - score, shot results and win/lose conditions.
//!
//! Win: clear every bubble from the board.
//! Lose: run out of shots.

use bevy::prelude::*;

use super::{bubble::BubbleId, config::EngineConfig, hex::AxialCoord};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<GameStatus>();
    app.add_message::<ShotResolved>();
}

/// Running score for the current game.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GameScore {
    pub score: u32,
    pub bubbles_popped: u32,
    pub bubbles_dropped: u32,
    pub clusters_popped: u32,
}

impl GameScore {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Score a cleared cluster. Returns the points awarded.
    pub fn add_cluster(&mut self, count: usize, config: &EngineConfig) -> u32 {
        if count == 0 {
            return 0;
        }
        let points = count as u32 * config.points_per_match;
        self.score += points;
        self.bubbles_popped += count as u32;
        self.clusters_popped += 1;
        info!(
            "Cluster popped: {} bubbles, +{} points (total: {})",
            count, points, self.score
        );
        points
    }

    /// Score bubbles that fell off the board. Returns the points awarded.
    pub fn add_dropped(&mut self, count: usize, config: &EngineConfig) -> u32 {
        if count == 0 {
            return 0;
        }
        let points = count as u32 * config.points_per_drop;
        self.score += points;
        self.bubbles_dropped += count as u32;
        info!(
            "Floating bubbles removed: {}, +{} bonus points (total: {})",
            count, points, self.score
        );
        points
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum GameStatus {
    #[default]
    Playing,
    /// The board was emptied by a clear.
    Cleared,
    OutOfShots,
}

/// How a shot ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotOutcome {
    /// Placed on the board.
    Attached,
    /// Left the playfield without touching anything.
    Cancelled,
    /// Touched the board but every candidate cell was taken.
    Rejected,
}

/// Everything the host needs after a shot resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShotResult {
    pub outcome: ShotOutcome,
    /// The projectile's id, placed or not.
    pub projectile: BubbleId,
    pub placed: Option<AxialCoord>,
    pub cleared: Vec<BubbleId>,
    pub dropped: Vec<BubbleId>,
    pub score_delta: u32,
    pub score: u32,
    pub new_high_score: bool,
    pub status: GameStatus,
}

/// Message carrying a resolved shot to the host.
#[derive(Message, Debug, Clone)]
pub struct ShotResolved(pub ShotResult);
