//! Playfield and scoring configuration.
//!
//! Defaults reproduce the classic layout: radius-1 bubbles, a shooter below
//! the board and side walls just outside the widest row.

use std::{fs, path::Path};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::{cluster::MIN_CLUSTER_SIZE, error::Result};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<EngineConfig>();
}

/// Radius of every bubble, in world units.
pub const BUBBLE_RADIUS: f32 = 1.0;

/// Distance a projectile travels per frame.
pub const STEP_SPEED: f32 = 0.5;

/// Projectiles above this height are discarded.
pub const TOP_BOUND: f32 = 10.0;

/// Smallest allowed vertical component of the aim direction.
pub const MIN_UPWARD_AIM: f32 = 0.1;

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub bubble_radius: f32,
    pub step_speed: f32,
    pub shooter_position: Vec3,
    pub left_wall: f32,
    pub right_wall: f32,
    pub top_bound: f32,
    pub bottom_bound: f32,
    pub min_upward_aim: f32,
    /// Safety cap for synchronous `fire_shot`.
    pub max_flight_steps: u32,
    pub preview_max_iterations: usize,
    pub preview_max_points: usize,
    /// Record an intermediate preview point every N steps.
    pub preview_point_interval: usize,
    pub min_match_size: usize,
    pub points_per_match: u32,
    pub points_per_drop: u32,
    /// Cells with this `r` are the anchor line.
    pub anchor_row: i32,
    pub initial_rows: i32,
    pub shots_per_game: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bubble_radius: BUBBLE_RADIUS,
            step_speed: STEP_SPEED,
            shooter_position: Vec3::new(0.0, -8.0, 0.0),
            // Five initial rows reach x = +-6; walls sit past the outer bubbles.
            left_wall: -7.5,
            right_wall: 7.5,
            top_bound: TOP_BOUND,
            bottom_bound: -10.0,
            min_upward_aim: MIN_UPWARD_AIM,
            max_flight_steps: 10_000,
            preview_max_iterations: 100,
            preview_max_points: 20,
            preview_point_interval: 5,
            min_match_size: MIN_CLUSTER_SIZE,
            points_per_match: 10,
            points_per_drop: 20,
            anchor_row: 0,
            initial_rows: 5,
            shots_per_game: 50,
        }
    }
}

impl EngineConfig {
    /// Parse a config from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config file, logging where it came from.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_json(&contents)?;
        info!("Loaded engine config from {:?}", path);
        Ok(config)
    }

    /// Clamp an aim direction so it always points up the field.
    ///
    /// Input lives in the xy plane; a zero vector aims straight up.
    pub fn aim_direction(&self, direction: Vec2) -> Vec3 {
        let mut dir = direction.normalize_or_zero();
        if dir == Vec2::ZERO {
            dir = Vec2::Y;
        }
        if dir.y < self.min_upward_aim {
            dir.y = self.min_upward_aim;
            dir = dir.normalize();
        }
        dir.extend(0.0)
    }
}
