//! Projectile - the bubble being shot.
//!
//! The projectile travels in a straight line, bouncing off the side walls,
//! until it touches a placed bubble or leaves the playfield. Motion is an
//! explicit step: the host calls [`Projectile::step`] once per frame.

use bevy::prelude::*;

use super::{
    attach::find_collision, bubble::Bubble, config::EngineConfig, grid::Board, hex::AxialCoord,
};

/// A bubble in flight and its per-frame velocity.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub bubble: Bubble,
    pub velocity: Vec3,
    /// Frames flown so far.
    pub steps: u32,
}

/// What happened during one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Still flying.
    InFlight,
    /// Touching the placed bubble at this cell.
    Collided(AxialCoord),
    /// Left the playfield without touching anything.
    OutOfBounds,
}

impl Projectile {
    /// Launch `bubble` along a unit `direction` at the configured speed.
    pub fn launch(bubble: Bubble, direction: Vec3, config: &EngineConfig) -> Self {
        Self {
            bubble,
            velocity: direction * config.step_speed,
            steps: 0,
        }
    }

    /// Advance one frame: move, bounce off the side walls, then test bounds
    /// and collisions.
    ///
    /// A shot still flying after `max_flight_steps` frames counts as out of bounds.
    pub fn step(&mut self, board: &Board, config: &EngineConfig) -> StepOutcome {
        self.steps += 1;
        self.bubble.position += self.velocity;

        let radius = self.bubble.radius;
        let pos = &mut self.bubble.position;

        // Left wall bounce
        if pos.x - radius < config.left_wall {
            pos.x = config.left_wall + radius;
            self.velocity.x = self.velocity.x.abs();
        }

        // Right wall bounce
        if pos.x + radius > config.right_wall {
            pos.x = config.right_wall - radius;
            self.velocity.x = -self.velocity.x.abs();
        }

        if let Some(other) = find_collision(board, &self.bubble).and_then(|b| b.grid_coords) {
            return StepOutcome::Collided(other);
        }

        let y = self.bubble.position.y;
        if y > config.top_bound || y < config.bottom_bound || self.steps >= config.max_flight_steps {
            return StepOutcome::OutOfBounds;
        }

        StepOutcome::InFlight
    }
}
