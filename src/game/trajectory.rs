//! Aim preview: where the loaded bubble would travel if fired now.
//!
//! A read-only simulation of the projectile path, stepping at the shot
//! speed, reflecting off the side walls and stopping where the projectile
//! would first touch a placed bubble. Recomputed from scratch whenever the
//! aim changes.

use bevy::prelude::*;

use super::{config::EngineConfig, grid::Board};

/// Resource holding the latest preview polyline.
#[derive(Resource, Debug, Default, Clone)]
pub struct TrajectoryPreview {
    pub points: Vec<Vec3>,
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<TrajectoryPreview>();
}

/// Predict the path of a shot from `start` along `direction`.
///
/// The direction is biased upward first (see [`EngineConfig::aim_direction`]).
/// The result starts at `start` and never holds more than
/// `preview_max_points` points.
pub fn predict_trajectory(
    start: Vec3,
    direction: Vec2,
    board: &Board,
    config: &EngineConfig,
) -> Vec<Vec3> {
    let cap = config.preview_max_points.max(1);
    let interval = config.preview_point_interval.max(1);
    let radius = config.bubble_radius;

    let mut velocity = config.aim_direction(direction) * config.step_speed;
    let mut current = start;
    let mut points = vec![start];

    let push = |points: &mut Vec<Vec3>, p: Vec3| {
        if points.len() < cap && points.last() != Some(&p) {
            points.push(p);
        }
    };

    for i in 0..config.preview_max_iterations {
        if points.len() >= cap {
            break;
        }

        let next = current + velocity;

        // Reflect without moving; the next iteration continues from the same point.
        let hits_left = next.x - radius < config.left_wall && velocity.x < 0.0;
        let hits_right = next.x + radius > config.right_wall && velocity.x > 0.0;
        if hits_left || hits_right {
            velocity.x = -velocity.x;
            push(&mut points, current);
            continue;
        }

        if let Some(hit) = first_hit(current, velocity, board, radius) {
            push(&mut points, hit);
            return points;
        }

        current = next;
        if current.y > config.top_bound {
            push(&mut points, current);
            return points;
        }
        if i % interval == 0 {
            push(&mut points, current);
        }
    }

    push(&mut points, current);
    points
}

/// Closest point on the segment `from -> from + step` where a projectile of
/// `radius` first touches a placed bubble.
///
/// Each bubble is treated as a sphere inflated by the projectile radius, so
/// the hit point is the projectile center at contact.
fn first_hit(from: Vec3, step: Vec3, board: &Board, radius: f32) -> Option<Vec3> {
    let length = step.length();
    if length <= f32::EPSILON {
        return None;
    }
    let dir = step / length;

    board
        .bubbles()
        .filter_map(|b| ray_sphere(from, dir, b.position, b.radius + radius))
        .filter(|&t| t < length)
        .min_by(|a, b| a.total_cmp(b))
        .map(|t| from + dir * t)
}

/// Distance along a unit ray to the first intersection with a sphere.
///
/// An origin already inside the sphere hits at distance 0.
fn ray_sphere(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt = disc.sqrt();
    let far = -b + sqrt;
    if far < 0.0 {
        return None;
    }
    Some((-b - sqrt).max(0.0))
}
