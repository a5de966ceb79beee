//! Bubbles - the spheres that are fired and placed on the board.
//!
//! A bubble is in flight until it attaches; from then on it carries grid
//! coordinates and belongs to the [`Board`](super::grid::Board).

use bevy::prelude::*;
use rand::Rng;

use super::hex::AxialCoord;

pub(super) fn plugin(app: &mut App) {
    app.register_type::<BubbleColor>();
    app.register_type::<BubbleId>();
    app.add_message::<BubbleSpawned>();
    app.add_message::<BubbleMoved>();
    app.add_message::<BubbleRemoved>();
}

/// The different bubble colors.
///
/// Only compared for identity; `to_color` is a rendering hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Default)]
pub enum BubbleColor {
    #[default]
    Red,
    Green,
    Blue,
    Yellow,
    Magenta,
    Cyan,
}

impl BubbleColor {
    /// Get the actual color for rendering.
    pub fn to_color(self) -> Color {
        match self {
            BubbleColor::Red => Color::srgb(1.0, 0.0, 0.0),
            BubbleColor::Green => Color::srgb(0.0, 1.0, 0.0),
            BubbleColor::Blue => Color::srgb(0.0, 0.0, 1.0),
            BubbleColor::Yellow => Color::srgb(1.0, 1.0, 0.0),
            BubbleColor::Magenta => Color::srgb(1.0, 0.0, 1.0),
            BubbleColor::Cyan => Color::srgb(0.0, 1.0, 1.0),
        }
    }

    /// Pick a random color from `palette`. Returns `None` for an empty palette.
    pub fn random_from(rng: &mut impl Rng, palette: &[BubbleColor]) -> Option<Self> {
        if palette.is_empty() {
            return None;
        }
        Some(palette[rng.random_range(0..palette.len())])
    }

    /// All possible bubble colors.
    pub const ALL: [BubbleColor; 6] = [
        BubbleColor::Red,
        BubbleColor::Green,
        BubbleColor::Blue,
        BubbleColor::Yellow,
        BubbleColor::Magenta,
        BubbleColor::Cyan,
    ];
}

/// Stable handle the render collaborator uses to track a bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub struct BubbleId(pub u32);

impl std::fmt::Display for BubbleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One sphere, placed or in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    pub id: BubbleId,
    pub color: BubbleColor,
    pub radius: f32,
    /// Continuous position; snapped to the cell center once placed.
    pub position: Vec3,
    /// Set exactly once, on attachment.
    pub grid_coords: Option<AxialCoord>,
}

impl Bubble {
    /// A bubble that is not on the grid yet.
    pub fn new(id: BubbleId, color: BubbleColor, radius: f32, position: Vec3) -> Self {
        Self {
            id,
            color,
            radius,
            position,
            grid_coords: None,
        }
    }

    /// A bubble sitting at the center of `coord`.
    pub fn placed(id: BubbleId, color: BubbleColor, radius: f32, coord: AxialCoord) -> Self {
        Self {
            id,
            color,
            radius,
            position: coord.to_world(radius),
            grid_coords: Some(coord),
        }
    }

    /// Sphere overlap test: center distance below the sum of the radii.
    pub fn collides_with(&self, other: &Bubble) -> bool {
        self.position.distance(other.position) < self.radius + other.radius
    }
}

/// Sent when a bubble is created (board fill or a new shooter bubble).
#[derive(Message, Debug, Clone)]
pub struct BubbleSpawned {
    pub id: BubbleId,
    pub color: BubbleColor,
    pub position: Vec3,
}

/// Sent whenever a bubble's position changes.
#[derive(Message, Debug, Clone)]
pub struct BubbleMoved {
    pub id: BubbleId,
    pub position: Vec3,
}

/// Sent when a bubble leaves play (cleared, dropped or cancelled).
#[derive(Message, Debug, Clone)]
pub struct BubbleRemoved {
    pub id: BubbleId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn empty_palette_gives_no_color() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(BubbleColor::random_from(&mut rng, &[]), None);
    }

    #[test]
    fn random_color_stays_in_palette() {
        let mut rng = StdRng::seed_from_u64(7);
        let palette = [BubbleColor::Blue, BubbleColor::Cyan];
        for _ in 0..50 {
            let c = BubbleColor::random_from(&mut rng, &palette).unwrap();
            assert!(palette.contains(&c));
        }
    }

    #[test]
    fn collision_uses_sum_of_radii() {
        let a = Bubble::new(BubbleId(0), BubbleColor::Red, 1.0, Vec3::ZERO);
        let mut b = Bubble::new(BubbleId(1), BubbleColor::Red, 1.0, Vec3::new(1.99, 0.0, 0.0));
        assert!(a.collides_with(&b));
        b.position.x = 2.0;
        assert!(!a.collides_with(&b));
    }

    #[test]
    fn placed_bubble_sits_on_cell_center() {
        let coord = AxialCoord::new(2, -1);
        let b = Bubble::placed(BubbleId(3), BubbleColor::Green, 1.0, coord);
        assert_eq!(b.grid_coords, Some(coord));
        assert_eq!(b.position, coord.to_world(1.0));
    }
}
