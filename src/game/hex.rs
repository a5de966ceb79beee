//! Hexagonal coordinate system using axial coordinates.
//!
//! Based on Red Blob Games' guide:
//! https://www.redblobgames.com/grids/hexagons/
//!
//! We use "flat-top" orientation with axial `(q, r)` coordinates. The cube
//! coordinate `s = -q - r` is derived, never stored. World positions live in
//! the `z = 0` plane and scale with the bubble radius.

use bevy::prelude::*;

pub(super) fn plugin(app: &mut App) {
    app.register_type::<AxialCoord>();
}

/// Square root of 3, used frequently in hex math.
pub const SQRT_3: f32 = 1.732_050_8;

/// The six axial neighbor offsets, in canonical order.
///
/// Attachment resolution scans these first-fit, so the order is part of the
/// engine's observable behavior.
pub const DIRECTIONS: [AxialCoord; 6] = [
    AxialCoord::new(1, 0),
    AxialCoord::new(-1, 0),
    AxialCoord::new(0, 1),
    AxialCoord::new(0, -1),
    AxialCoord::new(1, -1),
    AxialCoord::new(-1, 1),
];

/// Axial hex coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub struct AxialCoord {
    pub q: i32,
    pub r: i32,
}

impl AxialCoord {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// The origin hex at (0, 0).
    pub const ORIGIN: Self = Self { q: 0, r: 0 };

    /// Derived cube coordinate (q + r + s = 0).
    #[inline]
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// All 6 neighboring coordinates in [`DIRECTIONS`] order.
    pub fn neighbors(&self) -> [AxialCoord; 6] {
        DIRECTIONS.map(|d| *self + d)
    }

    /// Hex distance: `(|dq| + |dr| + |ds|) / 2`.
    pub fn distance(&self, other: AxialCoord) -> i32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        (dq + dr + ds) / 2
    }

    /// Convert to a world position for bubbles of the given radius.
    ///
    /// - x = radius * 3/2 * q
    /// - y = radius * (sqrt(3)/2 * q + sqrt(3) * r)
    pub fn to_world(&self, radius: f32) -> Vec3 {
        let q = self.q as f32;
        let r = self.r as f32;
        let x = radius * (1.5 * q);
        let y = radius * (SQRT_3 / 2.0 * q + SQRT_3 * r);
        Vec3::new(x, y, 0.0)
    }

    /// Snap a world position to the nearest hex.
    ///
    /// The `z` component is ignored.
    pub fn from_world(position: Vec3, radius: f32) -> Self {
        let q = (2.0 / 3.0 * position.x) / radius;
        let r = (-1.0 / 3.0 * position.x + SQRT_3 / 3.0 * position.y) / radius;
        Self::round(q, r)
    }

    /// Cube-round fractional axial coordinates.
    ///
    /// Rounding q, r and s independently can break `q + r + s = 0`, so the
    /// component with the largest rounding error is recomputed from the other two.
    pub fn round(q: f32, r: f32) -> Self {
        let s = -q - r;

        let mut rq = q.round();
        let mut rr = r.round();
        let rs = s.round();

        let q_diff = (rq - q).abs();
        let r_diff = (rr - r).abs();
        let s_diff = (rs - s).abs();

        if q_diff > r_diff && q_diff > s_diff {
            rq = -rr - rs;
        } else if r_diff > s_diff {
            rr = -rq - rs;
        }

        Self::new(rq as i32, rr as i32)
    }
}

impl std::fmt::Display for AxialCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

impl std::ops::Add for AxialCoord {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        AxialCoord::new(self.q + other.q, self.r + other.r)
    }
}

impl std::ops::Sub for AxialCoord {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        AxialCoord::new(self.q - other.q, self.r - other.r)
    }
}

/// Shorthand for [`AxialCoord::to_world`].
pub fn grid_to_world(coord: AxialCoord, radius: f32) -> Vec3 {
    coord.to_world(radius)
}

/// Shorthand for [`AxialCoord::from_world`].
pub fn world_to_grid(position: Vec3, radius: f32) -> AxialCoord {
    AxialCoord::from_world(position, radius)
}
