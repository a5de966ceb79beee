//! Board state: every placed bubble, keyed by its hex cell.
//!
//! Uses a HashMap for sparse storage - only occupied cells are stored,
//! so occupancy and neighbor lookups are O(1).

use std::collections::HashMap;

use super::{
    bubble::{Bubble, BubbleId},
    error::{EngineError, Result},
    hex::AxialCoord,
};

/// The board holding all placed bubbles.
///
/// Invariant: every stored bubble has `grid_coords == Some(key)`.
#[derive(Debug, Default, Clone)]
pub struct Board {
    bubbles: HashMap<AxialCoord, Bubble>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, coord: AxialCoord) -> Option<&Bubble> {
        self.bubbles.get(&coord)
    }

    /// Check if a cell is occupied.
    pub fn has(&self, coord: AxialCoord) -> bool {
        self.bubbles.contains_key(&coord)
    }

    /// Place a bubble at its grid coordinates.
    ///
    /// Fails if the bubble has no coordinates or the cell is taken; callers
    /// resolve occupancy with [`resolve_attachment`](super::attach::resolve_attachment) first.
    pub fn place(&mut self, bubble: Bubble) -> Result<()> {
        let coord = bubble.grid_coords.ok_or(EngineError::NotPlaced)?;
        if self.has(coord) {
            return Err(EngineError::OccupiedCell(coord));
        }
        self.bubbles.insert(coord, bubble);
        Ok(())
    }

    /// Remove a bubble from a cell, returning it.
    pub fn remove(&mut self, coord: AxialCoord) -> Option<Bubble> {
        self.bubbles.remove(&coord)
    }

    /// Placed bubbles in the six cells around `coord`.
    pub fn neighbors(&self, coord: AxialCoord) -> Vec<&Bubble> {
        coord
            .neighbors()
            .iter()
            .filter_map(|n| self.bubbles.get(n))
            .collect()
    }

    pub fn clear(&mut self) {
        self.bubbles.clear();
    }

    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AxialCoord, &Bubble)> {
        self.bubbles.iter()
    }

    pub fn bubbles(&self) -> impl Iterator<Item = &Bubble> {
        self.bubbles.values()
    }

    pub fn coords(&self) -> impl Iterator<Item = AxialCoord> + '_ {
        self.bubbles.keys().copied()
    }

    /// Occupied cells on the anchor line (`r == anchor_row`).
    pub fn anchor_coords(&self, anchor_row: i32) -> Vec<AxialCoord> {
        self.bubbles
            .keys()
            .filter(|c| c.r == anchor_row)
            .copied()
            .collect()
    }

    /// Find where a bubble id currently sits.
    pub fn find_id(&self, id: BubbleId) -> Option<AxialCoord> {
        self.bubbles
            .iter()
            .find(|(_, b)| b.id == id)
            .map(|(c, _)| *c)
    }
}

/// Cells of the initial hexagonal patch: `r in 0..rows`, `|q| <= rows - 1`
/// and `|q + r| <= rows - 1`.
pub fn initial_layout(rows: i32) -> Vec<AxialCoord> {
    let extent = rows - 1;
    let mut cells = Vec::new();
    for q in -extent..=extent {
        for r in 0..rows {
            if (q + r).abs() > extent {
                continue;
            }
            cells.push(AxialCoord::new(q, r));
        }
    }
    cells
}
