//! Engine errors.
//!
//! Everything here is locally recoverable: the engine works on in-memory
//! state, so errors are reported to the caller and never retried.

use std::fmt;

use super::hex::AxialCoord;

#[derive(Debug)]
pub enum EngineError {
    /// Placement into a cell that already holds a bubble.
    OccupiedCell(AxialCoord),
    /// The snapped cell and all six cells around the collision partner are taken.
    AllNeighborsOccupied(AxialCoord),
    /// A bubble without grid coordinates was used where a placed bubble is required.
    NotPlaced,
    /// `launch` was called while a projectile is still flying.
    ShotInFlight,
    /// The shot budget for this game is spent.
    OutOfShots,
    /// An empty palette was passed to board setup.
    EmptyPalette,
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::OccupiedCell(coord) => write!(f, "cell {coord} is already occupied"),
            EngineError::AllNeighborsOccupied(coord) => {
                write!(f, "no free cell around {coord}")
            }
            EngineError::NotPlaced => write!(f, "bubble has no grid coordinates"),
            EngineError::ShotInFlight => write!(f, "a shot is already in flight"),
            EngineError::OutOfShots => write!(f, "no shots left"),
            EngineError::EmptyPalette => write!(f, "palette must contain at least one color"),
            EngineError::Io(e) => write!(f, "io error: {e}"),
            EngineError::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Io(e) => Some(e),
            EngineError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::Io(e)
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Json(e)
    }
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
