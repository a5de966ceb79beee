//! Attachment - turning a projectile that hit something into a placed bubble.

use bevy::prelude::*;

use super::{
    bubble::Bubble,
    error::{EngineError, Result},
    grid::Board,
    hex::{AxialCoord, DIRECTIONS},
};

/// The placed bubble a projectile is touching, if any.
///
/// When several overlap, the nearest center wins; equal distances fall back
/// to coordinate order so the choice never depends on map iteration.
pub fn find_collision<'a>(board: &'a Board, projectile: &Bubble) -> Option<&'a Bubble> {
    board
        .bubbles()
        .filter(|b| projectile.collides_with(b))
        .min_by(|a, b| {
            let da = a.position.distance_squared(projectile.position);
            let db = b.position.distance_squared(projectile.position);
            da.total_cmp(&db).then_with(|| a.grid_coords.cmp(&b.grid_coords))
        })
}

/// Pick the cell a projectile at `position` ends up in after touching `other`.
///
/// The snapped cell wins when it is free. Otherwise the six cells around
/// `other` are tried first-fit in [`DIRECTIONS`] order. If every one of them
/// is taken the attachment is rejected instead of overwriting a bubble.
pub fn resolve_attachment(
    board: &Board,
    position: Vec3,
    radius: f32,
    other: AxialCoord,
) -> Result<AxialCoord> {
    let target = AxialCoord::from_world(position, radius);
    if !board.has(target) {
        return Ok(target);
    }

    DIRECTIONS
        .iter()
        .map(|d| other + *d)
        .find(|c| !board.has(*c))
        .ok_or(EngineError::AllNeighborsOccupied(other))
}

/// Attach `bubble` next to the placed bubble at `other`.
///
/// Snaps its position to the cell center, sets its grid coordinates and
/// hands it to the board. Returns the cell it was placed in.
pub fn attach(board: &mut Board, mut bubble: Bubble, other: AxialCoord) -> Result<AxialCoord> {
    let coord = resolve_attachment(board, bubble.position, bubble.radius, other)?;
    bubble.position = coord.to_world(bubble.radius);
    bubble.grid_coords = Some(coord);
    debug!("Attaching {:?} bubble {} at {}", bubble.color, bubble.id, coord);
    board.place(bubble)?;
    Ok(coord)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::bubble::{BubbleColor, BubbleId};

    fn place(board: &mut Board, id: u32, coord: AxialCoord) {
        board
            .place(Bubble::placed(BubbleId(id), BubbleColor::Red, 1.0, coord))
            .unwrap();
    }

    #[test]
    fn free_snapped_cell_is_used() {
        let mut board = Board::new();
        place(&mut board, 0, AxialCoord::ORIGIN);
        let target = AxialCoord::new(0, 1);
        let pos = target.to_world(1.0) + Vec3::new(0.1, -0.1, 0.0);
        assert_eq!(resolve_attachment(&board, pos, 1.0, AxialCoord::ORIGIN).unwrap(), target);
    }

    #[test]
    fn occupied_snap_falls_back_to_first_free_neighbor_of_other() {
        let mut board = Board::new();
        let other = AxialCoord::ORIGIN;
        place(&mut board, 0, other);
        // The cell the projectile snaps to is already taken.
        let snapped = AxialCoord::new(0, 1);
        place(&mut board, 1, snapped);

        let pos = snapped.to_world(1.0) + Vec3::new(0.05, 0.05, 0.0);
        let coord = resolve_attachment(&board, pos, 1.0, other).unwrap();
        assert_eq!(coord, other + AxialCoord::new(1, 0));
    }

    #[test]
    fn first_fit_follows_direction_order() {
        let mut board = Board::new();
        let other = AxialCoord::new(2, 2);
        place(&mut board, 0, other);
        place(&mut board, 1, other + DIRECTIONS[0]);
        place(&mut board, 2, other + DIRECTIONS[1]);
        // Snap onto `other` itself.
        let pos = other.to_world(1.0);
        let coord = resolve_attachment(&board, pos, 1.0, other).unwrap();
        assert_eq!(coord, other + DIRECTIONS[2]);
    }

    #[test]
    fn surrounded_cell_is_rejected() {
        let mut board = Board::new();
        let other = AxialCoord::ORIGIN;
        place(&mut board, 0, other);
        for (i, n) in other.neighbors().into_iter().enumerate() {
            place(&mut board, i as u32 + 1, n);
        }
        let before = board.len();

        let bubble = Bubble::new(BubbleId(99), BubbleColor::Blue, 1.0, other.to_world(1.0));
        let err = attach(&mut board, bubble, other).unwrap_err();
        assert!(matches!(err, EngineError::AllNeighborsOccupied(c) if c == other));
        assert_eq!(board.len(), before);
    }

    #[test]
    fn attach_snaps_position_and_sets_coords() {
        let mut board = Board::new();
        place(&mut board, 0, AxialCoord::ORIGIN);
        let pos = AxialCoord::new(1, 0).to_world(1.0) + Vec3::new(0.2, 0.1, 0.0);
        let bubble = Bubble::new(BubbleId(5), BubbleColor::Green, 1.0, pos);

        let coord = attach(&mut board, bubble, AxialCoord::ORIGIN).unwrap();
        assert_eq!(coord, AxialCoord::new(1, 0));
        let placed = board.get(coord).unwrap();
        assert_eq!(placed.id, BubbleId(5));
        assert_eq!(placed.grid_coords, Some(coord));
        assert_eq!(placed.position, coord.to_world(1.0));
    }

    #[test]
    fn nearest_colliding_bubble_is_chosen() {
        let mut board = Board::new();
        place(&mut board, 0, AxialCoord::ORIGIN);
        place(&mut board, 1, AxialCoord::new(1, 0));
        let near_second = AxialCoord::new(1, 0).to_world(1.0) + Vec3::new(0.3, -1.2, 0.0);
        let projectile = Bubble::new(BubbleId(7), BubbleColor::Red, 1.0, near_second);
        let hit = find_collision(&board, &projectile).unwrap();
        assert_eq!(hit.id, BubbleId(1));
    }

    #[test]
    fn no_collision_when_far_away() {
        let mut board = Board::new();
        place(&mut board, 0, AxialCoord::ORIGIN);
        let projectile = Bubble::new(BubbleId(7), BubbleColor::Red, 1.0, Vec3::new(0.0, -8.0, 0.0));
        assert!(find_collision(&board, &projectile).is_none());
    }

    #[test]
    fn attachments_never_overlap() {
        let mut board = Board::new();
        place(&mut board, 0, AxialCoord::ORIGIN);
        // Repeatedly fire at the same spot; every attachment must land in a new cell.
        for id in 1..=6 {
            let pos = AxialCoord::new(1, 0).to_world(1.0);
            let bubble = Bubble::new(BubbleId(id), BubbleColor::Blue, 1.0, pos);
            attach(&mut board, bubble, AxialCoord::ORIGIN).unwrap();
        }
        assert_eq!(board.len(), 7);
        let mut coords: Vec<_> = board.coords().collect();
        coords.sort();
        coords.dedup();
        assert_eq!(coords.len(), 7);
    }
}
