//! Cluster detection - finding and popping matching bubbles.
//!
//! Two flood fills over the board:
//! - same-color groups around a freshly attached bubble (cleared at 3+)
//! - everything still connected to the anchor line (the rest drops)

use std::collections::{HashSet, VecDeque};

use bevy::prelude::*;

use super::{bubble::Bubble, grid::Board, hex::AxialCoord};

/// Minimum cluster size to pop (match-3).
pub const MIN_CLUSTER_SIZE: usize = 3;

/// All bubbles connected to `seed` through neighbors of the seed's color.
///
/// The result includes the seed and is sorted by coordinate. Empty when
/// `seed` is not on the board.
pub fn find_match(board: &Board, seed: AxialCoord) -> Vec<AxialCoord> {
    let Some(target_color) = board.get(seed).map(|b| b.color) else {
        return Vec::new();
    };

    let mut cluster = Vec::new();
    let mut visited = HashSet::new();
    let mut stack = vec![seed];
    visited.insert(seed);

    while let Some(coord) = stack.pop() {
        cluster.push(coord);
        for neighbor in board.neighbors(coord) {
            let Some(n) = neighbor.grid_coords else {
                continue;
            };
            if neighbor.color == target_color && visited.insert(n) {
                stack.push(n);
            }
        }
    }

    cluster.sort();
    cluster
}

/// Remove the seed's same-color group if it has at least `min_size` members.
///
/// Returns the removed bubbles; smaller groups are left untouched.
pub fn clear_match(board: &mut Board, seed: AxialCoord, min_size: usize) -> Vec<Bubble> {
    let cluster = find_match(board, seed);
    if cluster.len() < min_size {
        debug!("Group of {} at {} is below the match size", cluster.len(), seed);
        return Vec::new();
    }

    info!("Found cluster of {} bubbles at {}", cluster.len(), seed);
    cluster.into_iter().filter_map(|c| board.remove(c)).collect()
}

/// Find all bubbles connected to the anchor line using BFS.
pub fn find_anchored(board: &Board, anchor_row: i32) -> HashSet<AxialCoord> {
    let mut anchored = HashSet::new();
    let mut queue = VecDeque::new();

    for coord in board.anchor_coords(anchor_row) {
        anchored.insert(coord);
        queue.push_back(coord);
    }

    while let Some(coord) = queue.pop_front() {
        for neighbor in coord.neighbors() {
            if board.has(neighbor) && anchored.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    anchored
}

/// Remove every bubble with no path to the anchor line.
///
/// With an empty anchor line nothing is anchored and the whole board drops.
/// Returned bubbles are sorted by coordinate.
pub fn prune_disconnected(board: &mut Board, anchor_row: i32) -> Vec<Bubble> {
    let anchored = find_anchored(board, anchor_row);
    let mut floating: Vec<AxialCoord> = board.coords().filter(|c| !anchored.contains(c)).collect();
    floating.sort();

    if !floating.is_empty() {
        info!("Found {} floating bubbles to remove", floating.len());
    }

    floating.into_iter().filter_map(|c| board.remove(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::bubble::{BubbleColor, BubbleId};
    use BubbleColor::{Blue, Red};

    fn board_with(cells: &[(i32, i32, BubbleColor)]) -> Board {
        let mut board = Board::new();
        for (i, &(q, r, color)) in cells.iter().enumerate() {
            board
                .place(Bubble::placed(BubbleId(i as u32), color, 1.0, AxialCoord::new(q, r)))
                .unwrap();
        }
        board
    }

    #[test]
    fn pair_is_not_cleared() {
        let mut board = board_with(&[(0, 0, Red), (0, 1, Red)]);
        assert_eq!(find_match(&board, AxialCoord::new(0, 1)).len(), 2);
        assert!(clear_match(&mut board, AxialCoord::new(0, 1), MIN_CLUSTER_SIZE).is_empty());
        assert_eq!(board.len(), 2);
    }

    #[test]
    fn triangle_of_three_is_cleared() {
        // (1,0) and (0,1) differ by (-1, 1), so all three touch.
        let mut board = board_with(&[(0, 0, Red), (1, 0, Red), (0, 1, Red)]);
        let cleared = clear_match(&mut board, AxialCoord::new(0, 0), MIN_CLUSTER_SIZE);
        assert_eq!(cleared.len(), 3);
        assert!(board.is_empty());
    }

    #[test]
    fn match_stops_at_other_colors() {
        let board = board_with(&[
            (0, 0, Red),
            (1, 0, Red),
            (2, 0, Blue),
            (3, 0, Red),
            (0, 1, Red),
        ]);
        let group = find_match(&board, AxialCoord::new(0, 0));
        assert_eq!(
            group,
            vec![AxialCoord::new(0, 0), AxialCoord::new(0, 1), AxialCoord::new(1, 0)]
        );
    }

    #[test]
    fn match_from_missing_seed_is_empty() {
        let board = board_with(&[(0, 0, Red)]);
        assert!(find_match(&board, AxialCoord::new(5, 5)).is_empty());
    }

    #[test]
    fn chain_of_same_color_is_found_whole() {
        let cells: Vec<_> = (0..8).map(|q| (q, 0, Red)).collect();
        let board = board_with(&cells);
        assert_eq!(find_match(&board, AxialCoord::new(7, 0)).len(), 8);
    }

    #[test]
    fn cut_off_group_drops() {
        // Anchor (0,0), connector (0,1), and a column of four above it.
        let mut board = board_with(&[
            (0, 0, Red),
            (0, 1, Blue),
            (0, 2, Red),
            (0, 3, Blue),
            (0, 4, Red),
            (0, 5, Blue),
        ]);
        assert!(prune_disconnected(&mut board, 0).is_empty());

        board.remove(AxialCoord::new(0, 1));
        let dropped = prune_disconnected(&mut board, 0);
        let coords: Vec<_> = dropped.iter().filter_map(|b| b.grid_coords).collect();
        assert_eq!(
            coords,
            vec![
                AxialCoord::new(0, 2),
                AxialCoord::new(0, 3),
                AxialCoord::new(0, 4),
                AxialCoord::new(0, 5)
            ]
        );
        assert_eq!(board.len(), 1);
        assert!(board.has(AxialCoord::new(0, 0)));
    }

    #[test]
    fn empty_anchor_line_drops_everything() {
        let mut board = board_with(&[(0, 1, Red), (0, 2, Red), (1, 1, Blue)]);
        let dropped = prune_disconnected(&mut board, 0);
        assert_eq!(dropped.len(), 3);
        assert!(board.is_empty());
    }

    #[test]
    fn remaining_bubbles_reach_the_anchor_line() {
        let mut board = board_with(&[
            (-1, 0, Red),
            (0, 0, Red),
            (-1, 1, Blue),
            (-1, 2, Blue),
            (3, 3, Red),
            (4, 3, Red),
            (2, 1, Blue),
        ]);
        prune_disconnected(&mut board, 0);
        let anchored = find_anchored(&board, 0);
        assert!(board.coords().all(|c| anchored.contains(&c)));
        assert_eq!(board.len(), 4);
    }
}
