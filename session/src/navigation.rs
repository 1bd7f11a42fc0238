//! Breadth-first route planning over a maze's traversable cells.

use std::collections::VecDeque;

use maze_sprint_core::{CellCoord, CellKind, Maze};

/// Shortest route from `from` to `to`, excluding `from` and ending on `to`.
///
/// The core ends a session, so it is only entered as the destination. Returns
/// `None` when `to` cannot be reached and an empty route when both cells
/// coincide.
#[must_use]
pub fn shortest_path(maze: &Maze, from: CellCoord, to: CellCoord) -> Option<Vec<CellCoord>> {
    if !maze.is_traversable(from) || !maze.is_traversable(to) {
        return None;
    }
    if from == to {
        return Some(Vec::new());
    }

    let width = maze.width() as usize;
    let index = |cell: CellCoord| cell.row() as usize * width + cell.column() as usize;
    let mut parents: Vec<Option<CellCoord>> = vec![None; maze.cells().len()];
    let mut visited = vec![false; maze.cells().len()];
    let mut queue = VecDeque::from([from]);
    visited[index(from)] = true;

    while let Some(cell) = queue.pop_front() {
        if cell == to {
            break;
        }
        for neighbor in maze.open_neighbors(cell) {
            let slot = index(neighbor);
            if visited[slot] || (neighbor != to && maze.kind(neighbor) == Some(CellKind::Core)) {
                continue;
            }
            visited[slot] = true;
            parents[slot] = Some(cell);
            queue.push_back(neighbor);
        }
    }

    if !visited[index(to)] {
        return None;
    }

    let mut route = vec![to];
    let mut cursor = to;
    while let Some(parent) = parents[index(cursor)] {
        if parent == from {
            break;
        }
        route.push(parent);
        cursor = parent;
    }
    route.reverse();
    Some(route)
}
