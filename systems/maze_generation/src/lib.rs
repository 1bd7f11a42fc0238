#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Maze generation system that carves perfect mazes around a central core.
//!
//! Carving walks the lattice of odd coordinates depth-first, visiting every
//! odd cell exactly once, so the resulting corridors form a spanning tree.
//! The walk keeps its own frame stack instead of recursing, which keeps the
//! depth bounded by the heap rather than the thread's call stack.

use maze_sprint_core::{CellCoord, CellKind, Maze, MIN_MAZE_SIDE};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Cell where every generated maze starts.
pub const START_CELL: CellCoord = CellCoord::new(1, 1);

const CARVE_OFFSETS: [(i64, i64); 4] = [(0, 2), (2, 0), (0, -2), (-2, 0)];

/// Seeded maze generator producing reproducible layouts.
#[derive(Clone, Debug)]
pub struct MazeGenerator {
    rng: ChaCha8Rng,
}

impl MazeGenerator {
    /// Creates a generator whose layouts are fully determined by `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Generates the next maze in this generator's sequence.
    pub fn generate(&mut self, width: u32, height: u32) -> Maze {
        generate(width, height, &mut self.rng)
    }

    /// Random source shared with follow-up layout decisions such as pickup placement.
    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }
}

/// Rounds a requested side length up to the nearest odd value of at least five.
#[must_use]
pub fn clamp_side(side: u32) -> u32 {
    let side = side.max(MIN_MAZE_SIDE);
    if side % 2 == 0 {
        side.saturating_add(1)
    } else {
        side
    }
}

/// Generates a maze of (clamped) `width` x `height` cells.
///
/// The start is fixed at `(1, 1)`. A 3x3 block around the grid centre is
/// forced open and its middle cell becomes the core, which is returned as
/// [`Maze::end`].
pub fn generate<R>(width: u32, height: u32, rng: &mut R) -> Maze
where
    R: Rng + ?Sized,
{
    let width = clamp_side(width);
    let height = clamp_side(height);

    let mut grid = Grid::walled(width, height);
    carve(&mut grid, START_CELL, rng);

    let center = CellCoord::new(width / 2, height / 2);
    grid.open_block(center);
    grid.set(center, CellKind::Core);

    Maze::from_parts(width, height, grid.cells, START_CELL, center)
}

fn carve<R>(grid: &mut Grid, origin: CellCoord, rng: &mut R)
where
    R: Rng + ?Sized,
{
    grid.set(origin, CellKind::Path);
    let mut stack = vec![Frame::enter(origin, rng)];

    while let Some(frame) = stack.last_mut() {
        let Some((dx, dy)) = frame.next_offset() else {
            let _ = stack.pop();
            continue;
        };
        let cell = frame.cell;

        let Some(neighbor) = grid.interior_offset(cell, dx, dy) else {
            continue;
        };
        if grid.get(neighbor) != CellKind::Wall {
            continue;
        }

        let midpoint = CellCoord::new(
            (cell.column() + neighbor.column()) / 2,
            (cell.row() + neighbor.row()) / 2,
        );
        grid.set(midpoint, CellKind::Path);
        grid.set(neighbor, CellKind::Path);
        stack.push(Frame::enter(neighbor, rng));
    }
}

#[derive(Debug)]
struct Frame {
    cell: CellCoord,
    offsets: [(i64, i64); 4],
    cursor: usize,
}

impl Frame {
    fn enter<R>(cell: CellCoord, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut offsets = CARVE_OFFSETS;
        offsets.shuffle(rng);
        Self {
            cell,
            offsets,
            cursor: 0,
        }
    }

    fn next_offset(&mut self) -> Option<(i64, i64)> {
        let offset = self.offsets.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(offset)
    }
}

#[derive(Debug)]
struct Grid {
    width: u32,
    height: u32,
    cells: Vec<CellKind>,
}

impl Grid {
    fn walled(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![CellKind::Wall; len],
        }
    }

    fn index(&self, cell: CellCoord) -> usize {
        cell.row() as usize * self.width as usize + cell.column() as usize
    }

    fn get(&self, cell: CellCoord) -> CellKind {
        self.cells
            .get(self.index(cell))
            .copied()
            .unwrap_or(CellKind::Wall)
    }

    fn set(&mut self, cell: CellCoord, kind: CellKind) {
        let index = self.index(cell);
        if let Some(slot) = self.cells.get_mut(index) {
            *slot = kind;
        }
    }

    fn is_interior(&self, column: i64, row: i64) -> bool {
        column > 0
            && column < i64::from(self.width) - 1
            && row > 0
            && row < i64::from(self.height) - 1
    }

    fn interior_offset(&self, cell: CellCoord, dx: i64, dy: i64) -> Option<CellCoord> {
        let column = i64::from(cell.column()) + dx;
        let row = i64::from(cell.row()) + dy;
        if !self.is_interior(column, row) {
            return None;
        }
        Some(CellCoord::new(
            u32::try_from(column).ok()?,
            u32::try_from(row).ok()?,
        ))
    }

    fn open_block(&mut self, center: CellCoord) {
        let center_column = i64::from(center.column());
        let center_row = i64::from(center.row());
        for row in center_row - 1..=center_row + 1 {
            for column in center_column - 1..=center_column + 1 {
                if let Some(cell) = self.interior_offset(CellCoord::new(0, 0), column, row) {
                    self.set(cell, CellKind::Path);
                }
            }
        }
    }
}
