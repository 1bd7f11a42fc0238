#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid movement system that turns per-frame direction intent into paced steps.
//!
//! The engine owns the player's authoritative cell and a step cooldown. Each
//! tick drains the cooldown by the frame time and commits at most one step,
//! so slow frames never translate into multi-cell jumps.

use std::time::Duration;

use maze_sprint_core::{
    CellCoord, CellKind, Collectibles, DirectionIntent, Maze, MovementEvent, MOVE_COOLDOWN,
};

/// Reason a step attempt was absorbed without moving the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RejectedMove {
    /// The candidate cell lies outside the maze grid.
    OutOfBounds,
    /// The candidate cell is a wall.
    Wall,
}

/// Result of a single movement tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// No direction was requested.
    Idle,
    /// A direction was requested while the cooldown was still draining.
    CoolingDown,
    /// The requested step was illegal; the cooldown stays at zero.
    Rejected(RejectedMove),
    /// The player moved to the contained cell.
    Committed(CellCoord),
}

/// Paced grid movement for a single player.
#[derive(Clone, Debug)]
pub struct MovementEngine {
    player: CellCoord,
    cooldown: Duration,
    step_interval: Duration,
}

impl MovementEngine {
    /// Creates an engine with the player on `start` and the default step interval.
    #[must_use]
    pub fn new(start: CellCoord) -> Self {
        Self::with_step_interval(start, MOVE_COOLDOWN)
    }

    /// Creates an engine with an explicit minimum time between steps.
    #[must_use]
    pub fn with_step_interval(start: CellCoord, step_interval: Duration) -> Self {
        Self {
            player: start,
            cooldown: Duration::ZERO,
            step_interval,
        }
    }

    /// Cell currently occupied by the player.
    #[must_use]
    pub const fn player(&self) -> CellCoord {
        self.player
    }

    /// Time left before another step may be committed.
    #[must_use]
    pub const fn cooldown_remaining(&self) -> Duration {
        self.cooldown
    }

    /// Cooldown applied after every committed step.
    #[must_use]
    pub const fn step_interval(&self) -> Duration {
        self.step_interval
    }

    /// Advances the engine by `dt` and applies `intent` when the cooldown allows.
    ///
    /// A committed step pushes [`MovementEvent::Moved`] followed by
    /// [`MovementEvent::CollectiblePicked`] when an uncollected pickup sits on
    /// the new cell and [`MovementEvent::CoreReached`] when the cell is the core.
    pub fn tick(
        &mut self,
        dt: Duration,
        intent: DirectionIntent,
        maze: &Maze,
        collectibles: &mut Collectibles,
        out: &mut Vec<MovementEvent>,
    ) -> StepOutcome {
        self.cooldown = self.cooldown.saturating_sub(dt);

        let Some(direction) = intent else {
            return StepOutcome::Idle;
        };
        if !self.cooldown.is_zero() {
            return StepOutcome::CoolingDown;
        }

        let candidate = match validate(maze, self.player.step(direction)) {
            Ok(candidate) => candidate,
            Err(reason) => return StepOutcome::Rejected(reason),
        };

        let from = self.player;
        self.player = candidate;
        self.cooldown = self.step_interval;
        out.push(MovementEvent::Moved {
            from,
            to: candidate,
        });

        if collectibles.collect_at(candidate) {
            out.push(MovementEvent::CollectiblePicked { cell: candidate });
        }

        if maze.kind(candidate) == Some(CellKind::Core) {
            out.push(MovementEvent::CoreReached { cell: candidate });
        }

        StepOutcome::Committed(candidate)
    }
}

fn validate(maze: &Maze, candidate: Option<CellCoord>) -> Result<CellCoord, RejectedMove> {
    let candidate = candidate.ok_or(RejectedMove::OutOfBounds)?;
    match maze.kind(candidate) {
        None => Err(RejectedMove::OutOfBounds),
        Some(CellKind::Wall) => Err(RejectedMove::Wall),
        Some(CellKind::Path | CellKind::Core) => Ok(candidate),
    }
}
