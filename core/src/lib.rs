#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Sprint engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative game session, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the session executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values that observers
//! (audio, UI, analytics) react to. Systems never mutate the session directly.

use std::{collections::BTreeSet, fmt, str::FromStr, time::Duration, time::Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Banner revealed to the player once the core has been reached.
pub const VICTORY_BANNER: &str = "CYNET – COMING SOON 2026";

/// Smallest maze side length accepted by the generator.
pub const MIN_MAZE_SIDE: u32 = 5;

/// Maze side length used when no explicit size is configured.
pub const DEFAULT_MAZE_SIDE: u32 = 11;

/// Minimum simulated time between two committed player steps.
pub const MOVE_COOLDOWN: Duration = Duration::from_millis(150);

/// Points awarded the moment a collectible is picked up.
pub const PICKUP_AWARD: u32 = 500;

/// Phases of a single game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Assets are loading and the progress bar is visible.
    Loading,
    /// The player is choosing an avatar.
    Selecting,
    /// The maze is live and the player is navigating it.
    Playing,
    /// The core was reached; the session is complete.
    Victory,
}

/// Avatars the player can pick before entering the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Character {
    /// Boxy robot avatar.
    Robot,
    /// Small car avatar.
    Car,
}

impl Character {
    /// Every selectable avatar in picker order.
    pub const ALL: [Character; 2] = [Character::Robot, Character::Car];

    /// Stable identifier used by pickers and configuration files.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Robot => "robot",
            Self::Car => "car",
        }
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Raised when a character identifier does not name a known avatar.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown character `{0}`")]
pub struct UnknownCharacter(pub String);

impl FromStr for Character {
    type Err = UnknownCharacter;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|character| character.id() == normalized)
            .ok_or_else(|| UnknownCharacter(value.to_owned()))
    }
}

/// Cardinal movement directions on the maze grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction, listed in input precedence order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Column and row delta of a single step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Discretized movement signal sampled once per tick; `None` means idle.
pub type DirectionIntent = Option<Direction>;

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Returns the adjacent cell in `direction`, or `None` when the step
    /// would leave the non-negative coordinate space.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let (dx, dy) = direction.offset();
        let column = u32::try_from(i64::from(self.column) + dx).ok()?;
        let row = u32::try_from(i64::from(self.row) + dy).ok()?;
        Some(Self::new(column, row))
    }

    /// Direction leading from `self` to an orthogonally adjacent `to`.
    #[must_use]
    pub fn direction_to(self, to: CellCoord) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|direction| self.step(*direction) == Some(to))
    }
}

/// Kind of a single maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Impassable cell.
    Wall,
    /// Traversable corridor cell.
    Path,
    /// The single traversable goal cell.
    Core,
}

impl CellKind {
    /// Reports whether the player may occupy a cell of this kind.
    #[must_use]
    pub const fn is_traversable(self) -> bool {
        !matches!(self, Self::Wall)
    }
}

/// Reasons an ASCII maze layout may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MazeLayoutError {
    /// The layout contained no rows or an empty first row.
    #[error("maze layout is empty")]
    Empty,
    /// A row's length differed from the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width established by the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// The layout used a glyph outside `#`, `.`, `S` and `C`.
    #[error("unexpected glyph `{glyph}` at column {column}, row {row}")]
    UnknownGlyph {
        /// Offending character.
        glyph: char,
        /// Column of the offending character.
        column: u32,
        /// Row of the offending character.
        row: u32,
    },
    /// The layout did not mark exactly one start cell.
    #[error("expected exactly one start cell, found {0}")]
    StartCount(usize),
    /// The layout did not mark exactly one core cell.
    #[error("expected exactly one core cell, found {0}")]
    CoreCount(usize),
}

/// Static layout of a maze: its grid of cell kinds plus start and goal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    width: u32,
    height: u32,
    cells: Vec<CellKind>,
    start: CellCoord,
    end: CellCoord,
}

impl Maze {
    /// Assembles a maze from a row-major cell buffer.
    ///
    /// The caller upholds the layout invariants: `cells` holds `width * height`
    /// entries and `end` is the only core cell. Cells missing from the buffer
    /// read as walls.
    #[must_use]
    pub fn from_parts(
        width: u32,
        height: u32,
        cells: Vec<CellKind>,
        start: CellCoord,
        end: CellCoord,
    ) -> Self {
        Self {
            width,
            height,
            cells,
            start,
            end,
        }
    }

    /// Parses a maze from rows of `#` (wall), `.` (path), `S` (start) and `C` (core).
    pub fn from_ascii<S: AsRef<str>>(rows: &[S]) -> Result<Self, MazeLayoutError> {
        let expected = rows
            .first()
            .map(|row| row.as_ref().chars().count())
            .filter(|width| *width > 0)
            .ok_or(MazeLayoutError::Empty)?;

        let mut cells = Vec::with_capacity(expected * rows.len());
        let mut starts = Vec::new();
        let mut cores = Vec::new();

        for (row_index, row) in rows.iter().enumerate() {
            let found = row.as_ref().chars().count();
            if found != expected {
                return Err(MazeLayoutError::Ragged {
                    row: row_index,
                    expected,
                    found,
                });
            }

            for (column_index, glyph) in row.as_ref().chars().enumerate() {
                let cell = CellCoord::new(column_index as u32, row_index as u32);
                let kind = match glyph {
                    '#' => CellKind::Wall,
                    '.' => CellKind::Path,
                    'S' => {
                        starts.push(cell);
                        CellKind::Path
                    }
                    'C' => {
                        cores.push(cell);
                        CellKind::Core
                    }
                    other => {
                        return Err(MazeLayoutError::UnknownGlyph {
                            glyph: other,
                            column: cell.column(),
                            row: cell.row(),
                        })
                    }
                };
                cells.push(kind);
            }
        }

        let &[start] = starts.as_slice() else {
            return Err(MazeLayoutError::StartCount(starts.len()));
        };
        let &[end] = cores.as_slice() else {
            return Err(MazeLayoutError::CoreCount(cores.len()));
        };

        Ok(Self::from_parts(
            expected as u32,
            rows.len() as u32,
            cells,
            start,
            end,
        ))
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Cell the player occupies when the session starts.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Coordinate of the core (goal) cell.
    #[must_use]
    pub const fn end(&self) -> CellCoord {
        self.end
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    /// Kind of the cell at `cell`, or `None` outside the grid.
    #[must_use]
    pub fn kind(&self, cell: CellCoord) -> Option<CellKind> {
        if !self.contains(cell) {
            return None;
        }
        let index = cell.row() as usize * self.width as usize + cell.column() as usize;
        Some(self.cells.get(index).copied().unwrap_or(CellKind::Wall))
    }

    /// Reports whether the player may stand on `cell`.
    #[must_use]
    pub fn is_traversable(&self, cell: CellCoord) -> bool {
        self.kind(cell).map_or(false, CellKind::is_traversable)
    }

    /// Row-major view of every cell in the grid.
    #[must_use]
    pub fn cells(&self) -> &[CellKind] {
        &self.cells
    }

    /// Iterator over every cell coordinate paired with its kind.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, CellKind)> + '_ {
        let width = self.width.max(1);
        self.cells.iter().enumerate().map(move |(index, kind)| {
            let index = index as u32;
            (CellCoord::new(index % width, index / width), *kind)
        })
    }

    /// Traversable neighbours of `cell` in direction precedence order.
    pub fn open_neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| cell.step(direction))
            .filter(|neighbor| self.is_traversable(*neighbor))
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            for column in 0..self.width {
                let cell = CellCoord::new(column, row);
                let glyph = match self.kind(cell) {
                    Some(CellKind::Core) => 'C',
                    _ if cell == self.start => 'S',
                    Some(CellKind::Path) => '.',
                    _ => '#',
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Optional pickup placed on a path cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Collectible {
    cell: CellCoord,
    collected: bool,
}

impl Collectible {
    /// Creates an uncollected pickup at `cell`.
    #[must_use]
    pub const fn new(cell: CellCoord) -> Self {
        Self {
            cell,
            collected: false,
        }
    }

    /// Cell hosting the pickup.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Reports whether the pickup has been collected.
    #[must_use]
    pub const fn collected(&self) -> bool {
        self.collected
    }
}

/// Live set of pickups for a session. Items are never removed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collectibles {
    items: Vec<Collectible>,
}

impl Collectibles {
    /// Places an uncollected pickup on each provided cell.
    ///
    /// A cell holds at most one pickup; repeated cells are dropped.
    #[must_use]
    pub fn new<I>(cells: I) -> Self
    where
        I: IntoIterator<Item = CellCoord>,
    {
        let mut seen = BTreeSet::new();
        Self {
            items: cells
                .into_iter()
                .filter(|cell| seen.insert(*cell))
                .map(Collectible::new)
                .collect(),
        }
    }

    /// Iterator over every pickup, collected or not.
    pub fn iter(&self) -> impl Iterator<Item = &Collectible> {
        self.items.iter()
    }

    /// Total number of pickups placed in the session.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Reports whether no pickups were placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of pickups already collected.
    #[must_use]
    pub fn collected_count(&self) -> usize {
        self.items.iter().filter(|item| item.collected).count()
    }

    /// Uncollected pickup at `cell`, if any.
    #[must_use]
    pub fn uncollected_at(&self, cell: CellCoord) -> Option<&Collectible> {
        self.items
            .iter()
            .find(|item| item.cell == cell && !item.collected)
    }

    /// Marks the pickup at `cell` as collected.
    ///
    /// Returns `true` only when an uncollected pickup was found; revisiting an
    /// already collected cell is a no-op.
    pub fn collect_at(&mut self, cell: CellCoord) -> bool {
        match self
            .items
            .iter_mut()
            .find(|item| item.cell == cell && !item.collected)
        {
            Some(item) => {
                item.collected = true;
                true
            }
            None => false,
        }
    }
}

/// Read model of the session statistics exposed to UI collaborators.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    /// Wall-clock time spent playing, as of the last sample.
    pub elapsed: Duration,
    /// Accumulated score.
    pub score: u32,
    /// Number of committed steps.
    pub moves: u32,
    /// Number of pickups collected so far.
    pub collectibles_collected: u32,
    /// Number of pickups placed in the maze.
    pub total_collectibles: u32,
}

/// Bonus awarded when the core is reached, split into its components.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Bonus that decays with elapsed whole seconds.
    pub time_bonus: u32,
    /// Bonus proportional to the collected pickups.
    pub collectible_bonus: u32,
    /// Bonus that decays with committed moves.
    pub move_bonus: u32,
}

impl ScoreBreakdown {
    /// Sum of every bonus component.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.time_bonus
            .saturating_add(self.collectible_bonus)
            .saturating_add(self.move_bonus)
    }
}

/// Events raised by the movement engine while the player navigates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MovementEvent {
    /// The player committed a step between two adjacent cells.
    Moved {
        /// Cell occupied before the step.
        from: CellCoord,
        /// Cell occupied after the step.
        to: CellCoord,
    },
    /// The player stepped onto an uncollected pickup.
    CollectiblePicked {
        /// Cell hosting the pickup.
        cell: CellCoord,
    },
    /// The player stepped onto the core.
    CoreReached {
        /// Coordinate of the core.
        cell: CellCoord,
    },
}

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Reports loading progress from the external asset loader.
    ReportLoadingProgress {
        /// Progress percentage; clamped to `0..=100`.
        percent: f32,
        /// Wall-clock instant the progress was observed.
        now: Instant,
    },
    /// Wall-clock pulse that drives session timers independently of frames.
    AdvanceClock {
        /// Current wall-clock instant.
        now: Instant,
    },
    /// The player picked an avatar on the selection screen.
    SelectCharacter {
        /// Chosen avatar.
        character: Character,
        /// Wall-clock instant of the selection.
        now: Instant,
    },
    /// Advances the frame clock and samples the player's direction intent.
    Tick {
        /// Frame time that elapsed since the previous tick.
        dt: Duration,
        /// Direction intent produced by the input mapper for this frame.
        intent: DirectionIntent,
    },
    /// Discards the session and starts a fresh one from loading.
    ResetSession,
}

/// Events broadcast by the session after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The session entered a new state.
    SessionStateChanged {
        /// State before the transition.
        from: SessionState,
        /// State after the transition.
        to: SessionState,
    },
    /// Loading progress advanced.
    LoadingProgressed {
        /// Current progress percentage.
        percent: f32,
    },
    /// The player confirmed an avatar; the first confirmed user interaction.
    CharacterSelected {
        /// Chosen avatar.
        character: Character,
    },
    /// Forwarded movement engine event.
    Movement(MovementEvent),
    /// The score changed.
    ScoreChanged {
        /// Score after the change.
        score: u32,
    },
    /// The elapsed-time sampler refreshed the play time.
    ElapsedSampled {
        /// Play time at the sample.
        elapsed: Duration,
    },
    /// The core was reached and the final score settled.
    SessionCompleted {
        /// Bonus awarded on completion.
        breakdown: ScoreBreakdown,
        /// Final statistics including the bonus.
        stats: GameStats,
    },
    /// The previous session was discarded and a new one generated.
    SessionReset,
}

/// Collaborator that reacts to the event batch produced by a tick.
pub trait EventObserver {
    /// Receives every event produced since the previous delivery.
    fn observe(&mut self, events: &[Event]);
}
