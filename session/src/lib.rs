#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state for Maze Sprint.
//!
//! A [`GameSession`] is mutated exclusively through [`apply`], which consumes
//! a [`Command`] and appends the resulting [`Event`]s. Read access goes through
//! the functions in [`query`].

mod config;
mod navigation;
mod observers;
mod timers;

use std::time::{Duration, Instant};

use maze_sprint_core::{
    CellCoord, CellKind, Character, Collectibles, Command, DirectionIntent, Event, GameStats, Maze,
    MovementEvent, SessionState, PICKUP_AWARD,
};
use maze_sprint_system_maze_generation::MazeGenerator;
use maze_sprint_system_movement::{MovementEngine, StepOutcome};
use maze_sprint_system_scoring::bonus_score;
use rand::{seq::SliceRandom, Rng};
use tracing::{debug, info, trace};

pub use config::SessionConfig;
pub use navigation::shortest_path;
pub use observers::Observers;

use timers::{IntervalSampler, SettleTimer};

const FULL_PROGRESS: f32 = 100.0;

/// Progress tracked while assets load.
#[derive(Clone, Copy, Debug, Default)]
struct LoadingPhase {
    progress: f32,
    settle: Option<SettleTimer>,
}

/// Clock running while the player navigates.
#[derive(Clone, Copy, Debug)]
struct PlayClock {
    started_at: Instant,
    sampler: IntervalSampler,
}

/// Session phase together with the timers it owns.
#[derive(Clone, Copy, Debug)]
enum Phase {
    Loading(LoadingPhase),
    Selecting,
    Playing(PlayClock),
    Victory,
}

impl Phase {
    const fn state(&self) -> SessionState {
        match self {
            Phase::Loading(_) => SessionState::Loading,
            Phase::Selecting => SessionState::Selecting,
            Phase::Playing(_) => SessionState::Playing,
            Phase::Victory => SessionState::Victory,
        }
    }
}

/// Represents one run of the minigame from loading to victory.
#[derive(Debug)]
pub struct GameSession {
    config: SessionConfig,
    generator: MazeGenerator,
    maze: Maze,
    collectibles: Collectibles,
    movement: MovementEngine,
    stats: GameStats,
    character: Option<Character>,
    phase: Phase,
}

impl GameSession {
    /// Creates a session with a freshly generated maze, starting in loading.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let mut generator = MazeGenerator::new(config.seed);
        let maze = generator.generate(config.maze_width, config.maze_height);
        let pickups = place_collectibles(&maze, &config, generator.rng_mut());
        Self::assemble(config, generator, maze, pickups)
    }

    /// Creates a session around a fixed layout and pickup placement.
    ///
    /// Pickups on wall cells, on the start or on the core are discarded.
    /// Resetting the session afterwards generates a maze from `config`.
    #[must_use]
    pub fn with_layout(config: SessionConfig, maze: Maze, pickups: Vec<CellCoord>) -> Self {
        let generator = MazeGenerator::new(config.seed);
        let pickups = pickups
            .into_iter()
            .filter(|cell| *cell != maze.start() && maze.kind(*cell) == Some(CellKind::Path))
            .collect();
        Self::assemble(config, generator, maze, pickups)
    }

    fn assemble(
        config: SessionConfig,
        generator: MazeGenerator,
        maze: Maze,
        pickups: Vec<CellCoord>,
    ) -> Self {
        let collectibles = Collectibles::new(pickups);
        let movement = MovementEngine::with_step_interval(maze.start(), config.move_cooldown());
        let stats = GameStats {
            total_collectibles: collectibles.len() as u32,
            ..GameStats::default()
        };
        debug!(
            width = maze.width(),
            height = maze.height(),
            collectibles = collectibles.len(),
            "session assembled"
        );
        Self {
            config,
            generator,
            maze,
            collectibles,
            movement,
            stats,
            character: None,
            phase: Phase::Loading(LoadingPhase::default()),
        }
    }

    fn enter(&mut self, phase: Phase, out_events: &mut Vec<Event>) {
        let from = self.phase.state();
        let to = phase.state();
        self.phase = phase;
        if from != to {
            info!(?from, ?to, "session state changed");
            out_events.push(Event::SessionStateChanged { from, to });
        }
    }

    fn report_progress(&mut self, percent: f32, now: Instant, out_events: &mut Vec<Event>) {
        let Phase::Loading(loading) = &mut self.phase else {
            debug!(percent, "loading progress ignored outside loading");
            return;
        };

        let clamped = if percent.is_nan() {
            0.0
        } else {
            percent.clamp(0.0, FULL_PROGRESS)
        };
        if clamped <= loading.progress {
            return;
        }

        loading.progress = clamped;
        out_events.push(Event::LoadingProgressed { percent: clamped });

        if clamped >= FULL_PROGRESS && loading.settle.is_none() {
            loading.settle = Some(SettleTimer::start(now, self.config.loading_settle_delay()));
            debug!("loading complete; settle timer armed");
        }
    }

    fn advance_clock(&mut self, now: Instant, out_events: &mut Vec<Event>) {
        match &mut self.phase {
            Phase::Loading(loading) => {
                if loading.settle.is_some_and(|timer| timer.is_due(now)) {
                    self.enter(Phase::Selecting, out_events);
                }
            }
            Phase::Playing(clock) => {
                if clock.sampler.poll(now) {
                    let elapsed = now.saturating_duration_since(clock.started_at);
                    self.stats.elapsed = elapsed;
                    out_events.push(Event::ElapsedSampled { elapsed });
                }
            }
            Phase::Selecting | Phase::Victory => {}
        }
    }

    fn select_character(&mut self, character: Character, now: Instant, out_events: &mut Vec<Event>) {
        if !matches!(self.phase, Phase::Selecting) {
            debug!(%character, state = ?self.phase.state(), "selection ignored");
            return;
        }

        self.character = Some(character);
        out_events.push(Event::CharacterSelected { character });
        let clock = PlayClock {
            started_at: now,
            sampler: IntervalSampler::start(now, self.config.elapsed_sample_interval()),
        };
        self.enter(Phase::Playing(clock), out_events);
    }

    fn tick(
        &mut self,
        dt: Duration,
        intent: DirectionIntent,
        out_events: &mut Vec<Event>,
    ) {
        if !matches!(self.phase, Phase::Playing(_)) {
            return;
        }

        let mut movement_events = Vec::new();
        let outcome = self.movement.tick(
            dt,
            intent,
            &self.maze,
            &mut self.collectibles,
            &mut movement_events,
        );
        if let StepOutcome::Rejected(reason) = outcome {
            trace!(?reason, ?intent, "step rejected");
        }

        for event in movement_events {
            out_events.push(Event::Movement(event));
            self.react(event, out_events);
        }
    }

    fn react(&mut self, event: MovementEvent, out_events: &mut Vec<Event>) {
        if !matches!(self.phase, Phase::Playing(_)) {
            debug!(?event, state = ?self.phase.state(), "movement event absorbed");
            return;
        }

        match event {
            MovementEvent::Moved { .. } => {
                self.stats.moves = self.stats.moves.saturating_add(1);
            }
            MovementEvent::CollectiblePicked { cell } => {
                self.stats.collectibles_collected =
                    self.stats.collectibles_collected.saturating_add(1);
                self.stats.score = self.stats.score.saturating_add(PICKUP_AWARD);
                debug!(?cell, "collectible picked");
                out_events.push(Event::ScoreChanged {
                    score: self.stats.score,
                });
            }
            MovementEvent::CoreReached { .. } => {
                let breakdown = bonus_score(
                    self.stats.elapsed,
                    self.stats.moves,
                    self.stats.collectibles_collected,
                );
                self.stats.score = self.stats.score.saturating_add(breakdown.total());
                self.enter(Phase::Victory, out_events);
                out_events.push(Event::ScoreChanged {
                    score: self.stats.score,
                });
                out_events.push(Event::SessionCompleted {
                    breakdown,
                    stats: self.stats,
                });
            }
        }
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        let maze = self
            .generator
            .generate(self.config.maze_width, self.config.maze_height);
        let pickups = place_collectibles(&maze, &self.config, self.generator.rng_mut());
        self.collectibles = Collectibles::new(pickups);
        self.movement =
            MovementEngine::with_step_interval(maze.start(), self.config.move_cooldown());
        self.maze = maze;
        self.stats = GameStats {
            total_collectibles: self.collectibles.len() as u32,
            ..GameStats::default()
        };
        self.character = None;

        out_events.push(Event::SessionReset);
        self.enter(Phase::Loading(LoadingPhase::default()), out_events);
    }
}

fn place_collectibles<R>(maze: &Maze, config: &SessionConfig, rng: &mut R) -> Vec<CellCoord>
where
    R: Rng + ?Sized,
{
    let candidates: Vec<CellCoord> = maze
        .iter()
        .filter(|(cell, kind)| *kind == CellKind::Path && *cell != maze.start())
        .map(|(cell, _)| cell)
        .collect();
    let wanted = rng.gen_range(config.collectible_range()) as usize;
    candidates
        .choose_multiple(rng, wanted.min(candidates.len()))
        .copied()
        .collect()
}

/// Applies the provided command to the session, mutating state deterministically.
///
/// Commands that do not apply to the current state are absorbed without effect.
pub fn apply(session: &mut GameSession, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ReportLoadingProgress { percent, now } => {
            session.report_progress(percent, now, out_events);
        }
        Command::AdvanceClock { now } => session.advance_clock(now, out_events),
        Command::SelectCharacter { character, now } => {
            session.select_character(character, now, out_events);
        }
        Command::Tick { dt, intent } => session.tick(dt, intent, out_events),
        Command::ResetSession => session.reset(out_events),
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use std::time::Duration;

    use super::{GameSession, LoadingPhase, Phase, SessionConfig};
    use maze_sprint_core::{CellCoord, Character, Collectibles, GameStats, Maze, SessionState};

    /// Timers currently held by the session.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ActiveTimers {
        /// The delay between loading completion and selection is pending.
        pub loading_settle: bool,
        /// The elapsed-time sampler is running.
        pub elapsed_sampler: bool,
    }

    /// Current session state.
    #[must_use]
    pub fn state(session: &GameSession) -> SessionState {
        session.phase.state()
    }

    /// Maze navigated in this session.
    #[must_use]
    pub fn maze(session: &GameSession) -> &Maze {
        &session.maze
    }

    /// Cell occupied by the player.
    #[must_use]
    pub fn player_cell(session: &GameSession) -> CellCoord {
        session.movement.player()
    }

    /// Pickups placed in this session.
    #[must_use]
    pub fn collectibles(session: &GameSession) -> &Collectibles {
        &session.collectibles
    }

    /// Snapshot of the running statistics.
    #[must_use]
    pub fn stats(session: &GameSession) -> GameStats {
        session.stats
    }

    /// Avatar chosen on the selection screen, if any.
    #[must_use]
    pub fn character(session: &GameSession) -> Option<Character> {
        session.character
    }

    /// Loading progress in percent; reads 100 once loading has finished.
    #[must_use]
    pub fn loading_progress(session: &GameSession) -> f32 {
        match session.phase {
            Phase::Loading(LoadingPhase { progress, .. }) => progress,
            Phase::Selecting | Phase::Playing(_) | Phase::Victory => super::FULL_PROGRESS,
        }
    }

    /// Reports which wall-clock timers are live.
    #[must_use]
    pub fn active_timers(session: &GameSession) -> ActiveTimers {
        match session.phase {
            Phase::Loading(LoadingPhase { settle, .. }) => ActiveTimers {
                loading_settle: settle.is_some(),
                elapsed_sampler: false,
            },
            Phase::Playing(_) => ActiveTimers {
                loading_settle: false,
                elapsed_sampler: true,
            },
            Phase::Selecting | Phase::Victory => ActiveTimers::default(),
        }
    }

    /// Time left before the player may step again.
    #[must_use]
    pub fn move_cooldown_remaining(session: &GameSession) -> Duration {
        session.movement.cooldown_remaining()
    }

    /// Configuration the session was created with.
    #[must_use]
    pub fn config(session: &GameSession) -> &SessionConfig {
        &session.config
    }
}
