//! Frame loop that plays one session from loading to victory.

use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use maze_sprint_core::{Character, Command, Event, GameStats, ScoreBreakdown, SessionState};
use maze_sprint_session::{apply, query, GameSession, Observers, SessionConfig};
use maze_sprint_system_effects::EffectEngine;
use maze_sprint_system_input::{DeviceClass, InputMapper};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::{
    autopilot::Autopilot,
    observers::{Hud, LogSink},
};

const LOADING_STEP_INTERVAL: Duration = Duration::from_millis(50);
const LOADING_MAX_STEP: f32 = 3.0;

/// Everything a run needs, merged from the config file and the flags.
#[derive(Clone, Debug)]
pub(crate) struct RunOptions {
    pub(crate) session: SessionConfig,
    pub(crate) device: DeviceClass,
    pub(crate) character: Character,
    pub(crate) collect: bool,
    pub(crate) mute: bool,
    pub(crate) frame: Duration,
    pub(crate) time_limit: Duration,
}

/// Outcome of a completed run.
#[derive(Debug)]
pub(crate) struct RunReport {
    pub(crate) session: GameSession,
    pub(crate) stats: GameStats,
    pub(crate) breakdown: ScoreBreakdown,
}

/// Fake asset loader advancing by a random amount every 50 ms.
#[derive(Debug)]
struct LoadingSimulator {
    rng: ChaCha8Rng,
    progress: f32,
    next_step: Option<Instant>,
}

impl LoadingSimulator {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            progress: 0.0,
            next_step: None,
        }
    }

    fn poll(&mut self, now: Instant) -> Option<f32> {
        let due = *self.next_step.get_or_insert(now + LOADING_STEP_INTERVAL);
        if now < due {
            return None;
        }
        self.next_step = Some(due + LOADING_STEP_INTERVAL);
        self.progress = (self.progress + self.rng.gen_range(0.0..LOADING_MAX_STEP)).min(100.0);
        Some(self.progress)
    }
}

/// Plays a session on a simulated clock until the core is reached.
pub(crate) fn run(options: &RunOptions) -> Result<RunReport> {
    let mut session = GameSession::new(options.session.clone());
    let mut observers = Observers::new();
    observers.register(Box::new(Hud::default()));
    if !options.mute {
        observers.register(Box::new(EffectEngine::new(LogSink::default())));
    }

    let mut loader = LoadingSimulator::new(options.session.seed);
    let mut mapper = InputMapper::new(options.device);
    let mut autopilot = Autopilot::new(options.device, options.collect);

    let origin = Instant::now();
    let mut now = origin;
    let mut events = Vec::new();
    info!(
        width = query::maze(&session).width(),
        height = query::maze(&session).height(),
        device = ?options.device,
        "run started"
    );

    loop {
        now += options.frame;
        if now.duration_since(origin) > options.time_limit {
            bail!(
                "core not reached within {}s of simulated time",
                options.time_limit.as_secs()
            );
        }

        events.clear();
        match query::state(&session) {
            SessionState::Loading => {
                if let Some(percent) = loader.poll(now) {
                    apply(
                        &mut session,
                        Command::ReportLoadingProgress { percent, now },
                        &mut events,
                    );
                }
            }
            SessionState::Selecting => apply(
                &mut session,
                Command::SelectCharacter {
                    character: options.character,
                    now,
                },
                &mut events,
            ),
            SessionState::Playing => {
                for input in autopilot.drive(&session) {
                    mapper.apply(input);
                }
                apply(
                    &mut session,
                    Command::Tick {
                        dt: options.frame,
                        intent: mapper.intent(),
                    },
                    &mut events,
                );
            }
            SessionState::Victory => {}
        }
        apply(&mut session, Command::AdvanceClock { now }, &mut events);
        observers.publish(&events);

        let completion = events.iter().find_map(|event| match event {
            Event::SessionCompleted { breakdown, stats } => Some((*breakdown, *stats)),
            _ => None,
        });
        if let Some((breakdown, stats)) = completion {
            return Ok(RunReport {
                session,
                stats,
                breakdown,
            });
        }
    }
}
