#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Side-effect system that turns session events into audio cues.
//!
//! The engine is constructed explicitly around an [`EffectSink`] and stays
//! dormant until the first confirmed user interaction, because some hosts
//! refuse to produce sound before it. Sink failures are logged and absorbed;
//! they never reach the session.

use maze_sprint_core::{Event, EventObserver, MovementEvent, SessionState};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Abstract side effect requested by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Short blip for a committed step.
    Step,
    /// Rising chime for a collected pickup.
    Pickup,
    /// Noise burst when the core is breached.
    Explosion,
    /// Victory fanfare.
    Victory,
}

/// Failures reported by an effect sink.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EffectError {
    /// The output device could not be opened.
    #[error("effect output unavailable: {0}")]
    Unavailable(String),
    /// A single cue failed to play.
    #[error("failed to play {cue:?}: {reason}")]
    Playback {
        /// Cue that failed.
        cue: Cue,
        /// Reason reported by the output.
        reason: String,
    },
}

/// Output device that renders cues.
pub trait EffectSink {
    /// Acquires the output; called once on activation.
    fn open(&mut self) -> Result<(), EffectError>;

    /// Renders a single cue.
    fn play(&mut self, cue: Cue) -> Result<(), EffectError>;
}

/// Lifecycle of an [`EffectEngine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EngineStatus {
    /// Waiting for the first user interaction; cues are dropped.
    Dormant,
    /// The sink is open and receives cues.
    Active,
    /// The sink failed to open; cues are dropped for the rest of the run.
    Unavailable,
}

/// Explicitly constructed effect dispatcher observing session events.
#[derive(Debug)]
pub struct EffectEngine<S> {
    sink: S,
    status: EngineStatus,
}

impl<S: EffectSink> EffectEngine<S> {
    /// Wraps `sink` in a dormant engine.
    #[must_use]
    pub const fn new(sink: S) -> Self {
        Self {
            sink,
            status: EngineStatus::Dormant,
        }
    }

    /// Current lifecycle status.
    #[must_use]
    pub const fn status(&self) -> EngineStatus {
        self.status
    }

    /// Read-only access to the wrapped sink.
    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Opens the sink. Only the first call has an effect.
    pub fn activate(&mut self) -> EngineStatus {
        if self.status != EngineStatus::Dormant {
            return self.status;
        }

        self.status = match self.sink.open() {
            Ok(()) => {
                info!("effect output activated");
                EngineStatus::Active
            }
            Err(error) => {
                warn!(%error, "effect output unavailable; continuing silently");
                EngineStatus::Unavailable
            }
        };
        self.status
    }

    fn emit(&mut self, cue: Cue) {
        if self.status != EngineStatus::Active {
            debug!(?cue, status = ?self.status, "dropping cue");
            return;
        }
        if let Err(error) = self.sink.play(cue) {
            warn!(%error, "effect cue failed");
        }
    }
}

impl<S: EffectSink> EventObserver for EffectEngine<S> {
    fn observe(&mut self, events: &[Event]) {
        for event in events {
            if matches!(event, Event::CharacterSelected { .. }) {
                let _ = self.activate();
            }
            for cue in cues_for(event) {
                self.emit(*cue);
            }
        }
    }
}

/// Cues triggered by a single session event.
#[must_use]
pub fn cues_for(event: &Event) -> &'static [Cue] {
    match event {
        Event::Movement(MovementEvent::Moved { .. }) => &[Cue::Step],
        Event::Movement(MovementEvent::CollectiblePicked { .. }) => &[Cue::Pickup],
        Event::SessionStateChanged {
            to: SessionState::Victory,
            ..
        } => &[Cue::Explosion, Cue::Victory],
        _ => &[],
    }
}
