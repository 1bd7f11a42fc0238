//! Observers the CLI registers with the session.

use maze_sprint_core::{Event, EventObserver, SessionState};
use maze_sprint_system_effects::{Cue, EffectError, EffectSink};
use tracing::{debug, info};

/// Logs progress milestones the way a heads-up display would show them.
#[derive(Debug, Default)]
pub(crate) struct Hud {
    last_logged_decile: u32,
}

impl EventObserver for Hud {
    fn observe(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::LoadingProgressed { percent } => {
                    let decile = (*percent / 10.0) as u32;
                    if decile > self.last_logged_decile {
                        self.last_logged_decile = decile;
                        info!(percent = percent.round() as u32, "loading");
                    }
                }
                Event::SessionStateChanged {
                    to: SessionState::Loading,
                    ..
                } => self.last_logged_decile = 0,
                Event::CharacterSelected { character } => info!(%character, "avatar selected"),
                Event::ScoreChanged { score } => info!(score, "score"),
                Event::SessionCompleted { stats, .. } => {
                    info!(
                        elapsed_ms = stats.elapsed.as_millis() as u64,
                        moves = stats.moves,
                        score = stats.score,
                        "core breached"
                    );
                }
                _ => {}
            }
        }
    }
}

/// Effect sink that writes cues to the log instead of an audio device.
#[derive(Debug, Default)]
pub(crate) struct LogSink {
    played: u32,
}

impl EffectSink for LogSink {
    fn open(&mut self) -> Result<(), EffectError> {
        debug!("log sink opened");
        Ok(())
    }

    fn play(&mut self, cue: Cue) -> Result<(), EffectError> {
        self.played = self.played.saturating_add(1);
        debug!(?cue, played = self.played, "cue");
        Ok(())
    }
}
