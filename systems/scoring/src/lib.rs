#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure scoring system that settles the completion bonus.

use std::time::Duration;

use maze_sprint_core::ScoreBreakdown;

/// Time bonus awarded for an instant completion.
pub const TIME_BONUS_CEILING: u32 = 10_000;
/// Points deducted from the time bonus per whole elapsed second.
pub const TIME_PENALTY_PER_SECOND: u32 = 10;
/// Bonus awarded per collected pickup on completion.
pub const COLLECTIBLE_BONUS: u32 = 1_000;
/// Move bonus awarded for a zero-move completion.
pub const MOVE_BONUS_CEILING: u32 = 5_000;
/// Points deducted from the move bonus per committed move.
pub const MOVE_PENALTY: u32 = 10;

/// Computes the completion bonus for a finished run.
///
/// Only whole seconds count against the time bonus; both decaying components
/// bottom out at zero.
#[must_use]
pub fn bonus_score(elapsed: Duration, moves: u32, collectibles_collected: u32) -> ScoreBreakdown {
    let whole_seconds = u32::try_from(elapsed.as_secs()).unwrap_or(u32::MAX);
    ScoreBreakdown {
        time_bonus: TIME_BONUS_CEILING
            .saturating_sub(whole_seconds.saturating_mul(TIME_PENALTY_PER_SECOND)),
        collectible_bonus: collectibles_collected.saturating_mul(COLLECTIBLE_BONUS),
        move_bonus: MOVE_BONUS_CEILING.saturating_sub(moves.saturating_mul(MOVE_PENALTY)),
    }
}
