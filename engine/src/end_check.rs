// ═══════════════════════════════════════════════════════════════════════
// Game end - the only place the terminal outcome is set
// ═══════════════════════════════════════════════════════════════════════

use crate::feedback;
use crate::render::{notify, RenderSink};
use crate::state::GameState;
use crate::types::*;
use tracing::info;

/// Check both avatars and finalise the match if either has fallen.
/// Idempotent: once an outcome exists this returns it without touching
/// state or emitting anything.
pub fn check_game_end(state: &mut GameState, out: &mut dyn RenderSink) -> Option<Outcome> {
    if state.outcome.is_some() {
        return state.outcome;
    }

    let fallen = |player: PlayerId| state.avatar(player).map_or(true, |a| a.is_dead());
    let outcome = match (fallen(PlayerId::One), fallen(PlayerId::Two)) {
        (false, false) => return None,
        (true, true) => Outcome::Draw,
        (true, false) => Outcome::Winner(PlayerId::Two),
        (false, true) => Outcome::Winner(PlayerId::One),
    };

    state.outcome = Some(outcome);
    state.moving_unit = None;
    feedback::reset(state, out);
    info!(%outcome, turn = state.turn, "game over");
    notify(out, outcome.banner(), GAME_END_NOTICE_SECONDS);
    Some(outcome)
}
