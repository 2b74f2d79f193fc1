// ═══════════════════════════════════════════════════════════════════════
// Agent Trait - anything that can drive the human seat
//
// Agents receive a `PlayerView`, never the raw GameState, so they cannot
// see the opponent's hand or the order of either deck. They answer with
// the same inbound actions a person clicking the board would produce.
// ═══════════════════════════════════════════════════════════════════════

use duel_engine::engine::Action;
use duel_engine::view::PlayerView;

pub trait Agent: Send + Sync {
    /// Human-readable name, e.g. "Random", "Aggressive".
    fn name(&self) -> &str;

    /// Pick the next click. Only called while the game is running and
    /// the viewer is the current player.
    fn decide(&mut self, view: &PlayerView) -> Action;
}
