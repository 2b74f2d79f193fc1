// ═══════════════════════════════════════════════════════════════════════
// Random Agent - clicks at random among plausible targets.
// Baseline opponent and a stress test for the rules engine.
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::Agent;
use duel_engine::engine::Action;
use duel_engine::state::Selection;
use duel_engine::view::PlayerView;
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Chance of ending the turn instead of clicking something.
const END_TURN_CHANCE: f64 = 0.1;

pub struct RandomAgent {
    rng: ChaCha8Rng,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        RandomAgent { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Cards in hand, highlighted tiles and own units.
    fn candidates(view: &PlayerView) -> Vec<Action> {
        let mut actions: Vec<Action> = view
            .hand
            .iter()
            .map(|c| Action::CardClicked { slot: c.slot })
            .collect();
        actions.extend(view.highlights.all().into_iter().map(Action::tile));
        actions.extend(view.my_units().map(|u| Action::tile(u.position)));
        if view.selection != Selection::Idle {
            actions.push(Action::OtherClicked);
        }
        actions
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        "Random"
    }

    fn decide(&mut self, view: &PlayerView) -> Action {
        if self.rng.gen_bool(END_TURN_CHANCE) {
            return Action::EndTurn;
        }
        Self::candidates(view)
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Action::EndTurn)
    }
}
