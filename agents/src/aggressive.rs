// ═══════════════════════════════════════════════════════════════════════
// Aggressive Agent - rushes the enemy avatar.
//
// Priorities each turn, re-evaluated on every click:
//   1. attack with any unit that has an enemy in reach (avatar first,
//      then the weakest adjacent enemy)
//   2. summon the most expensive affordable creature on the summon tile
//      closest to the enemy avatar
//   3. step each unit toward the enemy avatar
//   4. end the turn
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::Agent;
use duel_engine::engine::Action;
use duel_engine::state::Selection;
use duel_engine::types::*;
use duel_engine::view::{CardView, PlayerView, UnitView};
use std::cmp::Reverse;
use std::collections::BTreeSet;
use tracing::trace;

/// Clicks spent in one turn before the agent gives up and ends it.
const TURN_CLICK_LIMIT: u32 = 200;

#[derive(Debug, Default)]
pub struct AggressiveAgent {
    turn: u32,
    clicks: u32,
    /// Units already considered for movement this turn.
    moved: BTreeSet<UnitId>,
    summon_blocked: bool,
}

impl AggressiveAgent {
    pub fn new() -> Self {
        AggressiveAgent::default()
    }

    fn sync_turn(&mut self, view: &PlayerView) {
        if view.turn != self.turn {
            self.turn = view.turn;
            self.clicks = 0;
            self.moved.clear();
            self.summon_blocked = false;
        }
    }

    fn idle(&mut self, view: &PlayerView) -> Action {
        if let Some(unit) = view.my_units().find(|u| u.can_attack && has_enemy_in_reach(view, u)) {
            return Action::tile(unit.position);
        }
        if !self.summon_blocked {
            if let Some(card) = best_creature(view) {
                return Action::CardClicked { slot: card.slot };
            }
        }
        if let Some(unit) = view.my_units().find(|u| u.can_move && !self.moved.contains(&u.id)) {
            return Action::tile(unit.position);
        }
        Action::EndTurn
    }

    fn unit_selected(&mut self, view: &PlayerView, id: UnitId) -> Action {
        let Some(unit) = view.unit(id) else {
            return Action::OtherClicked;
        };
        // false sorts first, so the avatar wins over any creature.
        let target = view
            .highlights
            .attacks
            .iter()
            .filter_map(|&p| view.unit_at(p))
            .min_by_key(|u| (!u.is_avatar, u.health, u.position));
        if let Some(target) = target {
            return Action::tile(target.position);
        }

        self.moved.insert(id);
        if let Some(goal) = enemy_avatar_position(view) {
            let step = closest(view.highlights.moves.iter().copied(), goal);
            if let Some(step) = step.filter(|s| s.chebyshev(goal) < unit.position.chebyshev(goal)) {
                return Action::tile(step);
            }
        }
        Action::OtherClicked
    }

    fn card_selected(&mut self, view: &PlayerView) -> Action {
        let tile = enemy_avatar_position(view).and_then(|goal| closest(view.highlights.summons.iter().copied(), goal));
        match tile {
            Some(tile) => Action::tile(tile),
            None => {
                self.summon_blocked = true;
                Action::OtherClicked
            }
        }
    }
}

fn enemy_avatar_position(view: &PlayerView) -> Option<Position> {
    view.enemy_avatar().map(|u| u.position)
}

fn has_enemy_in_reach(view: &PlayerView, unit: &UnitView) -> bool {
    view.units
        .iter()
        .any(|u| u.owner != view.viewer && u.position.is_adjacent(unit.position))
}

/// Most expensive creature the viewer can pay for; lowest slot on ties.
fn best_creature(view: &PlayerView) -> Option<&CardView> {
    view.hand
        .iter()
        .filter(|c| c.is_creature() && c.cost <= view.me.mana)
        .max_by_key(|c| (c.cost, Reverse(c.slot)))
}

/// Nearest tile to `goal` by king distance, then Manhattan, then coordinate.
fn closest(tiles: impl Iterator<Item = Position>, goal: Position) -> Option<Position> {
    tiles.min_by_key(|p| (p.chebyshev(goal), p.manhattan(goal), *p))
}

impl Agent for AggressiveAgent {
    fn name(&self) -> &str {
        "Aggressive"
    }

    fn decide(&mut self, view: &PlayerView) -> Action {
        self.sync_turn(view);
        if let Some(unit) = view.moving_unit {
            return Action::UnitStopped { unit };
        }
        self.clicks += 1;
        if self.clicks > TURN_CLICK_LIMIT {
            trace!(turn = view.turn, "click limit reached");
            return Action::EndTurn;
        }

        let action = match view.selection {
            Selection::Idle => self.idle(view),
            Selection::Unit(id) => self.unit_selected(view, id),
            Selection::Card(_) => self.card_selected(view),
            Selection::Spell(_) => Action::OtherClicked,
        };
        trace!(?action, "aggressive decision");
        action
    }
}
