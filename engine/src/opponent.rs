// ═══════════════════════════════════════════════════════════════════════
// Scripted opponent - deterministic play-then-attack policy for seat 2
//
//   Play phase:   first affordable creature in slot order, summoned on
//                 the first free tile next to any own unit.
//   Attack phase: own units by attack (highest first, ties in registry
//                 order); each hits the enemy avatar if adjacent, else
//                 the adjacent enemy with the least health.
// No search, no lookahead.
// ═══════════════════════════════════════════════════════════════════════

use crate::combat::{adjacent_enemies, try_attack};
use crate::render::RenderSink;
use crate::state::GameState;
use crate::summon::{summon_tiles, try_summon};
use crate::templates::UnitTemplates;
use crate::types::*;
use tracing::debug;

/// Run the whole scripted turn. Does nothing unless seat 2 is current.
pub fn play_turn(state: &mut GameState, templates: &dyn UnitTemplates, out: &mut dyn RenderSink) {
    if state.current != SCRIPTED || state.is_game_over() {
        return;
    }
    play_phase(state, templates, out);
    if !state.is_game_over() {
        attack_phase(state, out);
    }
}

/// Slot of the first creature card the opponent can pay for.
pub fn choose_card(state: &GameState) -> Option<u8> {
    let seat = state.player(SCRIPTED);
    seat.hand
        .iter()
        .find(|(_, card)| card.is_creature() && seat.can_afford(card.cost))
        .map(|(slot, _)| slot)
}

fn play_phase(state: &mut GameState, templates: &dyn UnitTemplates, out: &mut dyn RenderSink) {
    let Some(slot) = choose_card(state) else {
        return;
    };
    let Some(&tile) = summon_tiles(state, SCRIPTED).first() else {
        debug!("opponent has no summon tile");
        return;
    };
    if let Err(e) = try_summon(state, templates, out, SCRIPTED, slot, tile) {
        debug!(error = %e, slot, "opponent summon failed");
    }
}

/// The enemy avatar if adjacent, otherwise the weakest adjacent enemy.
/// Ties keep the first in neighbour order.
pub fn choose_target(state: &GameState, attacker: UnitId) -> Option<UnitId> {
    let enemies = adjacent_enemies(state, attacker);
    let avatar = state.avatar_id(HUMAN);
    if enemies.contains(&avatar) {
        return Some(avatar);
    }
    enemies
        .into_iter()
        .filter_map(|id| state.unit(id))
        .min_by_key(|u| u.health())
        .map(|u| u.id)
}

/// Own units, strongest attack first. The sort is stable, so equal
/// attacks stay in registry order.
pub fn attack_order(state: &GameState) -> Vec<UnitId> {
    let mut units: Vec<(UnitId, u32)> = state.units_of(SCRIPTED).map(|u| (u.id, u.attack())).collect();
    units.sort_by(|a, b| b.1.cmp(&a.1));
    units.into_iter().map(|(id, _)| id).collect()
}

fn attack_phase(state: &mut GameState, out: &mut dyn RenderSink) {
    for attacker in attack_order(state) {
        if state.is_game_over() {
            return;
        }
        let eligible = state.unit(attacker).is_some_and(|u| u.can_attack(state.turn));
        if !eligible {
            continue;
        }
        let Some(target) = choose_target(state, attacker) else {
            continue;
        };
        if let Err(e) = try_attack(state, out, attacker, target) {
            debug!(error = %e, %attacker, %target, "opponent attack rejected");
        }
    }
}
