// ═══════════════════════════════════════════════════════════════════════
// Summoning - creature cards become units on the board
//
// Every legality check runs before the first mutation. The one late
// failure (no template for the card) refunds the mana already paid.
// ═══════════════════════════════════════════════════════════════════════

use crate::cards::creature_stats;
use crate::error::ActionError;
use crate::feedback;
use crate::render::{notify, RenderCommand, RenderSink};
use crate::state::GameState;
use crate::templates::UnitTemplates;
use crate::types::*;
use crate::unit::{Unit, UnitKind};
use tracing::{debug, info};

/// Empty tiles touching any unit of `player`: owned units in registry
/// order, then each unit's neighbours in neighbour order. No duplicates.
pub fn summon_tiles(state: &GameState, player: PlayerId) -> Vec<Position> {
    let mut tiles = Vec::new();
    for unit in state.units_of(player) {
        for p in state.board.neighbours(unit.position) {
            if !state.board.is_occupied(p) && !tiles.contains(&p) {
                tiles.push(p);
            }
        }
    }
    tiles
}

/// Summon the creature in `slot` of `player`'s hand onto `target`.
pub fn try_summon(
    state: &mut GameState,
    templates: &dyn UnitTemplates,
    out: &mut dyn RenderSink,
    player: PlayerId,
    slot: u8,
    target: Position,
) -> Result<UnitId, ActionError> {
    if state.is_game_over() {
        return Err(ActionError::GameOver);
    }
    if state.current != player {
        return Err(ActionError::NotYourTurn);
    }
    let card = state.player(player).hand.get(slot).ok_or(ActionError::EmptySlot(slot))?.clone();
    if !state.board.is_free(target) || !summon_tiles(state, player).contains(&target) {
        return Err(ActionError::InvalidTarget);
    }

    if !card.is_creature() {
        return Err(ActionError::NotACreature(card.key.clone()));
    }

    let seat = state.player_mut(player);
    if !seat.spend_mana(card.cost) {
        return Err(ActionError::NotEnoughMana { cost: card.cost, available: seat.mana() });
    }
    feedback::show_mana(state, out, player);

    let Some(template) = templates.resolve(&card.key) else {
        refund(state, out, player, card.cost);
        debug!(card = %card.key, "no unit template");
        return Err(ActionError::TemplateNotFound(card.key.clone()));
    };

    let id = state.ids.unit();
    let mut unit = Unit::new(id, player, UnitKind::Creature, template.id, creature_stats(&card.key), target);
    unit.mark_summoned(state.turn);
    state.place_unit(unit);
    info!(%player, card = %card.key, unit = %id, position = %target, "summoned");

    out.send(RenderCommand::PlayEffect { effect: Effect::Summon, position: target });
    feedback::draw_unit(state, out, id);

    let hand = &mut state.player_mut(player).hand;
    hand.remove(slot);
    hand.compact_left();
    if player == HUMAN {
        feedback::redraw_hand(state, out);
        notify(out, "Summoned!", NOTICE_SECONDS);
    }
    Ok(id)
}

fn refund(state: &mut GameState, out: &mut dyn RenderSink, player: PlayerId, amount: u32) {
    state.player_mut(player).refund_mana(amount);
    feedback::show_mana(state, out, player);
}
