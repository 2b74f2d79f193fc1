// ═══════════════════════════════════════════════════════════════════════
// Card play - hand selection, summon targeting and spell casting
//
//   click card   → select it and highlight where it can go
//   click again  → deselect
//   creature     → summon tiles highlighted, awaiting a tile click
//   spell        → enemy units highlighted, awaiting a target click
// ═══════════════════════════════════════════════════════════════════════

use crate::error::ActionError;
use crate::feedback;
use crate::render::{notify, RenderSink};
use crate::state::{GameState, HighlightKind, Selection};
use crate::summon::summon_tiles;
use crate::types::*;
use tracing::{debug, info};

/// Tiles holding an enemy of `player`, in registry order.
pub fn spell_targets(state: &GameState, player: PlayerId) -> Vec<Position> {
    state.units_of(player.opponent()).map(|u| u.position).collect()
}

pub fn on_card_clicked(
    state: &mut GameState,
    out: &mut dyn RenderSink,
    slot: u8,
) -> Result<(), ActionError> {
    if state.is_game_over() {
        return Err(ActionError::GameOver);
    }
    if state.current != HUMAN {
        return Err(ActionError::NotYourTurn);
    }

    let Some(card) = state.player(HUMAN).hand.get(slot).cloned() else {
        if state.selection.card_slot().is_some() {
            feedback::reset(state, out);
            feedback::redraw_hand(state, out);
        }
        return Ok(());
    };

    if state.selection.card_slot() == Some(slot) {
        feedback::reset(state, out);
        feedback::show_hand(state, out);
        return Ok(());
    }

    feedback::reset(state, out);
    feedback::show_hand(state, out);

    let mana = state.player(HUMAN).mana();
    if mana < card.cost {
        feedback::highlight_hand_card(state, out, slot);
        return Err(ActionError::NotEnoughMana { cost: card.cost, available: mana });
    }

    if card.is_creature() {
        state.selection = Selection::Card(slot);
        feedback::redraw_hand(state, out);
        let tiles = summon_tiles(state, HUMAN);
        if tiles.is_empty() {
            return Err(ActionError::NoSummonTiles);
        }
        feedback::highlight(state, out, HighlightKind::Summon, tiles);
    } else {
        let targets = spell_targets(state, HUMAN);
        if targets.is_empty() {
            feedback::redraw_hand(state, out);
            return Err(ActionError::NoSpellTargets);
        }
        state.selection = Selection::Spell(slot);
        feedback::redraw_hand(state, out);
        feedback::highlight(state, out, HighlightKind::SpellTarget, targets);
    }
    debug!(slot, card = %card.key, "card selected");
    Ok(())
}

/// Cast the selected spell at `target`. Effects are announced only; the
/// card is paid for and leaves the hand.
pub fn cast_spell(
    state: &mut GameState,
    out: &mut dyn RenderSink,
    target: UnitId,
) -> Result<(), ActionError> {
    let Selection::Spell(slot) = state.selection else {
        return Err(ActionError::NoSelection);
    };
    let card = state.player(HUMAN).hand.get(slot).cloned().ok_or(ActionError::EmptySlot(slot))?;
    let victim = state.unit(target).ok_or(ActionError::UnknownUnit(target))?;
    if victim.owner == HUMAN || !state.highlights.contains(HighlightKind::SpellTarget, victim.position) {
        return Err(ActionError::InvalidTarget);
    }

    let seat = state.player_mut(HUMAN);
    if !seat.spend_mana(card.cost) {
        return Err(ActionError::NotEnoughMana { cost: card.cost, available: seat.mana() });
    }
    feedback::show_mana(state, out, HUMAN);

    info!(card = %card.key, target = %target, "spell played");
    notify(out, format!("Spell played: {}", card.name), NOTICE_SECONDS);

    let hand = &mut state.player_mut(HUMAN).hand;
    hand.remove(slot);
    hand.compact_left();

    feedback::clear_spell_targeting(state, out);
    feedback::reset(state, out);
    feedback::show_hand(state, out);
    Ok(())
}
