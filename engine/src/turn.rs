// ═══════════════════════════════════════════════════════════════════════
// Turn manager - turn switching, mana, card draw
//
// End of a human turn:
//   1. clear highlights and selection
//   2. forfeit the human's unspent mana
//   3. opponent turn: begin, draw, scripted play, forfeit mana
//   4. human turn: begin, draw
// The opponent turn completes before this returns, and any step that
// ends the game stops the sequence.
// ═══════════════════════════════════════════════════════════════════════

use crate::combat::deal_damage;
use crate::error::ActionError;
use crate::feedback;
use crate::opponent;
use crate::render::{notify, RenderCommand, RenderSink};
use crate::state::GameState;
use crate::templates::UnitTemplates;
use crate::types::*;
use tracing::{debug, info};

/// Hand control to `player`: bump the global turn, grow and refill
/// mana, refresh that player's units.
pub fn begin_turn(state: &mut GameState, out: &mut dyn RenderSink, player: PlayerId) {
    state.current = player;
    state.turn += 1;
    state.player_mut(player).begin_turn();
    for unit in state.units.values_mut().filter(|u| u.owner == player) {
        unit.reset_turn_flags();
    }
    feedback::show_mana(state, out, player);
    info!(%player, turn = state.turn, mana = state.player(player).mana(), "turn started");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawResult {
    Drawn(u8),
    Burned,
    Fatigue,
}

/// Draw the top card into the first free slot. An empty deck deals
/// fatigue damage to the avatar instead; a full hand burns the card.
pub fn draw_card(state: &mut GameState, out: &mut dyn RenderSink, player: PlayerId) -> DrawResult {
    let Some(card) = state.player_mut(player).deck.draw_top() else {
        debug!(%player, "fatigue");
        let avatar = state.avatar_id(player);
        deal_damage(state, out, avatar, FATIGUE_DAMAGE);
        if player == HUMAN && !state.is_game_over() {
            notify(out, format!("Fatigue: {} damage", FATIGUE_DAMAGE), NOTICE_SECONDS);
        }
        return DrawResult::Fatigue;
    };

    let hand = &mut state.player_mut(player).hand;
    let Some(slot) = hand.first_empty_slot() else {
        debug!(%player, card = %card.key, "hand full, card burned");
        if player == HUMAN {
            notify(out, format!("Hand full: {} burned", card.name), NOTICE_SECONDS);
        }
        return DrawResult::Burned;
    };
    let key = card.key.clone();
    hand.put(slot, card);
    debug!(%player, card = %key, slot, "card drawn");

    if player == HUMAN && !state.hand_hidden {
        out.send(RenderCommand::DrawCard { slot, card: key, mode: CardMode::Normal });
    }
    DrawResult::Drawn(slot)
}

/// Handle end-turn from the human seat, including the full scripted
/// opponent turn.
pub fn end_turn(
    state: &mut GameState,
    templates: &dyn UnitTemplates,
    out: &mut dyn RenderSink,
) -> Result<(), ActionError> {
    if state.is_game_over() {
        return Err(ActionError::GameOver);
    }
    if state.current != HUMAN {
        return Err(ActionError::NotYourTurn);
    }

    feedback::reset(state, out);
    state.moving_unit = None;
    pass_turn(state, out, HUMAN);
    if state.is_game_over() {
        return Ok(());
    }

    opponent::play_turn(state, templates, out);
    if state.is_game_over() {
        return Ok(());
    }

    pass_turn(state, out, SCRIPTED);
    if !state.is_game_over() {
        feedback::show_hand(state, out);
        notify(out, "Your turn", NOTICE_SECONDS);
    }
    Ok(())
}

/// Forfeit `from`'s mana, then start the other seat's turn with a draw.
fn pass_turn(state: &mut GameState, out: &mut dyn RenderSink, from: PlayerId) {
    state.player_mut(from).clear_mana();
    feedback::show_mana(state, out, from);
    let next = from.opponent();
    begin_turn(state, out, next);
    draw_card(state, out, next);
}
