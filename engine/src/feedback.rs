// ═══════════════════════════════════════════════════════════════════════
// Visual feedback - highlight sets and hand display
//
// Keeps the highlight sets in GameState in step with what the renderer
// shows. Holds no game-rule authority: nothing here moves units, spends
// mana or resolves combat. Only the human hand is ever drawn.
// ═══════════════════════════════════════════════════════════════════════

use crate::render::{RenderCommand, RenderSink};
use crate::state::{GameState, HighlightKind, Selection};
use crate::types::*;

/// Paint every tile in its normal mode.
pub fn draw_board(state: &GameState, out: &mut dyn RenderSink) {
    for position in state.board.positions() {
        out.send(RenderCommand::DrawTile { position, mode: TileMode::Normal });
    }
}

pub fn highlight(
    state: &mut GameState,
    out: &mut dyn RenderSink,
    kind: HighlightKind,
    tiles: impl IntoIterator<Item = Position>,
) {
    let mode = kind.tile_mode();
    for position in tiles {
        if state.highlights.set_mut(kind).insert(position) {
            out.send(RenderCommand::DrawTile { position, mode });
        }
    }
}

/// Mark the selected unit's own tile.
pub fn highlight_focus(state: &mut GameState, out: &mut dyn RenderSink, position: Position) {
    state.highlights.focus = Some(position);
    out.send(RenderCommand::DrawTile { position, mode: TileMode::Move });
}

/// Repaint every highlighted tile as normal and empty the sets.
pub fn clear_highlights(state: &mut GameState, out: &mut dyn RenderSink) {
    for position in state.highlights.all() {
        out.send(RenderCommand::DrawTile { position, mode: TileMode::Normal });
    }
    state.highlights.clear();
}

/// Drop spell targeting: the spell selection and its target highlights.
pub fn clear_spell_targeting(state: &mut GameState, out: &mut dyn RenderSink) {
    if let Selection::Spell(_) = state.selection {
        state.selection = Selection::Idle;
    }
    let targets = std::mem::take(&mut state.highlights.spell_targets);
    for position in targets {
        if !state.highlights.all().contains(&position) {
            out.send(RenderCommand::DrawTile { position, mode: TileMode::Normal });
        }
    }
}

/// Clear highlights and any selection.
pub fn reset(state: &mut GameState, out: &mut dyn RenderSink) {
    clear_highlights(state, out);
    state.clear_selection();
}

// ── Hand ───────────────────────────────────────────────────────────────

/// Redraw all six human slots. The selected card, if any, is drawn
/// highlighted.
pub fn redraw_hand(state: &GameState, out: &mut dyn RenderSink) {
    if state.hand_hidden {
        return;
    }
    let selected = state.selection.card_slot();
    let hand = &state.player(HUMAN).hand;
    for slot in 1..=HAND_SLOTS {
        match hand.get(slot) {
            Some(card) => {
                let mode = if selected == Some(slot) { CardMode::Selected } else { CardMode::Normal };
                out.send(RenderCommand::DrawCard { slot, card: card.key.clone(), mode });
            }
            None => out.send(RenderCommand::DeleteCard { slot }),
        }
    }
}

/// Redraw the hand and emphasise one slot regardless of selection.
pub fn highlight_hand_card(state: &GameState, out: &mut dyn RenderSink, slot: u8) {
    if state.hand_hidden {
        return;
    }
    redraw_hand(state, out);
    if let Some(card) = state.player(HUMAN).hand.get(slot) {
        out.send(RenderCommand::DrawCard { slot, card: card.key.clone(), mode: CardMode::Selected });
    }
}

pub fn hide_hand(state: &mut GameState, out: &mut dyn RenderSink) {
    if state.hand_hidden {
        return;
    }
    state.hand_hidden = true;
    for slot in 1..=HAND_SLOTS {
        out.send(RenderCommand::DeleteCard { slot });
    }
}

pub fn show_hand(state: &mut GameState, out: &mut dyn RenderSink) {
    state.hand_hidden = false;
    redraw_hand(state, out);
}

// ── Stat displays ──────────────────────────────────────────────────────

pub fn show_mana(state: &GameState, out: &mut dyn RenderSink, player: PlayerId) {
    out.send(RenderCommand::SetPlayerMana { player, mana: state.player(player).mana() });
}

pub fn show_player_health(state: &GameState, out: &mut dyn RenderSink, player: PlayerId) {
    out.send(RenderCommand::SetPlayerHealth { player, health: state.player(player).health() });
}

pub fn draw_unit(state: &GameState, out: &mut dyn RenderSink, unit: UnitId) {
    if let Some(u) = state.unit(unit) {
        out.send(RenderCommand::DrawUnit { unit, template: u.template.clone(), position: u.position });
        out.send(RenderCommand::SetUnitHealth { unit, health: u.health() });
        out.send(RenderCommand::SetUnitAttack { unit, attack: u.attack() });
    }
}

pub fn animate(out: &mut dyn RenderSink, unit: UnitId, animation: Animation) {
    out.send(RenderCommand::PlayAnimation { unit, animation });
}
