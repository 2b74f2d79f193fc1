// ═══════════════════════════════════════════════════════════════════════
// Game Engine - inbound action dispatch
//
// Architecture:
//   The engine is a pure state machine. It never does I/O. Each inbound
//   action is handled to completion against one GameState and writes its
//   render commands, in order, into the caller's sink.
//
// Failures:
//   A rejected action leaves state as it was (apart from highlight
//   housekeeping), emits the error text as a notification and returns
//   the error to the caller.
// ═══════════════════════════════════════════════════════════════════════

use crate::card_play;
use crate::combat;
use crate::error::ActionError;
use crate::feedback;
use crate::movement;
use crate::render::{notify, RenderSink};
use crate::state::{GameState, HighlightKind, Selection};
use crate::summon;
use crate::templates::UnitTemplates;
use crate::turn;
use crate::types::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Inbound requests from the human seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    TileClicked { x: u8, y: u8 },
    /// Hand slot 1..=6.
    CardClicked { slot: u8 },
    EndTurn,
    OtherClicked,
    UnitStopped { unit: UnitId },
}

impl Action {
    pub fn tile(pos: Position) -> Action {
        Action::TileClicked { x: pos.x, y: pos.y }
    }
}

/// Apply one inbound action.
pub fn apply_action(
    state: &mut GameState,
    templates: &dyn UnitTemplates,
    action: Action,
    out: &mut dyn RenderSink,
) -> Result<(), ActionError> {
    let result = match action {
        Action::TileClicked { x, y } => on_tile_clicked(state, templates, out, Position::new(x, y)),
        Action::CardClicked { slot } => card_play::on_card_clicked(state, out, slot),
        Action::EndTurn => turn::end_turn(state, templates, out),
        Action::OtherClicked => on_other_clicked(state, out),
        Action::UnitStopped { unit } => {
            movement::unit_stopped(state, unit);
            Ok(())
        }
    };
    if let Err(e) = &result {
        debug!(?action, error = %e, "action rejected");
        if *e != ActionError::GameOver {
            notify(out, e.to_string(), NOTICE_SECONDS);
        }
    }
    result
}

fn on_other_clicked(state: &mut GameState, out: &mut dyn RenderSink) -> Result<(), ActionError> {
    if state.is_game_over() {
        return Err(ActionError::GameOver);
    }
    feedback::clear_spell_targeting(state, out);
    feedback::reset(state, out);
    feedback::show_hand(state, out);
    Ok(())
}

/// Tile clicks resolve in this order:
///   1. pending spell target (any other tile cancels the spell)
///   2. summon onto a summon-highlighted tile
///   3. attack a unit on an attack-highlighted tile
///   4. move onto a move-highlighted tile
///   5. empty tile clears everything
///   6. own unit becomes the selection
///   7. anything else clears the selection
fn on_tile_clicked(
    state: &mut GameState,
    templates: &dyn UnitTemplates,
    out: &mut dyn RenderSink,
    pos: Position,
) -> Result<(), ActionError> {
    if state.is_game_over() {
        return Err(ActionError::GameOver);
    }
    if state.current != HUMAN {
        return Err(ActionError::NotYourTurn);
    }
    if !state.board.is_valid(pos) {
        return Err(ActionError::InvalidTarget);
    }
    let clicked = state.board.unit_at(pos);

    if let Selection::Spell(_) = state.selection {
        if let Some(target) = clicked {
            if state.highlights.contains(HighlightKind::SpellTarget, pos) {
                return card_play::cast_spell(state, out, target);
            }
        }
        feedback::clear_spell_targeting(state, out);
        feedback::show_hand(state, out);
    }

    if let Selection::Card(slot) = state.selection {
        if state.highlights.contains(HighlightKind::Summon, pos) {
            let result = summon::try_summon(state, templates, out, HUMAN, slot, pos);
            feedback::reset(state, out);
            feedback::show_hand(state, out);
            return result.map(|_| ());
        }
    }

    if let (Some(target), Some(attacker)) = (clicked, state.selection.unit()) {
        if state.highlights.contains(HighlightKind::Attack, pos) {
            let result = combat::try_attack(state, out, attacker, target);
            feedback::reset(state, out);
            feedback::show_hand(state, out);
            return result;
        }
    }

    if state.highlights.contains(HighlightKind::Move, pos) {
        let result = movement::move_selected_unit_to(state, out, pos);
        feedback::reset(state, out);
        feedback::show_hand(state, out);
        return result;
    }

    let Some(unit_id) = clicked else {
        feedback::reset(state, out);
        feedback::show_hand(state, out);
        return Ok(());
    };

    if state.unit(unit_id).is_some_and(|u| u.owner == HUMAN) {
        return select_unit(state, out, unit_id);
    }

    feedback::reset(state, out);
    feedback::show_hand(state, out);
    Ok(())
}

/// Select a friendly unit and show what it can do this turn.
fn select_unit(state: &mut GameState, out: &mut dyn RenderSink, id: UnitId) -> Result<(), ActionError> {
    feedback::reset(state, out);
    let unit = state.unit(id).ok_or(ActionError::UnknownUnit(id))?;
    let (position, can_move, can_attack) = (unit.position, unit.can_move(state.turn), unit.can_attack(state.turn));
    state.selection = Selection::Unit(id);

    if !can_move && !can_attack {
        feedback::highlight_focus(state, out, position);
        feedback::show_hand(state, out);
        let fresh = state.unit(id).is_some_and(|u| u.is_fresh(state.turn));
        let notice = if fresh { ActionError::SummoningSickness } else { ActionError::CannotMove };
        notify(out, notice.to_string(), NOTICE_SECONDS);
        return Ok(());
    }

    feedback::hide_hand(state, out);
    if can_move {
        let moves = movement::compute_default_moves(state, position);
        feedback::highlight(state, out, HighlightKind::Move, moves);
    }
    feedback::highlight_focus(state, out, position);
    if can_attack {
        let targets: Vec<Position> = combat::adjacent_enemies(state, id)
            .into_iter()
            .filter_map(|e| state.unit(e).map(|u| u.position))
            .collect();
        feedback::highlight(state, out, HighlightKind::Attack, targets);
    }
    Ok(())
}
