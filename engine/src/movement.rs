// ═══════════════════════════════════════════════════════════════════════
// Movement - destination rules and move execution
//
// A unit may step:
//   - 1 tile in a cardinal direction
//   - 2 tiles in a cardinal direction (the middle tile may be occupied)
//   - 1 tile diagonally
// Each destination must be on the board and empty.
// ═══════════════════════════════════════════════════════════════════════

use crate::error::ActionError;
use crate::feedback;
use crate::render::{RenderCommand, RenderSink};
use crate::state::GameState;
use crate::types::*;
use tracing::debug;

/// Candidate offsets in evaluation order.
pub const MOVE_OFFSETS: [(i8, i8); 12] = [
    (1, 0), (-1, 0), (0, 1), (0, -1),
    (2, 0), (-2, 0), (0, 2), (0, -2),
    (1, 1), (1, -1), (-1, 1), (-1, -1),
];

/// Legal destinations from `from`, in `MOVE_OFFSETS` order.
pub fn compute_default_moves(state: &GameState, from: Position) -> Vec<Position> {
    MOVE_OFFSETS
        .iter()
        .filter_map(|&(dx, dy)| from.offset(dx, dy))
        .filter(|&p| state.board.is_free(p))
        .collect()
}

/// Move the selected unit. Board occupancy and the unit's own position
/// are updated together, before any render command is emitted.
pub fn move_selected_unit_to(
    state: &mut GameState,
    out: &mut dyn RenderSink,
    target: Position,
) -> Result<(), ActionError> {
    let id = state.selection.unit().ok_or(ActionError::NoSelection)?;
    move_unit(state, out, id, target)
}

pub fn move_unit(
    state: &mut GameState,
    out: &mut dyn RenderSink,
    id: UnitId,
    target: Position,
) -> Result<(), ActionError> {
    if state.is_game_over() {
        return Err(ActionError::GameOver);
    }
    let unit = state.unit(id).ok_or(ActionError::UnknownUnit(id))?;
    if !unit.can_move(state.turn) {
        return Err(ActionError::CannotMove);
    }
    let from = unit.position;
    if !compute_default_moves(state, from).contains(&target) {
        return Err(ActionError::InvalidTarget);
    }

    state.board.move_unit(from, target);
    let turn = state.turn;
    if let Some(unit) = state.unit_mut(id) {
        unit.position = target;
        unit.mark_moved(turn);
    }
    state.moving_unit = Some(id);
    debug!(unit = %id, %from, to = %target, "move");

    feedback::animate(out, id, Animation::Move);
    out.send(RenderCommand::MoveUnitToTile { unit: id, position: target });
    feedback::animate(out, id, Animation::Idle);
    Ok(())
}

/// Acknowledge the end of a move animation. Ids that are not in motion
/// are ignored.
pub fn unit_stopped(state: &mut GameState, id: UnitId) -> bool {
    if state.moving_unit == Some(id) {
        state.moving_unit = None;
        debug!(unit = %id, "move animation finished");
        true
    } else {
        false
    }
}
