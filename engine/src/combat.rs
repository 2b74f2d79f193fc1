// ═══════════════════════════════════════════════════════════════════════
// Combat - damage, unit removal and attack resolution
//
// Attack sequence:
//   1. legality (game running, enemy target, adjacent, attacker eligible)
//   2. attacker strikes, attacker marked as having attacked
//   3. defender dead → avatar: game end / creature: removed, no counter
//   4. otherwise defender counterattacks with the same death handling
// ═══════════════════════════════════════════════════════════════════════

use crate::end_check::check_game_end;
use crate::error::ActionError;
use crate::feedback;
use crate::render::{notify, RenderCommand, RenderSink};
use crate::state::GameState;
use crate::types::*;
use tracing::{debug, info};

/// Apply damage to a unit and update its display. Avatar damage is
/// mirrored into the owner's health and always runs the end check.
/// Zero damage is a no-op.
pub fn deal_damage(state: &mut GameState, out: &mut dyn RenderSink, target: UnitId, amount: u32) {
    if amount == 0 {
        return;
    }
    let Some(unit) = state.unit_mut(target) else {
        return;
    };
    unit.apply_damage(amount);
    let (health, owner, is_avatar) = (unit.health(), unit.owner, unit.is_avatar());
    out.send(RenderCommand::SetUnitHealth { unit: target, health });

    if is_avatar {
        state.player_mut(owner).set_health(health);
        feedback::show_player_health(state, out, owner);
        check_game_end(state, out);
    }
}

/// Take a dead creature out of play. Avatars are never removed.
pub fn remove_unit(state: &mut GameState, out: &mut dyn RenderSink, id: UnitId) {
    let Some(unit) = state.unit(id) else {
        return;
    };
    if unit.is_avatar() {
        return;
    }
    let position = unit.position;

    feedback::animate(out, id, Animation::Death);
    out.send(RenderCommand::DeleteUnit { unit: id });
    state.board.remove(position);
    state.units.remove(&id);
    if state.selection.unit() == Some(id) {
        state.clear_selection();
    }
    if state.moving_unit == Some(id) {
        state.moving_unit = None;
    }
    info!(unit = %id, %position, "unit destroyed");
    notify(out, "Unit destroyed", NOTICE_SECONDS);
}

/// Enemy units within one tile (8-neighbourhood) of `attacker`, in
/// neighbour order.
pub fn adjacent_enemies(state: &GameState, attacker: UnitId) -> Vec<UnitId> {
    let Some(unit) = state.unit(attacker) else {
        return Vec::new();
    };
    state
        .board
        .neighbours(unit.position)
        .filter_map(|p| state.unit_at(p))
        .filter(|u| u.owner != unit.owner)
        .map(|u| u.id)
        .collect()
}

/// Resolve one attack with counterattack.
pub fn try_attack(
    state: &mut GameState,
    out: &mut dyn RenderSink,
    attacker: UnitId,
    defender: UnitId,
) -> Result<(), ActionError> {
    if state.is_game_over() {
        return Err(ActionError::GameOver);
    }
    let att = state.unit(attacker).ok_or(ActionError::UnknownUnit(attacker))?;
    let def = state.unit(defender).ok_or(ActionError::UnknownUnit(defender))?;
    if att.owner == def.owner {
        return Err(ActionError::FriendlyTarget);
    }
    if !att.position.is_adjacent(def.position) {
        return Err(ActionError::OutOfRange);
    }
    if !att.can_attack(state.turn) {
        return Err(ActionError::CannotAttack);
    }
    let (strike, counter) = (att.attack(), def.attack());
    debug!(%attacker, %defender, strike, "attack");

    feedback::animate(out, attacker, Animation::Attack);
    deal_damage(state, out, defender, strike);
    let turn = state.turn;
    if let Some(unit) = state.unit_mut(attacker) {
        unit.mark_attacked(turn);
    }

    if resolve_death(state, out, defender) {
        if !state.is_game_over() {
            feedback::animate(out, attacker, Animation::Idle);
        }
        return Ok(());
    }

    feedback::animate(out, defender, Animation::Attack);
    deal_damage(state, out, attacker, counter);

    if resolve_death(state, out, attacker) {
        if !state.is_game_over() {
            feedback::animate(out, defender, Animation::Idle);
        }
        return Ok(());
    }

    feedback::animate(out, attacker, Animation::Idle);
    feedback::animate(out, defender, Animation::Idle);
    Ok(())
}

/// Returns true if the unit died. A dead creature is removed; a dead
/// avatar stays on the board and the end check has already fired.
fn resolve_death(state: &mut GameState, out: &mut dyn RenderSink, id: UnitId) -> bool {
    let Some(unit) = state.unit(id) else {
        return true;
    };
    if !unit.is_dead() {
        return false;
    }
    if unit.is_avatar() {
        check_game_end(state, out);
    } else {
        remove_unit(state, out, id);
    }
    true
}
