// ═══════════════════════════════════════════════════════════════════════
// Invariants - consistency checks that should never fail
//
// Used by tests and by the simulation loop in debug builds. A violation
// is a rules-engine bug, never a legitimate game state.
// ═══════════════════════════════════════════════════════════════════════

use crate::state::GameState;
use crate::types::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

fn violation(message: String) -> InvariantViolation {
    InvariantViolation { message }
}

/// Every violation found; empty when the state is consistent.
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    // Board ↔ registry agreement, both directions.
    for (pos, id) in state.board.occupied() {
        match state.unit(id) {
            None => violations.push(violation(format!("board {} holds unknown unit {}", pos, id))),
            Some(u) if u.position != pos => violations.push(violation(format!(
                "board {} holds unit {} which thinks it is at {}",
                pos, id, u.position
            ))),
            Some(_) => {}
        }
    }
    for unit in state.units.values() {
        if !state.board.is_valid(unit.position) {
            violations.push(violation(format!("unit {} is off the board at {}", unit.id, unit.position)));
        } else if state.board.unit_at(unit.position) != Some(unit.id) {
            violations.push(violation(format!("unit {} at {} is missing from the board", unit.id, unit.position)));
        }
        if unit.health() > unit.max_health() {
            violations.push(violation(format!(
                "unit {} health {} exceeds max {}",
                unit.id,
                unit.health(),
                unit.max_health()
            )));
        }
        if !unit.is_avatar() && unit.is_dead() {
            violations.push(violation(format!("dead unit {} still in play", unit.id)));
        }
    }

    for player in PlayerId::ALL {
        let seat = state.player(player);
        if seat.mana() > MAX_MANA {
            violations.push(violation(format!("{} mana {} exceeds {}", player, seat.mana(), MAX_MANA)));
        }
        if seat.health() > MAX_PLAYER_HEALTH {
            violations.push(violation(format!("{} health {} exceeds {}", player, seat.health(), MAX_PLAYER_HEALTH)));
        }
        match state.avatar(player) {
            None => violations.push(violation(format!("{} avatar missing", player))),
            Some(a) if a.health() != seat.health() => violations.push(violation(format!(
                "{} avatar health {} differs from player health {}",
                player,
                a.health(),
                seat.health()
            ))),
            Some(_) => {}
        }
    }

    let avatar_down = PlayerId::ALL.iter().any(|&p| state.avatar(p).map_or(true, |a| a.is_dead()));
    if avatar_down != state.is_game_over() {
        violations.push(violation(format!(
            "avatar down = {} but game over = {}",
            avatar_down,
            state.is_game_over()
        )));
    }

    violations
}
