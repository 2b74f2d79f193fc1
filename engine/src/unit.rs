// ═══════════════════════════════════════════════════════════════════════
// Units - creatures and avatars on the board
//
// Per-turn eligibility is tracked with three turn markers compared against
// the global turn counter:
//   summoned_on   - the turn the unit entered play (summoning sickness)
//   last_moved    - the turn it last moved
//   last_attacked - the turn it last attacked
// ═══════════════════════════════════════════════════════════════════════

use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// Death ends the game for its owner; never removed from the board.
    Avatar,
    Creature,
}

/// Attack and health printed on a creature card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitStats {
    pub attack: u32,
    pub health: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub owner: PlayerId,
    pub kind: UnitKind,
    /// Render template id.
    pub template: String,
    pub position: Position,
    max_health: u32,
    health: u32,
    attack: u32,
    summoned_on: Option<u32>,
    last_moved: Option<u32>,
    last_attacked: Option<u32>,
}

impl Unit {
    /// Max health is at least 1.
    pub fn new(
        id: UnitId,
        owner: PlayerId,
        kind: UnitKind,
        template: impl Into<String>,
        stats: UnitStats,
        position: Position,
    ) -> Self {
        let max_health = stats.health.max(1);
        Unit {
            id,
            owner,
            kind,
            template: template.into(),
            position,
            max_health,
            health: max_health,
            attack: stats.attack,
            summoned_on: None,
            last_moved: None,
            last_attacked: None,
        }
    }

    pub fn is_avatar(&self) -> bool {
        self.kind == UnitKind::Avatar
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn attack(&self) -> u32 {
        self.attack
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    pub fn set_health(&mut self, health: u32) {
        self.health = health.min(self.max_health);
    }

    /// Floors at zero.
    pub fn apply_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    pub fn summoned_on(&self) -> Option<u32> {
        self.summoned_on
    }

    pub fn mark_summoned(&mut self, turn: u32) {
        self.summoned_on = Some(turn);
    }

    pub fn is_fresh(&self, turn: u32) -> bool {
        self.summoned_on == Some(turn)
    }

    pub fn can_move(&self, turn: u32) -> bool {
        !self.is_fresh(turn) && self.last_moved != Some(turn)
    }

    pub fn can_attack(&self, turn: u32) -> bool {
        !self.is_fresh(turn) && self.last_attacked != Some(turn)
    }

    pub fn mark_moved(&mut self, turn: u32) {
        self.last_moved = Some(turn);
    }

    pub fn mark_attacked(&mut self, turn: u32) {
        self.last_attacked = Some(turn);
    }

    /// Called at the start of the owner's turn.
    pub fn reset_turn_flags(&mut self) {
        self.last_moved = None;
        self.last_attacked = None;
    }
}
