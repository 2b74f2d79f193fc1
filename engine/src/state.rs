// ═══════════════════════════════════════════════════════════════════════
// GameState - single source of truth for one match
//
// Owns the board, the unit registry, both players, the turn counters,
// the UI selection and highlight sets, and the terminal outcome.
// Independent matches never share a GameState.
// ═══════════════════════════════════════════════════════════════════════

use crate::board::Board;
use crate::player::PlayerState;
use crate::types::*;
use crate::unit::Unit;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// What the human seat currently has selected. The variants are
/// mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    Idle,
    /// A unit with its move/attack highlights shown.
    Unit(UnitId),
    /// A creature card waiting for a summon tile.
    Card(u8),
    /// A spell card waiting for a target unit.
    Spell(u8),
}

impl Selection {
    pub fn unit(self) -> Option<UnitId> {
        match self {
            Selection::Unit(id) => Some(id),
            _ => None,
        }
    }

    pub fn card_slot(self) -> Option<u8> {
        match self {
            Selection::Card(slot) | Selection::Spell(slot) => Some(slot),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HighlightKind {
    Move,
    Attack,
    Summon,
    SpellTarget,
}

impl HighlightKind {
    pub fn tile_mode(self) -> TileMode {
        match self {
            HighlightKind::Move => TileMode::Move,
            HighlightKind::Attack => TileMode::Attack,
            HighlightKind::Summon => TileMode::Summon,
            HighlightKind::SpellTarget => TileMode::SpellTarget,
        }
    }
}

/// Highlighted tiles, keyed by coordinate. `focus` marks the selected
/// unit's own tile and is not a move target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlights {
    pub moves: BTreeSet<Position>,
    pub attacks: BTreeSet<Position>,
    pub summons: BTreeSet<Position>,
    pub spell_targets: BTreeSet<Position>,
    pub focus: Option<Position>,
}

impl Highlights {
    pub fn set(&self, kind: HighlightKind) -> &BTreeSet<Position> {
        match kind {
            HighlightKind::Move => &self.moves,
            HighlightKind::Attack => &self.attacks,
            HighlightKind::Summon => &self.summons,
            HighlightKind::SpellTarget => &self.spell_targets,
        }
    }

    pub fn set_mut(&mut self, kind: HighlightKind) -> &mut BTreeSet<Position> {
        match kind {
            HighlightKind::Move => &mut self.moves,
            HighlightKind::Attack => &mut self.attacks,
            HighlightKind::Summon => &mut self.summons,
            HighlightKind::SpellTarget => &mut self.spell_targets,
        }
    }

    pub fn contains(&self, kind: HighlightKind, pos: Position) -> bool {
        self.set(kind).contains(&pos)
    }

    pub fn is_empty(&self) -> bool {
        self.focus.is_none()
            && self.moves.is_empty()
            && self.attacks.is_empty()
            && self.summons.is_empty()
            && self.spell_targets.is_empty()
    }

    /// Every highlighted tile once, in coordinate order.
    pub fn all(&self) -> BTreeSet<Position> {
        self.moves
            .iter()
            .chain(&self.attacks)
            .chain(&self.summons)
            .chain(&self.spell_targets)
            .chain(self.focus.iter())
            .copied()
            .collect()
    }

    pub fn clear(&mut self) {
        *self = Highlights::default();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub players: [PlayerState; 2],
    /// Registry in creation order.
    pub units: BTreeMap<UnitId, Unit>,
    pub avatars: [UnitId; 2],
    pub current: PlayerId,
    /// Incremented at every turn start, both seats.
    pub turn: u32,
    pub selection: Selection,
    pub highlights: Highlights,
    pub hand_hidden: bool,
    /// Unit whose move animation has not reported back yet.
    pub moving_unit: Option<UnitId>,
    pub outcome: Option<Outcome>,
    pub ids: IdAllocator,
}

impl GameState {
    pub fn player(&self, id: PlayerId) -> &PlayerState {
        &self.players[id.index()]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut PlayerState {
        &mut self.players[id.index()]
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    /// Bounds-tolerant.
    pub fn unit_at(&self, pos: Position) -> Option<&Unit> {
        self.board.get(pos).and_then(|id| self.units.get(&id))
    }

    pub fn avatar_id(&self, player: PlayerId) -> UnitId {
        self.avatars[player.index()]
    }

    pub fn avatar(&self, player: PlayerId) -> Option<&Unit> {
        self.unit(self.avatar_id(player))
    }

    /// Units of one owner in registry order.
    pub fn units_of(&self, owner: PlayerId) -> impl Iterator<Item = &Unit> + '_ {
        self.units.values().filter(move |u| u.owner == owner)
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self.outcome {
            Some(Outcome::Winner(p)) => Some(p),
            _ => None,
        }
    }

    /// Add a unit to both the registry and the board.
    ///
    /// # Panics
    /// If the unit's tile is out of bounds or occupied.
    pub fn place_unit(&mut self, unit: Unit) {
        self.board.put(unit.position, unit.id);
        self.units.insert(unit.id, unit);
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::Idle;
    }
}
