// ═══════════════════════════════════════════════════════════════════════
// Player view - what the human seat is allowed to know
//
//   PUBLIC  - every unit on the board, both players' health and mana,
//             deck sizes, hand sizes, turn info, the outcome
//   PRIVATE - the viewer's own hand, selection and highlight sets
//   HIDDEN  - the opponent's hand contents, the order of both decks
//
// Agents only ever receive a PlayerView, never the raw GameState.
// ═══════════════════════════════════════════════════════════════════════

use crate::cards::CardKind;
use crate::state::{GameState, Highlights, Selection};
use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitView {
    pub id: UnitId,
    pub owner: PlayerId,
    pub position: Position,
    pub health: u32,
    pub attack: u32,
    pub is_avatar: bool,
    pub can_move: bool,
    pub can_attack: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardView {
    pub slot: u8,
    pub key: String,
    pub cost: u32,
    pub kind: CardKind,
}

impl CardView {
    pub fn is_creature(&self) -> bool {
        matches!(self.kind, CardKind::Creature(_))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatView {
    pub health: u32,
    pub mana: u32,
    pub max_mana: u32,
    pub deck_size: usize,
    pub hand_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub viewer: PlayerId,
    pub board_width: u8,
    pub board_height: u8,
    pub turn: u32,
    pub current: PlayerId,
    pub outcome: Option<Outcome>,
    pub units: Vec<UnitView>,
    pub hand: Vec<CardView>,
    pub me: SeatView,
    pub opponent: SeatView,
    pub selection: Selection,
    pub highlights: Highlights,
    pub moving_unit: Option<UnitId>,
}

impl PlayerView {
    pub fn unit(&self, id: UnitId) -> Option<&UnitView> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn unit_at(&self, pos: Position) -> Option<&UnitView> {
        self.units.iter().find(|u| u.position == pos)
    }

    pub fn my_units(&self) -> impl Iterator<Item = &UnitView> + '_ {
        self.units.iter().filter(move |u| u.owner == self.viewer)
    }

    pub fn enemy_avatar(&self) -> Option<&UnitView> {
        self.units.iter().find(|u| u.is_avatar && u.owner != self.viewer)
    }

    pub fn is_my_turn(&self) -> bool {
        self.outcome.is_none() && self.current == self.viewer
    }
}

fn seat_view(state: &GameState, player: PlayerId) -> SeatView {
    let seat = state.player(player);
    SeatView {
        health: seat.health(),
        mana: seat.mana(),
        max_mana: seat.max_mana(),
        deck_size: seat.deck.len(),
        hand_size: seat.hand.len(),
    }
}

pub fn player_view(state: &GameState, viewer: PlayerId) -> PlayerView {
    let units = state
        .units
        .values()
        .map(|u| UnitView {
            id: u.id,
            owner: u.owner,
            position: u.position,
            health: u.health(),
            attack: u.attack(),
            is_avatar: u.is_avatar(),
            can_move: u.can_move(state.turn),
            can_attack: u.can_attack(state.turn),
        })
        .collect();
    let hand = state
        .player(viewer)
        .hand
        .iter()
        .map(|(slot, c)| CardView { slot, key: c.key.clone(), cost: c.cost, kind: c.kind })
        .collect();

    PlayerView {
        viewer,
        board_width: state.board.width(),
        board_height: state.board.height(),
        turn: state.turn,
        current: state.current,
        outcome: state.outcome,
        units,
        hand,
        me: seat_view(state, viewer),
        opponent: seat_view(state, viewer.opponent()),
        selection: state.selection,
        highlights: state.highlights.clone(),
        moving_unit: state.moving_unit,
    }
}
