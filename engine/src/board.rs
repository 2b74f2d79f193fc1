// ═══════════════════════════════════════════════════════════════════════
// Board - tile occupancy grid (one unit per tile at most)
//
// The board only stores unit ids; unit data lives in the GameState
// registry. Mutators panic on contract violations: callers must check
// bounds and occupancy first.
// ═══════════════════════════════════════════════════════════════════════

use crate::error::BoardError;
use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    width: u8,
    height: u8,
    tiles: Vec<Option<UnitId>>,
}

impl Board {
    pub fn new(width: u8, height: u8) -> Result<Board, BoardError> {
        if width == 0 || height == 0 {
            return Err(BoardError::EmptyBoard { width, height });
        }
        Ok(Board {
            width,
            height,
            tiles: vec![None; usize::from(width) * usize::from(height)],
        })
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn is_valid(&self, pos: Position) -> bool {
        pos.x >= 1 && pos.x <= self.width && pos.y >= 1 && pos.y <= self.height
    }

    fn index(&self, pos: Position) -> usize {
        assert!(self.is_valid(pos), "position {} is outside the {}x{} board", pos, self.width, self.height);
        usize::from(pos.y - 1) * usize::from(self.width) + usize::from(pos.x - 1)
    }

    /// # Panics
    /// If `pos` is out of bounds.
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.tiles[self.index(pos)].is_some()
    }

    /// # Panics
    /// If `pos` is out of bounds.
    pub fn unit_at(&self, pos: Position) -> Option<UnitId> {
        self.tiles[self.index(pos)]
    }

    /// Bounds-tolerant lookup used by targeting code.
    pub fn get(&self, pos: Position) -> Option<UnitId> {
        if self.is_valid(pos) { self.tiles[self.index(pos)] } else { None }
    }

    /// In-bounds and empty.
    pub fn is_free(&self, pos: Position) -> bool {
        self.is_valid(pos) && !self.is_occupied(pos)
    }

    /// # Panics
    /// If `pos` is out of bounds or already occupied.
    pub fn put(&mut self, pos: Position, unit: UnitId) {
        let i = self.index(pos);
        if let Some(existing) = self.tiles[i] {
            panic!("cannot place unit {} on {}: occupied by {}", unit, pos, existing);
        }
        self.tiles[i] = Some(unit);
    }

    /// # Panics
    /// If either position is out of bounds, `from` is empty, or `to` is occupied.
    pub fn move_unit(&mut self, from: Position, to: Position) -> UnitId {
        let src = self.index(from);
        let dst = self.index(to);
        let Some(unit) = self.tiles[src] else {
            panic!("cannot move from {}: no unit there", from);
        };
        if let Some(existing) = self.tiles[dst] {
            panic!("cannot move unit {} to {}: occupied by {}", unit, to, existing);
        }
        self.tiles[src] = None;
        self.tiles[dst] = Some(unit);
        unit
    }

    /// Removing from an empty tile is a no-op.
    ///
    /// # Panics
    /// If `pos` is out of bounds.
    pub fn remove(&mut self, pos: Position) -> Option<UnitId> {
        let i = self.index(pos);
        self.tiles[i].take()
    }

    /// In-bounds neighbours in `NEIGHBOUR_OFFSETS` order.
    pub fn neighbours(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        NEIGHBOUR_OFFSETS
            .iter()
            .filter_map(move |&(dx, dy)| pos.offset(dx, dy))
            .filter(move |p| self.is_valid(*p))
    }

    /// Every tile, x outer and y inner.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (1..=self.width).flat_map(move |x| (1..=self.height).map(move |y| Position::new(x, y)))
    }

    pub fn occupied(&self) -> impl Iterator<Item = (Position, UnitId)> + '_ {
        self.positions().filter_map(move |p| self.unit_at(p).map(|u| (p, u)))
    }
}
