// ═══════════════════════════════════════════════════════════════════════
// Core types - players, positions, ids and the small enums shared by
// every rules module.
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};

// ── Constants ──────────────────────────────────────────────────────────

pub const BOARD_WIDTH: u8 = 9;
pub const BOARD_HEIGHT: u8 = 5;

/// Player health and avatar max health share this ceiling.
pub const MAX_PLAYER_HEALTH: u32 = 20;
pub const MAX_MANA: u32 = 9;
pub const HAND_SLOTS: u8 = 6;
pub const FATIGUE_DAMAGE: u32 = 1;

/// Notification display time in seconds.
pub const NOTICE_SECONDS: u32 = 2;
pub const GAME_END_NOTICE_SECONDS: u32 = 5;

// ── Players ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    pub fn opponent(self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Index into per-player arrays.
    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// The seat driven by inbound actions.
pub const HUMAN: PlayerId = PlayerId::One;
/// The seat played by the scripted opponent.
pub const SCRIPTED: PlayerId = PlayerId::Two;

// ── Positions ──────────────────────────────────────────────────────────

/// 1-based tile coordinate. Ordering is column-major (x, then y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: u8,
    pub y: u8,
}

/// The 8 surrounding offsets: dx outer, dy inner, centre skipped.
pub const NEIGHBOUR_OFFSETS: [(i8, i8); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

impl Position {
    pub const fn new(x: u8, y: u8) -> Self {
        Position { x, y }
    }

    /// Shift by an offset. None if the result would leave the 1-based
    /// coordinate space; board bounds are checked separately.
    pub fn offset(self, dx: i8, dy: i8) -> Option<Position> {
        let x = i16::from(self.x) + i16::from(dx);
        let y = i16::from(self.y) + i16::from(dy);
        if x < 1 || y < 1 || x > i16::from(u8::MAX) || y > i16::from(u8::MAX) {
            return None;
        }
        Some(Position::new(x as u8, y as u8))
    }

    /// King-move distance.
    pub fn chebyshev(self, other: Position) -> u8 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    pub fn is_adjacent(self, other: Position) -> bool {
        self != other && self.chebyshev(other) == 1
    }

    pub fn manhattan(self, other: Position) -> u8 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

// ── Ids ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-match id source for units and card instances.
/// Unit ids increase monotonically, so registry order is creation order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdAllocator {
    next_unit: u32,
    next_card: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        IdAllocator { next_unit: 1, next_card: 1 }
    }

    pub fn unit(&mut self) -> UnitId {
        let id = UnitId(self.next_unit);
        self.next_unit += 1;
        id
    }

    pub fn card(&mut self) -> CardId {
        let id = CardId(self.next_card);
        self.next_card += 1;
        id
    }
}

// ── Presentation vocabulary ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileMode {
    Normal,
    Move,
    Attack,
    Summon,
    SpellTarget,
}

impl TileMode {
    /// Numeric mode understood by the tile renderer.
    /// Summon shares the move colour and spell targets share the attack colour.
    pub fn code(self) -> u8 {
        match self {
            TileMode::Normal => 0,
            TileMode::Move | TileMode::Summon => 1,
            TileMode::Attack | TileMode::SpellTarget => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardMode {
    Normal,
    Selected,
}

impl CardMode {
    pub fn code(self) -> u8 {
        match self {
            CardMode::Normal => 0,
            CardMode::Selected => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Animation {
    Idle,
    Attack,
    Hit,
    Death,
    Move,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    Summon,
}

// ── Outcome ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Winner(PlayerId),
    Draw,
}

impl Outcome {
    /// Banner text as seen from the human seat.
    pub fn banner(self) -> &'static str {
        match self {
            Outcome::Winner(p) if p == HUMAN => "You win!",
            Outcome::Winner(_) => "You lose!",
            Outcome::Draw => "Draw!",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(p) => write!(f, "{} wins", p),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}
