// ═══════════════════════════════════════════════════════════════════════
// Errors
//
//   ActionError  - a rejected inbound action. State is left untouched and
//                  the Display text doubles as the player notification.
//   BoardError   - board construction failure.
//   ConfigError  - match configuration that cannot be played.
//
// Contract violations against an already-built Board (bad coordinates,
// collisions) are not errors: they panic. The rules layer must
// validate every target before touching the board.
// ═══════════════════════════════════════════════════════════════════════

use crate::types::{PlayerId, Position, UnitId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("The game is over")]
    GameOver,
    #[error("Not your turn")]
    NotYourTurn,
    #[error("Not enough mana")]
    NotEnoughMana { cost: u32, available: u32 },
    #[error("Invalid target")]
    InvalidTarget,
    #[error("Target out of range")]
    OutOfRange,
    #[error("Can't attack your own unit")]
    FriendlyTarget,
    #[error("This unit can't move again this turn.")]
    CannotMove,
    #[error("This unit can't attack again this turn.")]
    CannotAttack,
    #[error("Summoned units can't move/attack this turn")]
    SummoningSickness,
    #[error("Nothing selected")]
    NoSelection,
    #[error("Hand slot {0} is empty")]
    EmptySlot(u8),
    #[error("{0} is not a creature")]
    NotACreature(String),
    #[error("Summon failed")]
    TemplateNotFound(String),
    #[error("No valid summon tiles")]
    NoSummonTiles,
    #[error("No valid spell targets")]
    NoSpellTargets,
    #[error("Unknown unit {0}")]
    UnknownUnit(UnitId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board dimensions must be non-zero, got {width}x{height}")]
    EmptyBoard { width: u8, height: u8 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("unknown card key '{0}' in deck list")]
    UnknownCard(String),
    #[error("{player} avatar start {position} is outside the board")]
    StartOutOfBounds { player: PlayerId, position: Position },
    #[error("both avatars start on {0}")]
    SharedStart(Position),
    #[error("opening hand of {0} exceeds the hand size")]
    OpeningHandTooLarge(u8),
}
