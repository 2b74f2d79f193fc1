// ═══════════════════════════════════════════════════════════════════════
// Match configuration
//
// Every field has a default, so a JSON file only needs the keys it
// overrides:
//
//   { "starting_health": 10, "shuffle_decks": true, "seed": 7 }
// ═══════════════════════════════════════════════════════════════════════

use crate::board::Board;
use crate::cards;
use crate::error::ConfigError;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub board_width: u8,
    pub board_height: u8,
    pub starting_health: u32,
    pub avatar_attack: u32,
    /// Mana ceiling before the first own turn; each turn start adds one.
    pub starting_max_mana: u32,
    pub opening_hand: u8,
    pub player1_start: Position,
    pub player2_start: Position,
    pub player1_deck: Vec<String>,
    pub player2_deck: Vec<String>,
    pub shuffle_decks: bool,
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            starting_health: MAX_PLAYER_HEALTH,
            avatar_attack: 2,
            starting_max_mana: 1,
            opening_hand: 3,
            player1_start: Position::new(2, 3),
            player2_start: Position::new(8, 3),
            player1_deck: cards::player_one_deck(),
            player2_deck: cards::player_two_deck(),
            shuffle_decks: false,
            seed: 0,
        }
    }
}

impl MatchConfig {
    pub fn from_json_str(json: &str) -> Result<MatchConfig, ConfigError> {
        let config: MatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<MatchConfig, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        MatchConfig::from_json_str(&text)
    }

    pub fn deck(&self, player: PlayerId) -> &[String] {
        match player {
            PlayerId::One => &self.player1_deck,
            PlayerId::Two => &self.player2_deck,
        }
    }

    pub fn start(&self, player: PlayerId) -> Position {
        match player {
            PlayerId::One => self.player1_start,
            PlayerId::Two => self.player2_start,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let board = Board::new(self.board_width, self.board_height)?;
        for player in PlayerId::ALL {
            let position = self.start(player);
            if !board.is_valid(position) {
                return Err(ConfigError::StartOutOfBounds { player, position });
            }
            if let Some(key) = self.deck(player).iter().find(|k| cards::card_def(k).is_none()) {
                return Err(ConfigError::UnknownCard(key.clone()));
            }
        }
        if self.player1_start == self.player2_start {
            return Err(ConfigError::SharedStart(self.player1_start));
        }
        if self.opening_hand > HAND_SLOTS {
            return Err(ConfigError::OpeningHandTooLarge(self.opening_hand));
        }
        Ok(())
    }
}
