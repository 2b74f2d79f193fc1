// ═══════════════════════════════════════════════════════════════════════
// Player state - health, mana, deck and hand for one seat
// ═══════════════════════════════════════════════════════════════════════

use crate::cards::{Deck, Hand};
use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    health: u32,
    mana: u32,
    max_mana: u32,
    /// Own turns started so far.
    pub turns_taken: u32,
    pub deck: Deck,
    pub hand: Hand,
}

impl PlayerState {
    pub fn new(id: PlayerId, health: u32, max_mana: u32, deck: Deck) -> Self {
        PlayerState {
            id,
            health: health.min(MAX_PLAYER_HEALTH),
            mana: 0,
            max_mana: max_mana.min(MAX_MANA),
            turns_taken: 0,
            deck,
            hand: Hand::new(),
        }
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn set_health(&mut self, health: u32) {
        self.health = health.min(MAX_PLAYER_HEALTH);
    }

    pub fn mana(&self) -> u32 {
        self.mana
    }

    pub fn max_mana(&self) -> u32 {
        self.max_mana
    }

    pub fn set_mana(&mut self, mana: u32) {
        self.mana = mana.min(MAX_MANA);
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.mana >= cost
    }

    /// Returns false and leaves mana untouched when unaffordable.
    pub fn spend_mana(&mut self, cost: u32) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.mana -= cost;
        true
    }

    pub fn refund_mana(&mut self, amount: u32) {
        self.set_mana(self.mana.saturating_add(amount));
    }

    /// Unspent mana is forfeited when the turn ends.
    pub fn clear_mana(&mut self) {
        self.mana = 0;
    }

    /// Grow the mana ceiling by one (capped) and refill.
    pub fn begin_turn(&mut self) {
        self.turns_taken += 1;
        self.max_mana = (self.max_mana + 1).min(MAX_MANA);
        self.mana = self.max_mana;
    }
}
