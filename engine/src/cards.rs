// ═══════════════════════════════════════════════════════════════════════
// Cards - static catalog, standard decks, deck and hand containers
// ═══════════════════════════════════════════════════════════════════════

use crate::types::*;
use crate::unit::UnitStats;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

// ── Catalog ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Creature(UnitStats),
    Spell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardDef {
    pub key: &'static str,
    pub name: &'static str,
    pub cost: u32,
    pub kind: CardKind,
}

const fn creature(key: &'static str, name: &'static str, cost: u32, attack: u32, health: u32) -> CardDef {
    CardDef { key, name, cost, kind: CardKind::Creature(UnitStats { attack, health }) }
}

const fn spell(key: &'static str, name: &'static str, cost: u32) -> CardDef {
    CardDef { key, name, cost, kind: CardKind::Spell }
}

pub const CATALOG: [CardDef; 20] = [
    // Abyssian set (player 1)
    creature("bad_omen",             "Bad Omen",             1, 0, 1),
    spell   ("horn_of_the_forsaken", "Horn of the Forsaken", 1),
    creature("gloom_chaser",         "Gloom Chaser",         2, 3, 1),
    creature("shadow_watcher",       "Shadow Watcher",       3, 3, 2),
    spell   ("wraithling_swarm",     "Wraithling Swarm",     3),
    creature("nightsorrow_assassin", "Nightsorrow Assassin", 4, 4, 2),
    creature("rock_pulveriser",      "Rock Pulveriser",      2, 1, 4),
    spell   ("dark_terminus",        "Dark Terminus",        4),
    creature("bloodmoon_priestess",  "Bloodmoon Priestess",  4, 3, 3),
    creature("shadowdancer",         "Shadowdancer",         5, 5, 4),
    // Lyonar set (player 2)
    creature("skyrock_golem",        "Skyrock Golem",        2, 4, 2),
    creature("swamp_entangler",      "Swamp Entangler",      1, 0, 3),
    creature("silverguard_knight",   "Silverguard Knight",   3, 1, 5),
    creature("saberspine_tiger",     "Saberspine Tiger",     3, 3, 2),
    creature("young_flamewing",      "Young Flamewing",      4, 5, 4),
    creature("silverguard_squire",   "Silverguard Squire",   1, 1, 1),
    creature("ironcliffe_guardian",  "Ironcliffe Guardian",  5, 3, 10),
    spell   ("sundrop_elixir",       "Sundrop Elixir",       1),
    spell   ("truestrike",           "Truestrike",           1),
    spell   ("beam_shock",           "Beam Shock",           0),
];

pub fn card_def(key: &str) -> Option<&'static CardDef> {
    CATALOG.iter().find(|c| c.key == key)
}

/// Stats for the unit a card summons. Unknown keys get 1/1.
pub fn creature_stats(key: &str) -> UnitStats {
    match card_def(key).map(|c| c.kind) {
        Some(CardKind::Creature(stats)) => stats,
        _ => UnitStats { attack: 1, health: 1 },
    }
}

/// Two copies of each listed card, in list order.
fn doubled(keys: &[&str]) -> Vec<String> {
    keys.iter().flat_map(|k| [k.to_string(), k.to_string()]).collect()
}

pub fn player_one_deck() -> Vec<String> {
    doubled(&[
        "bad_omen", "horn_of_the_forsaken", "gloom_chaser", "shadow_watcher",
        "wraithling_swarm", "nightsorrow_assassin", "rock_pulveriser",
        "dark_terminus", "bloodmoon_priestess", "shadowdancer",
    ])
}

pub fn player_two_deck() -> Vec<String> {
    doubled(&[
        "skyrock_golem", "swamp_entangler", "silverguard_knight", "saberspine_tiger",
        "young_flamewing", "silverguard_squire", "ironcliffe_guardian",
        "sundrop_elixir", "truestrike", "beam_shock",
    ])
}

// ── Card instances ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInstance {
    pub id: CardId,
    pub key: String,
    pub name: String,
    pub cost: u32,
    pub kind: CardKind,
}

impl CardInstance {
    pub fn from_def(id: CardId, def: &CardDef) -> Self {
        CardInstance {
            id,
            key: def.key.to_string(),
            name: def.name.to_string(),
            cost: def.cost,
            kind: def.kind,
        }
    }

    pub fn is_creature(&self) -> bool {
        matches!(self.kind, CardKind::Creature(_))
    }
}

// ── Deck ───────────────────────────────────────────────────────────────

/// Draw pile. Cards leave from the top and never come back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Deck {
    cards: VecDeque<CardInstance>,
}

impl Deck {
    pub fn new(cards: Vec<CardInstance>) -> Self {
        Deck { cards: cards.into() }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn draw_top(&mut self) -> Option<CardInstance> {
        self.cards.pop_front()
    }

    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards.make_contiguous().shuffle(rng);
    }
}

// ── Hand ───────────────────────────────────────────────────────────────

/// Six fixed slots numbered 1..=6.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hand {
    slots: [Option<CardInstance>; HAND_SLOTS as usize],
}

impl Hand {
    pub fn new() -> Self {
        Hand::default()
    }

    fn index(slot: u8) -> Option<usize> {
        (1..=HAND_SLOTS).contains(&slot).then(|| usize::from(slot - 1))
    }

    pub fn get(&self, slot: u8) -> Option<&CardInstance> {
        Hand::index(slot).and_then(|i| self.slots[i].as_ref())
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() >= usize::from(HAND_SLOTS)
    }

    pub fn first_empty_slot(&self) -> Option<u8> {
        self.slots.iter().position(|s| s.is_none()).map(|i| i as u8 + 1)
    }

    /// Fails on an invalid or occupied slot.
    pub fn put(&mut self, slot: u8, card: CardInstance) -> bool {
        match Hand::index(slot) {
            Some(i) if self.slots[i].is_none() => {
                self.slots[i] = Some(card);
                true
            }
            _ => false,
        }
    }

    pub fn remove(&mut self, slot: u8) -> Option<CardInstance> {
        Hand::index(slot).and_then(|i| self.slots[i].take())
    }

    /// Shift cards left so occupied slots form a prefix, keeping order.
    pub fn compact_left(&mut self) {
        let cards: Vec<CardInstance> = self.slots.iter_mut().filter_map(Option::take).collect();
        for (i, card) in cards.into_iter().enumerate() {
            self.slots[i] = Some(card);
        }
    }

    /// Occupied slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &CardInstance)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|c| (i as u8 + 1, c)))
    }
}
