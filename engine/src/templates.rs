// ═══════════════════════════════════════════════════════════════════════
// Unit templates - card key → in-play unit descriptor
//
// The rules engine asks this collaborator which template a creature card
// summons. A missing template is a soft failure (mana is refunded).
// ═══════════════════════════════════════════════════════════════════════

use crate::cards::{CardKind, CATALOG};
use crate::types::PlayerId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Template id handed to the renderer when the unit is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitTemplate {
    pub id: String,
}

pub trait UnitTemplates: Send + Sync {
    fn resolve(&self, card_key: &str) -> Option<UnitTemplate>;
}

/// Fixed table built once from the card catalog.
#[derive(Debug, Clone, Default)]
pub struct StandardTemplates {
    by_key: HashMap<String, UnitTemplate>,
}

impl StandardTemplates {
    pub fn new() -> Self {
        let by_key = CATALOG
            .iter()
            .filter(|c| matches!(c.kind, CardKind::Creature(_)))
            .map(|c| (c.key.to_string(), UnitTemplate { id: format!("units/{}", c.key) }))
            .collect();
        StandardTemplates { by_key }
    }

    /// Table with no entries; every summon fails to resolve.
    pub fn empty() -> Self {
        StandardTemplates::default()
    }

    pub fn insert(&mut self, card_key: impl Into<String>, template: UnitTemplate) {
        self.by_key.insert(card_key.into(), template);
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

impl UnitTemplates for StandardTemplates {
    fn resolve(&self, card_key: &str) -> Option<UnitTemplate> {
        self.by_key.get(card_key).cloned()
    }
}

/// Template id used for avatars.
pub fn avatar_template(player: PlayerId) -> UnitTemplate {
    UnitTemplate { id: format!("avatars/avatar{}", player.number()) }
}
