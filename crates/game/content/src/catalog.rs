//! In-memory content catalog: combat config, card pool and class roster.

use std::collections::BTreeMap;

use duel_core::{Card, CardId, ClassStats, CombatConfig, PlayerData};

/// One line of a class deck list.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeckEntry {
    pub card: CardId,
    #[cfg_attr(feature = "serde", serde(default = "DeckEntry::single"))]
    pub copies: u32,
}

impl DeckEntry {
    pub fn new(card: impl Into<CardId>, copies: u32) -> Self {
        Self {
            card: card.into(),
            copies,
        }
    }

    #[cfg(feature = "serde")]
    fn single() -> u32 {
        1
    }
}

/// A pickable class: stats plus the deck list its players start with.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassDefinition {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub stats: ClassStats,
    #[cfg_attr(feature = "serde", serde(default))]
    pub deck: Vec<DeckEntry>,
}

/// Problems found while cross-checking classes against the card pool.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogIssue {
    #[error("card '{0}' is defined twice")]
    DuplicateCard(CardId),

    #[error("class '{0}' is defined twice")]
    DuplicateClass(String),

    #[error("class '{class_id}' lists unknown card '{card}'")]
    UnknownCard { class_id: String, card: CardId },
}

/// Everything the server needs to seat players: config, classes and cards.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentCatalog {
    config: CombatConfig,
    cards: BTreeMap<CardId, Card>,
    classes: BTreeMap<String, ClassDefinition>,
}

impl ContentCatalog {
    /// Builds a catalog, rejecting duplicate ids and deck lists that
    /// reference cards outside the pool.
    pub fn new(
        config: CombatConfig,
        cards: Vec<Card>,
        classes: Vec<ClassDefinition>,
    ) -> Result<Self, CatalogIssue> {
        let mut card_map = BTreeMap::new();
        for card in cards {
            if card_map.contains_key(&card.id) {
                return Err(CatalogIssue::DuplicateCard(card.id));
            }
            card_map.insert(card.id.clone(), card);
        }

        let mut class_map = BTreeMap::new();
        for class in classes {
            if let Some(entry) = class
                .deck
                .iter()
                .find(|entry| !card_map.contains_key(&entry.card))
            {
                return Err(CatalogIssue::UnknownCard {
                    class_id: class.id.clone(),
                    card: entry.card.clone(),
                });
            }
            if class_map.contains_key(&class.id) {
                return Err(CatalogIssue::DuplicateClass(class.id));
            }
            class_map.insert(class.id.clone(), class);
        }

        Ok(Self {
            config,
            cards: card_map,
            classes: class_map,
        })
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards.get(id)
    }

    pub fn class(&self, id: &str) -> Option<&ClassDefinition> {
        self.classes.get(id)
    }

    pub fn has_class(&self, id: &str) -> bool {
        self.classes.contains_key(id)
    }

    pub fn class_ids(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Expands a class deck list into card instances, in list order.
    pub fn deck_for(&self, class_id: &str) -> Option<Vec<Card>> {
        let class = self.class(class_id)?;
        let cards = class
            .deck
            .iter()
            .filter_map(|entry| {
                let card = self.cards.get(&entry.card)?;
                Some(std::iter::repeat_n(card.clone(), entry.copies as usize))
            })
            .flatten()
            .collect();
        Some(cards)
    }

    /// Engine input for a player of `class_id`.
    pub fn player_data(
        &self,
        class_id: &str,
        player_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Option<PlayerData> {
        let class = self.class(class_id)?;
        let cards = self.deck_for(class_id)?;
        Some(PlayerData::new(player_id, name, class_id, class.stats).with_cards(cards))
    }
}
