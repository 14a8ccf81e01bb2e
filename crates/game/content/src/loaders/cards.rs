//! Card pool loader.

use std::path::Path;

use duel_core::Card;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Card pool structure for TOML files (`[[cards]]` tables).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardPool {
    pub cards: Vec<Card>,
}

/// Loader for the card pool from TOML files.
pub struct CardLoader;

impl CardLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<Card>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<Card>> {
        let pool: CardPool = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse card pool TOML: {}", e))?;

        for card in &pool.cards {
            if card.effects.is_empty() {
                anyhow::bail!("Card '{}' has no effects", card.id);
            }
        }

        Ok(pool.cards)
    }
}
