//! Content factory for building a catalog from data files.

use std::path::{Path, PathBuf};

use duel_core::{Card, CombatConfig};

use crate::catalog::{ClassDefinition, ContentCatalog};
use crate::loaders::{CardLoader, ClassLoader, ConfigLoader, LoadResult};

const BUILTIN_CONFIG: &str = include_str!("../../data/config.toml");
const BUILTIN_CARDS: &str = include_str!("../../data/cards.toml");
const BUILTIN_CLASSES: &str = include_str!("../../data/classes.ron");

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── cards.toml
/// └── classes.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load the card pool from `cards.toml`.
    pub fn load_cards(&self) -> LoadResult<Vec<Card>> {
        CardLoader::load(&self.data_dir.join("cards.toml"))
    }

    /// Load the class roster from `classes.ron`.
    pub fn load_classes(&self) -> LoadResult<Vec<ClassDefinition>> {
        ClassLoader::load(&self.data_dir.join("classes.ron"))
    }

    /// Load and cross-check all three files.
    pub fn load_catalog(&self) -> LoadResult<ContentCatalog> {
        let catalog = ContentCatalog::new(
            self.load_config()?,
            self.load_cards()?,
            self.load_classes()?,
        )?;
        Ok(catalog)
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> LoadResult<ContentCatalog> {
        let catalog = ContentCatalog::new(
            ConfigLoader::parse(BUILTIN_CONFIG)?,
            CardLoader::parse(BUILTIN_CARDS)?,
            ClassLoader::parse(BUILTIN_CLASSES)?,
        )?;
        Ok(catalog)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn builtin_catalog_has_three_classes() {
        let catalog = ContentFactory::builtin().unwrap();

        let classes: Vec<&str> = catalog.class_ids().collect();
        assert_eq!(classes, vec!["mage", "priest", "warrior"]);

        let warrior = catalog.player_data("warrior", "client_1", "Ann").unwrap();
        assert_eq!(warrior.stats.max_hp, 1500);
        assert_eq!(warrior.cards.len(), 8);
        assert_eq!(catalog.config().battlefield.width, 4);
    }

    #[test]
    fn loads_catalog_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "mana_regen_per_turn = 5\n").unwrap();
        std::fs::write(
            dir.path().join("cards.toml"),
            "[[cards]]\nid = \"jab\"\ncost = 5\neffects = [{ type = \"damage\", amount = 10 }]\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("classes.ron"),
            r#"(classes: [(id: "boxer", stats: (max_hp: 50, max_mana: 20), deck: [(card: "jab", copies: 4)])])"#,
        )
        .unwrap();

        let catalog = ContentFactory::new(dir.path()).load_catalog().unwrap();

        assert_eq!(catalog.config().mana_regen_per_turn, 5);
        assert_eq!(catalog.deck_for("boxer").unwrap().len(), 4);
    }

    #[test]
    fn missing_files_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let error = ContentFactory::new(dir.path()).load_catalog().unwrap_err();
        assert!(error.to_string().contains("Failed to read file"));
    }

    #[test]
    fn unknown_deck_cards_fail_the_catalog() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "").unwrap();
        std::fs::write(dir.path().join("cards.toml"), "cards = []\n").unwrap();
        std::fs::write(
            dir.path().join("classes.ron"),
            r#"(classes: [(id: "boxer", stats: (max_hp: 50, max_mana: 20), deck: [(card: "jab")])])"#,
        )
        .unwrap();

        let error = ContentFactory::new(dir.path()).load_catalog().unwrap_err();
        assert!(error.to_string().contains("unknown card 'jab'"));
    }
}
