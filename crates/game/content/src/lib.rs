//! Data-driven content definitions and loaders.
//!
//! This crate houses the static duel content and provides loaders for
//! RON/TOML data files:
//! - Combat configuration (TOML)
//! - Card pool (TOML)
//! - Class roster with deck lists (RON)
//!
//! Content is consumed by the server when seating players and never appears
//! in match state except through the engine's own copies.

pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{CatalogIssue, ClassDefinition, ContentCatalog, DeckEntry};

#[cfg(feature = "loaders")]
pub use loaders::{CardLoader, ClassLoader, ConfigLoader, ContentFactory, LoadResult};
