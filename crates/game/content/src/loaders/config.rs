//! Combat configuration loader.

use std::path::Path;

use duel_core::{BattlefieldConfig, CombatConfig};

use crate::loaders::{LoadResult, read_file};

/// Loader for combat configuration from TOML files.
///
/// Missing keys fall back to [`CombatConfig::default`].
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.battlefield.width == 0 || config.battlefield.height == 0 {
            anyhow::bail!(
                "Battlefield must be at least 1x1 (got {}x{})",
                config.battlefield.width,
                config.battlefield.height
            );
        }

        let BattlefieldConfig {
            width,
            height,
            player1_spawn,
            player2_spawn,
        } = config.battlefield;
        let inside = |(x, y): (i32, i32)| {
            x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height
        };
        if !inside(player1_spawn) || !inside(player2_spawn) {
            anyhow::bail!(
                "Spawn cells {:?} and {:?} must lie inside the {}x{} battlefield",
                player1_spawn,
                player2_spawn,
                width,
                height
            );
        }
        if player1_spawn == player2_spawn {
            anyhow::bail!("Both heroes spawn on {:?}", player1_spawn);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse(
            r#"
            stalemate_turns = 6

            [battlefield]
            width = 8
            height = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.stalemate_turns, 6);
        assert_eq!(config.mana_regen_per_turn, 10);
        assert_eq!(config.battlefield.width, 8);
        assert_eq!(config.battlefield.player1_spawn, (0, 1));
    }

    #[test]
    fn spawns_outside_the_grid_are_rejected() {
        let error = ConfigLoader::parse(
            r#"
            [battlefield]
            width = 2
            height = 2
            player1_spawn = [0, 0]
            player2_spawn = [5, 0]
            "#,
        )
        .unwrap_err();
        assert!(error.to_string().contains("must lie inside"));
    }

    #[test]
    fn empty_battlefield_is_rejected() {
        let error = ConfigLoader::parse("[battlefield]\nwidth = 0\n").unwrap_err();
        assert!(error.to_string().contains("at least 1x1"));
    }
}
