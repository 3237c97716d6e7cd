//! Game configuration loaded by the host at startup.
use serde::{Deserialize, Serialize};

use crate::catalog::LevelCatalog;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for procedural levels; `None` draws a fresh layout every run.
    pub catalog_seed: Option<u64>,
    /// Seed for item draws; `None` draws from entropy.
    pub item_seed: Option<u64>,
    /// Initial sound preference.
    pub sound_enabled: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            catalog_seed: None,
            item_seed: None,
            sound_enabled: true,
        }
    }
}

impl GameConfig {
    /// Parse configuration from JSON; missing fields fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Configuration with every random stream pinned to `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            catalog_seed: Some(seed),
            item_seed: Some(seed),
            ..Self::default()
        }
    }

    /// Build the level catalog described by this configuration.
    #[must_use]
    pub fn build_catalog(&self) -> LevelCatalog {
        self.catalog_seed
            .map_or_else(LevelCatalog::from_entropy, LevelCatalog::generate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = GameConfig::from_json(r#"{ "catalog_seed": 77 }"#).unwrap();
        assert_eq!(cfg.catalog_seed, Some(77));
        assert_eq!(cfg.item_seed, None);
        assert!(cfg.sound_enabled);
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            GameConfig::from_json("{ catalog_seed"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn seeded_config_builds_reproducible_catalog() {
        let cfg = GameConfig::seeded(5);
        assert_eq!(cfg.build_catalog(), LevelCatalog::generate(5));
    }
}
