//! Application configuration loaded from a TOML file
//!
//! ```toml
//! [game]
//! pass_reward = 5.0
//!
//! [evolution]
//! population_size = 50
//!
//! [evolution.network]
//! hidden_layers = [4]
//! activation = "tanh"
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::evolution::EvolutionConfig;
use crate::game::GameConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub evolution: EvolutionConfig,
}

impl AppConfig {
    /// Read, parse and validate the configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {:?}", path))?;

        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Parse and validate configuration text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.game
            .validate()
            .map_err(|e| anyhow!("[game] {}", e))?;
        self.evolution
            .validate()
            .map_err(|e| anyhow!("[evolution] {}", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolution::Activation;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_tables() {
        let config = AppConfig::from_toml_str(
            r#"
            [game]
            pass_reward = 7.5

            [evolution]
            population_size = 12

            [evolution.network]
            hidden_layers = [4]
            activation = "relu"
            "#,
        )
        .unwrap();

        assert_eq!(config.game.pass_reward, 7.5);
        assert_eq!(config.game.survival_reward, 0.1);
        assert_eq!(config.evolution.population_size, 12);
        assert_eq!(config.evolution.max_generations, 50);
        assert_eq!(config.evolution.network.hidden_layers, vec![4]);
        assert_eq!(config.evolution.network.activation, Activation::Relu);
    }

    #[test]
    fn test_malformed_toml_is_rejected() {
        assert!(AppConfig::from_toml_str("[evolution\npopulation_size = ").is_err());
        assert!(AppConfig::from_toml_str("[evolution]\npopulation_size = \"many\"").is_err());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = AppConfig::from_toml_str("[evolution]\npopulation_size = 0").unwrap_err();
        assert!(err.to_string().contains("[evolution]"));
    }

    #[test]
    fn test_nan_values_are_rejected_at_load() {
        let err = AppConfig::from_toml_str("[evolution]\nweight_min = nan").unwrap_err();
        assert!(format!("{:#}", err).contains("weight_min"));

        assert!(AppConfig::from_toml_str("[evolution]\nsurvival_threshold = nan").is_err());
        assert!(AppConfig::from_toml_str("[game]\nspawn_y = nan").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[game]\nfloor_margin = 12.0").unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.game.floor_margin, 12.0);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(AppConfig::load(&dir.path().join("absent.toml")).is_err());
    }

    #[test]
    fn test_shipped_config_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("flappy.toml");
        assert!(AppConfig::load(&path).is_ok());
    }
}
