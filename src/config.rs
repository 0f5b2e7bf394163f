use std::path::Path;

use log::LevelFilter;

use crate::error::ConfigError;
use crate::DEFAULT_TIME_PER_TURN;

/// The longest turn a configuration may ask for, in seconds
pub const MAX_TIME_PER_TURN: u32 = 60 * 60;

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub log: LogConfig,
}

/// Rules of a game session
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seconds each player has to drop a disc
    pub time_per_turn: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            time_per_turn: DEFAULT_TIME_PER_TURN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LevelFilter,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: LevelFilter::Info,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_per_turn == 0 {
            return Err(ConfigError::Validation(
                "game.time_per_turn must be > 0".into(),
            ));
        }
        if self.time_per_turn > MAX_TIME_PER_TURN {
            return Err(ConfigError::Validation(format!(
                "game.time_per_turn must be <= {}",
                MAX_TIME_PER_TURN
            )));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.game.validate()
    }

    /// Generate a TOML string with all default values.
    pub fn default_toml() -> String {
        // a struct of plain integers and a level name always serializes
        toml::to_string_pretty(&AppConfig::default()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
        assert_eq!(config.game.time_per_turn, 15);
        assert_eq!(config.log.level, LevelFilter::Info);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[game]
time_per_turn = 30
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.game.time_per_turn, 30);
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_log_level_parses() {
        let config: AppConfig = toml::from_str("[log]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(config.log.level, LevelFilter::Debug);
    }

    #[test]
    fn test_validation_rejects_zero_time_per_turn() {
        let mut config = AppConfig::default();
        config.game.time_per_turn = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_huge_time_per_turn() {
        let mut config = AppConfig::default();
        config.game.time_per_turn = MAX_TIME_PER_TURN + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("connect4.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[game]
time_per_turn = 30
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.game.time_per_turn, 30);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("connect4.toml");
        std::fs::write(&path, "[game]\ntime_per_turn = 0\n").unwrap();

        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Validation(_))
        ));

        std::fs::write(&path, "[game\n").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
