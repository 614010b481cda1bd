use numzilla_engine::config::{
    ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer,
};
use numzilla_engine::logger::Verbosity;
use numzilla_engine::puzzle::{PuzzleSettings, SettingsError};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "numzilla.yaml";

pub fn get_config_manager(
    path: &str,
) -> ConfigManager<FileContentConfigProvider, Config, YamlConfigSerializer> {
    ConfigManager::from_yaml_file(path)
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub puzzle: PuzzleSettings,
    pub verbosity: Verbosity,
}

impl Validate for Config {
    type Error = SettingsError;

    fn validate(&self) -> Result<(), SettingsError> {
        self.puzzle.validate()
    }
}

/// Command line values that take precedence over the file.
#[derive(Debug, Default, Clone, Copy)]
pub struct Overrides {
    pub width: Option<usize>,
    pub rows: Option<usize>,
    pub target: Option<u8>,
    pub verbosity: Option<Verbosity>,
}

impl Config {
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(width) = overrides.width {
            self.puzzle.width = width;
        }
        if let Some(rows) = overrides.rows {
            self.puzzle.start_rows = rows;
        }
        if let Some(target) = overrides.target {
            self.puzzle.target_sum = target;
        }
        if let Some(verbosity) = overrides.verbosity {
            self.verbosity = verbosity;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numzilla_engine::config::{ConfigContentProvider, ConfigSerializer};

    fn get_temp_file_path() -> String {
        let mut path = std::env::temp_dir();
        path.push(format!("numzilla_test_{}.yaml", std::process::id()));
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let config = Config::default().with_overrides(Overrides {
            width: Some(7),
            rows: Some(3),
            target: None,
            verbosity: Some(Verbosity::Events),
        });

        assert_eq!(config.puzzle.width, 7);
        assert_eq!(config.puzzle.start_rows, 3);
        assert_eq!(config.puzzle.target_sum, 10);
        assert_eq!(config.verbosity, Verbosity::Events);
    }

    #[test]
    fn test_config_yaml_round_trip_through_file() {
        let path = get_temp_file_path();
        let manager = get_config_manager(&path);
        let config = Config::default().with_overrides(Overrides {
            width: Some(8),
            ..Overrides::default()
        });

        manager.set_config(&config).unwrap();
        let reloaded = get_config_manager(&path).get_config().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let serializer = YamlConfigSerializer::new();

        let config: Config = serializer
            .deserialize("verbosity: solver\npuzzle:\n  start_rows: 2\n")
            .unwrap();

        assert_eq!(config.verbosity, Verbosity::Solver);
        assert_eq!(config.puzzle.start_rows, 2);
        assert_eq!(config.puzzle.width, 10);
    }

    #[test]
    fn test_invalid_override_fails_validation() {
        let config = Config::default().with_overrides(Overrides {
            target: Some(30),
            ..Overrides::default()
        });

        assert!(config.validate().is_err());
        let provider = FileContentConfigProvider::new(get_temp_file_path() + ".missing");
        assert!(provider.get_config_content().unwrap().is_none());
    }
}
