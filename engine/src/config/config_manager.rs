use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};

use super::{
    ConfigContentProvider, ConfigError, ConfigSerializer, FileContentConfigProvider, Validate,
    YamlConfigSerializer,
};

/// Loads, validates and caches one config value. The first successful
/// `get_config` is cached; `set_config` writes through and replaces it.
pub struct ConfigManager<TConfigContentProvider, TConfig, TConfigSerializer = YamlConfigSerializer>
where
    TConfigContentProvider: ConfigContentProvider,
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
    TConfigSerializer: ConfigSerializer<TConfig>,
{
    config_serializer: TConfigSerializer,
    config_content_provider: TConfigContentProvider,
    config: Arc<Mutex<Option<TConfig>>>,
}

impl<TConfig> ConfigManager<FileContentConfigProvider, TConfig, YamlConfigSerializer>
where
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
{
    pub fn from_yaml_file(file_path: &str) -> Self {
        Self::new(
            FileContentConfigProvider::new(file_path.to_string()),
            YamlConfigSerializer::new(),
        )
    }
}

impl<TConfigContentProvider, TConfig, TConfigSerializer>
    ConfigManager<TConfigContentProvider, TConfig, TConfigSerializer>
where
    TConfigContentProvider: ConfigContentProvider,
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
    TConfigSerializer: ConfigSerializer<TConfig>,
{
    pub fn new(
        config_content_provider: TConfigContentProvider,
        config_serializer: TConfigSerializer,
    ) -> Self {
        Self {
            config: Arc::new(Mutex::new(None)),
            config_content_provider,
            config_serializer,
        }
    }

    pub fn get_config(&self) -> Result<TConfig, ConfigError> {
        let mut current = self.config.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(config) = current.as_ref() {
            return Ok(config.clone());
        }

        let Some(config_data) = self.config_content_provider.get_config_content()? else {
            return Ok(TConfig::default());
        };

        let config: TConfig = self.config_serializer.deserialize(&config_data)?;
        config
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        *current = Some(config.clone());
        Ok(config)
    }

    pub fn set_config(&self, config: &TConfig) -> Result<(), ConfigError> {
        config
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        let serialized_config = self.config_serializer.serialize(config)?;
        self.config_content_provider
            .set_config_content(&serialized_config)?;

        let mut current = self.config.lock().unwrap_or_else(PoisonError::into_inner);
        *current = Some(config.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::PuzzleSettings;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MemoryProvider {
        content: RefCell<Option<String>>,
    }

    impl MemoryProvider {
        fn with(content: &str) -> Self {
            Self {
                content: RefCell::new(Some(content.to_string())),
            }
        }
    }

    impl ConfigContentProvider for MemoryProvider {
        fn get_config_content(&self) -> Result<Option<String>, ConfigError> {
            Ok(self.content.borrow().clone())
        }

        fn set_config_content(&self, content: &str) -> Result<(), ConfigError> {
            *self.content.borrow_mut() = Some(content.to_string());
            Ok(())
        }
    }

    fn manager(provider: MemoryProvider) -> ConfigManager<MemoryProvider, PuzzleSettings> {
        ConfigManager::new(provider, YamlConfigSerializer::new())
    }

    #[test]
    fn test_missing_content_yields_default() {
        let manager = manager(MemoryProvider::default());

        assert_eq!(manager.get_config().unwrap(), PuzzleSettings::default());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let manager = manager(MemoryProvider::with("width: 9\ntarget_sum: 12\n"));

        let settings = manager.get_config().unwrap();

        assert_eq!(settings.width, 9);
        assert_eq!(settings.target_sum, 12);
        assert_eq!(settings.start_rows, PuzzleSettings::default().start_rows);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let manager = manager(MemoryProvider::with("width: 0\n"));

        let err = manager.get_config().unwrap_err();

        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_yaml_rejected() {
        let manager = manager(MemoryProvider::with("width: [oops"));

        assert!(matches!(
            manager.get_config(),
            Err(ConfigError::Deserialize(_))
        ));
    }

    #[test]
    fn test_set_config_writes_and_caches() {
        let manager = manager(MemoryProvider::default());
        let settings = PuzzleSettings {
            start_rows: 4,
            ..PuzzleSettings::default()
        };

        manager.set_config(&settings).unwrap();

        assert_eq!(manager.get_config().unwrap(), settings);
        let written = manager.config_content_provider.get_config_content().unwrap();
        assert!(written.unwrap().contains("start_rows: 4"));
    }

    #[test]
    fn test_set_config_refuses_invalid() {
        let manager = manager(MemoryProvider::default());
        let settings = PuzzleSettings {
            width: 0,
            ..PuzzleSettings::default()
        };

        assert!(manager.set_config(&settings).is_err());
        assert!(manager.config_content_provider.get_config_content().unwrap().is_none());
    }

    #[test]
    fn test_file_provider_treats_missing_file_as_empty() {
        let provider = FileContentConfigProvider::new("/nonexistent/numzilla.yaml".to_string());

        assert!(provider.get_config_content().unwrap().is_none());
    }
}
