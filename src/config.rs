use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::generate::GeneratorConfig;

/// Runtime configuration: where the state lives and how to reach the
/// generation service. The API key comes from the environment.
pub struct Config {
    data_dir: PathBuf,
    api_key: Option<String>,
}

impl Config {
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("duet")
        });

        std::fs::create_dir_all(&data_dir)?;

        Ok(Config {
            data_dir,
            api_key: std::env::var("GEMINI_API_KEY").ok(),
        })
    }

    pub fn state_file(&self) -> PathBuf {
        self.data_dir.join("state.json")
    }

    pub fn generator(&self, model: Option<String>) -> Result<GeneratorConfig> {
        let api_key = self
            .api_key
            .clone()
            .ok_or_else(|| AppError::Config("GEMINI_API_KEY is not set".to_string()))?;

        let mut config = GeneratorConfig::new(api_key);
        if let Some(model) = model {
            config.model = model;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_with_key(dir: &TempDir, api_key: Option<&str>) -> Config {
        Config {
            data_dir: dir.path().to_path_buf(),
            api_key: api_key.map(|k| k.to_string()),
        }
    }

    #[test]
    fn test_state_file_under_data_dir() {
        let dir = TempDir::new().unwrap();
        let config = Config::new(Some(dir.path().join("nested"))).unwrap();

        assert_eq!(config.state_file(), dir.path().join("nested").join("state.json"));
        assert!(dir.path().join("nested").is_dir());
    }

    #[test]
    fn test_generator_model_override() {
        let dir = TempDir::new().unwrap();
        let config = config_with_key(&dir, Some("test-key"));

        let generator = config.generator(Some("custom-model".to_string())).unwrap();
        assert_eq!(generator.model, "custom-model");
        assert_eq!(generator.api_key, "test-key");
        assert_eq!(generator.temperature, 0.7);
    }

    #[test]
    fn test_generator_requires_api_key() {
        let dir = TempDir::new().unwrap();
        let config = config_with_key(&dir, None);

        assert!(matches!(config.generator(None), Err(AppError::Config(_))));
    }
}
