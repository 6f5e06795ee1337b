use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

/// Top-level configuration for the Hark application.
///
/// Loaded from `~/.hark/config.toml` by default. Each section corresponds to
/// a concern: general process settings, recognizer model resources, and
/// session behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarkConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl HarkConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: HarkConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Default assets directory when none is given on the command line.
    pub assets_dir: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            assets_dir: ".".to_string(),
        }
    }
}

/// Recognizer model resource names, resolved under the assets directory.
///
/// The session core never parses these files; it hands resolved paths to the
/// recognizer collaborator as opaque strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Acoustic model directory name.
    pub acoustic_model_dir: String,
    /// Pronunciation dictionary file name.
    pub dictionary_file: String,
    /// Keyword list file name backing the keyword-spotting search.
    pub keyword_list_file: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            acoustic_model_dir: "en-us-ptm".to_string(),
            dictionary_file: "cmudict-en-us.dict".to_string(),
            keyword_list_file: "keyword_list.lst".to_string(),
        }
    }
}

/// Session behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name of the registered keyword-spotting search.
    pub keyword_search_name: String,
    /// Capacity of each event sink channel.
    pub sink_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            keyword_search_name: "keyword".to_string(),
            sink_capacity: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HarkConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.model.acoustic_model_dir, "en-us-ptm");
        assert_eq!(config.model.dictionary_file, "cmudict-en-us.dict");
        assert_eq!(config.model.keyword_list_file, "keyword_list.lst");
        assert_eq!(config.session.keyword_search_name, "keyword");
        assert_eq!(config.session.sink_capacity, 256);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = HarkConfig::default();
        config.session.keyword_search_name = "wakeword".to_string();
        config.save(&path).unwrap();

        let loaded = HarkConfig::load(&path).unwrap();
        assert_eq!(loaded.session.keyword_search_name, "wakeword");
        assert_eq!(loaded.model.dictionary_file, "cmudict-en-us.dict");
    }

    #[test]
    fn test_load_missing_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.toml");

        let config = HarkConfig::load_or_default(&path);
        assert_eq!(config.session.keyword_search_name, "keyword");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[general]\nlog_level = \"debug\"\n").unwrap();

        let config = HarkConfig::load(&path).unwrap();
        assert_eq!(config.general.log_level, "debug");
        // Unspecified sections keep their defaults.
        assert_eq!(config.model.acoustic_model_dir, "en-us-ptm");
        assert_eq!(config.session.sink_capacity, 256);
    }
}
