use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

use crate::agent::DEFAULT_API_URL;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    pub api_url: Option<String>,
    /// First-run flag: set once when the welcome overlay is dismissed,
    /// never cleared by the application.
    #[serde(default)]
    pub seen_welcome: bool,
    /// Whether picking an example question pre-fills the chat input.
    #[serde(default = "default_prefill")]
    pub prefill_examples: bool,
}

fn default_prefill() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            seen_welcome: false,
            prefill_examples: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    /// Persist the first-run flag. Write-once: reloads whatever is on disk
    /// so concurrent edits to other fields are not clobbered.
    pub fn mark_welcome_seen(path: &Path) -> Result<()> {
        let mut config = Self::load_from(path).unwrap_or_default();
        config.seen_welcome = true;
        config.save_to(path)
    }

    /// Explicit override wins, then the config file, then the default.
    pub fn resolve_api_url(&self, override_url: Option<&str>) -> String {
        override_url
            .map(str::to_string)
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("sqlagent").join("config.json"))
    }

    pub fn log_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("sqlagent").join("sqlagent.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert!(!config.seen_welcome);
        assert!(config.prefill_examples);
        assert!(config.api_url.is_none());
    }

    #[test]
    fn mark_welcome_seen_persists_across_loads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        assert!(!Config::load_from(&path).unwrap().seen_welcome);
        Config::mark_welcome_seen(&path).unwrap();
        assert!(Config::load_from(&path).unwrap().seen_welcome);
    }

    #[test]
    fn mark_welcome_seen_keeps_other_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = Config {
            api_url: Some("http://example.test/api".to_string()),
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        Config::mark_welcome_seen(&path).unwrap();
        let reloaded = Config::load_from(&path).unwrap();
        assert!(reloaded.seen_welcome);
        assert_eq!(reloaded.api_url.as_deref(), Some("http://example.test/api"));
    }

    #[test]
    fn api_url_resolution_order() {
        let config = Config {
            api_url: Some("http://from-config/api".to_string()),
            ..Config::default()
        };
        assert_eq!(
            config.resolve_api_url(Some("http://flag/api")),
            "http://flag/api"
        );
        assert_eq!(config.resolve_api_url(None), "http://from-config/api");
        assert_eq!(Config::default().resolve_api_url(None), DEFAULT_API_URL);
    }

    #[test]
    fn older_config_without_new_fields_still_loads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"api_url": null}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(!config.seen_welcome);
        assert!(config.prefill_examples);
    }
}
