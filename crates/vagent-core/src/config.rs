use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Result};

pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    /// Base URL of the assistant backend's API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Assistant to select on startup, if it exists in the directory.
    #[serde(default)]
    pub default_assistant: Option<String>,
    /// Whether switching assistants drops the current transcript.
    /// The product keeps it, so this defaults to false.
    #[serde(default)]
    pub clear_on_switch: bool,
    /// Per-read deadline on the chat stream, in seconds. Absent means wait
    /// forever, which matches the backend contract (no deadline guaranteed).
    #[serde(default)]
    pub read_timeout_secs: Option<u64>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            api_base: default_api_base(),
            default_assistant: None,
            clear_on_switch: false,
            read_timeout_secs: None,
        }
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_secs.map(Duration::from_secs)
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("vagent").join("config.json"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert!(!config.clear_on_switch);
        assert!(config.read_timeout().is_none());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::new();
        config.api_base = "http://assistant.example:9000/api".to_string();
        config.default_assistant = Some("va-1".to_string());
        config.read_timeout_secs = Some(30);
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_base, "http://assistant.example:9000/api");
        assert_eq!(loaded.default_assistant.as_deref(), Some("va-1"));
        assert_eq!(loaded.read_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"default_assistant":"va-2"}"#).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_base, DEFAULT_API_BASE);
        assert_eq!(loaded.default_assistant.as_deref(), Some("va-2"));
    }
}
