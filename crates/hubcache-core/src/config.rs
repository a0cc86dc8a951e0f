//! Application configuration management.
//!
//! This module handles loading and saving the deployment configuration:
//! the site origin, the current cache generation, the asset manifest, and
//! an optional storage-root override.
//!
//! Configuration is stored at `~/.config/hubcache/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::worker::{ASSET_MANIFEST, CACHE_GENERATION};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "hubcache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

fn default_origin() -> String {
    "http://localhost:8080".to_string()
}

fn default_generation() -> String {
    CACHE_GENERATION.to_string()
}

fn default_manifest() -> Vec<String> {
    ASSET_MANIFEST.iter().map(|p| p.to_string()).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_origin")]
    pub origin: String,
    #[serde(default = "default_generation")]
    pub generation: String,
    #[serde(default = "default_manifest")]
    pub manifest: Vec<String>,
    /// Overrides the platform cache directory when set.
    #[serde(default)]
    pub cache_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            generation: default_generation(),
            manifest: default_manifest(),
            cache_root: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref root) = self.cache_root {
            return Ok(root.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Manifest as the borrowed slice `install` takes.
    pub fn manifest_paths(&self) -> Vec<&str> {
        self.manifest.iter().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_manifest_includes_root_document() {
        let config = Config::default();
        assert!(config.manifest.iter().any(|p| p == "/index.html"));
        assert!(config.manifest.iter().any(|p| p == "/"));
        assert_eq!(config.generation, CACHE_GENERATION);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{"origin": "https://hub.example.org"}"#)
            .expect("Failed to parse config");
        assert_eq!(config.origin, "https://hub.example.org");
        assert_eq!(config.generation, CACHE_GENERATION);
        assert_eq!(config.manifest.len(), ASSET_MANIFEST.len());
        assert!(config.cache_root.is_none());
    }

    #[test]
    fn test_manifest_paths_borrow_the_full_manifest() {
        let config = Config::default();
        let paths = config.manifest_paths();
        assert_eq!(paths.len(), config.manifest.len());
        assert!(paths.contains(&"/index.html"));
    }

    #[test]
    fn test_cache_root_override() {
        let config = Config {
            cache_root: Some(PathBuf::from("/tmp/hub-cache")),
            ..Config::default()
        };
        assert_eq!(config.cache_dir().unwrap(), PathBuf::from("/tmp/hub-cache"));
    }
}
