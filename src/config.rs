use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::catalog::DEFAULT_PER_PAGE;
use crate::error::{Error, Result};

pub const ANILIST_ENDPOINT: &str = "https://graphql.anilist.co";
pub const MIRROR_BASE_URL: &str = "https://animesonlinecc.to";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub mirror: MirrorConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    #[serde(default = "default_mirror_base")]
    pub base_url: String,
    /// Episode count assumed when the catalog does not know it
    #[serde(default = "default_fallback_episodes")]
    pub fallback_episodes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_opener")]
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_accent_color")]
    pub accent_color: String,
    #[serde(default = "default_true")]
    pub splash: bool,
}

fn default_endpoint() -> String {
    ANILIST_ENDPOINT.to_string()
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

fn default_mirror_base() -> String {
    MIRROR_BASE_URL.to_string()
}

fn default_fallback_episodes() -> u32 {
    24
}

fn default_opener() -> String {
    if cfg!(target_os = "macos") {
        "open".to_string()
    } else if cfg!(target_os = "windows") {
        "cmd".to_string()
    } else {
        "xdg-open".to_string()
    }
}

fn default_accent_color() -> String {
    "red".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            per_page: default_per_page(),
        }
    }
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            base_url: default_mirror_base(),
            fallback_episodes: default_fallback_episodes(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        // `start` is a cmd builtin, the empty string is its window title
        let args = if cfg!(target_os = "windows") {
            vec!["/C".to_string(), "start".to_string(), String::new()]
        } else {
            Vec::new()
        };

        Self {
            command: default_opener(),
            args,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            accent_color: default_accent_color(),
            splash: true,
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "level1").ok_or(Error::NoConfigDir)
}

pub fn config_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().to_path_buf())
}

pub fn data_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", "level1")
        .map(|d| d.data_dir().to_path_buf())
        .ok_or(Error::NoDataDir)
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    /// Read the config at `path`, writing the defaults there first if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.catalog.endpoint, ANILIST_ENDPOINT);
        assert_eq!(config.catalog.per_page, 20);
        assert_eq!(config.mirror.fallback_episodes, 24);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[mirror]\nbase_url = \"https://mirror.example\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.mirror.base_url, "https://mirror.example");
        assert_eq!(config.mirror.fallback_episodes, 24);
        assert_eq!(config.ui.accent_color, "red");
        assert!(config.ui.splash);
    }

    #[test]
    fn test_save_round_trip_keeps_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.catalog.per_page = 50;
        config.player.command = "firefox".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.catalog.per_page, 50);
        assert_eq!(loaded.player.command, "firefox");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[catalog\nendpoint = 1").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::ConfigParse(_))));
    }
}
