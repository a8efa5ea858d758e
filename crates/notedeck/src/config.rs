use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::theme;

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "notedeck";

pub const VALID_KEYS: &[&str] = &[
    "defaults.theme",
    "defaults.show_progress_bar",
    "defaults.show_slide_numbers",
    "defaults.reduced_motion",
    "defaults.start_mode",
    "site.base_url",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<SiteConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_progress_bar: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_slide_numbers: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduced_motion: Option<bool>,

    /// `first` or a 1-based slide number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_mode: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Public site root; author profile links are `<base_url>/<username>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `notedeck config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Invalid config at {}", path.display()))?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                log::debug!("using default config: {e:#}");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# notedeck configuration\n{yaml}");
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    fn defaults_mut(&mut self) -> &mut DefaultsConfig {
        self.defaults.get_or_insert_with(DefaultsConfig::default)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "defaults.theme" => {
                let ids = theme::theme_ids();
                if !ids.contains(&value) {
                    anyhow::bail!("Invalid theme: {value}. Must be one of: {}.", ids.join(", "));
                }
                self.defaults_mut().theme = Some(value.to_string());
            }
            "defaults.show_progress_bar" => {
                self.defaults_mut().show_progress_bar = Some(parse_bool(key, value)?);
            }
            "defaults.show_slide_numbers" => {
                self.defaults_mut().show_slide_numbers = Some(parse_bool(key, value)?);
            }
            "defaults.reduced_motion" => {
                self.defaults_mut().reduced_motion = Some(parse_bool(key, value)?);
            }
            "defaults.start_mode" => {
                if value != "first" && !value.parse::<usize>().is_ok_and(|n| n >= 1) {
                    anyhow::bail!(
                        "Invalid start_mode: {value}. Must be 'first' or a slide number."
                    );
                }
                self.defaults_mut().start_mode = Some(value.to_string());
            }
            "site.base_url" => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    anyhow::bail!(
                        "Invalid base_url: {value}. Must start with http:// or https://."
                    );
                }
                self.site.get_or_insert_with(SiteConfig::default).base_url =
                    Some(value.trim_end_matches('/').to_string());
            }
            _ => anyhow::bail!(
                "Unknown config key: {key}. Valid keys: {}",
                VALID_KEYS.join(", ")
            ),
        }
        Ok(())
    }

    pub fn theme(&self) -> Option<&str> {
        self.defaults.as_ref()?.theme.as_deref()
    }

    pub fn show_progress_bar(&self) -> bool {
        self.defaults
            .as_ref()
            .and_then(|d| d.show_progress_bar)
            .unwrap_or(true)
    }

    pub fn show_slide_numbers(&self) -> bool {
        self.defaults
            .as_ref()
            .and_then(|d| d.show_slide_numbers)
            .unwrap_or(true)
    }

    pub fn reduced_motion(&self) -> bool {
        self.defaults
            .as_ref()
            .and_then(|d| d.reduced_motion)
            .unwrap_or(false)
    }

    /// 0-based slide to start on.
    pub fn start_slide(&self) -> usize {
        match self.defaults.as_ref().and_then(|d| d.start_mode.as_deref()) {
            Some("first") | None => 0,
            Some(n) => n.parse::<usize>().map_or(0, |n| n.saturating_sub(1)),
        }
    }

    pub fn base_url(&self) -> Option<&str> {
        self.site.as_ref()?.base_url.as_deref()
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("Invalid value for {key}: {value}. Must be 'true' or 'false'."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let config = Config::default();
        assert_eq!(config.theme(), None);
        assert!(config.show_progress_bar());
        assert!(config.show_slide_numbers());
        assert!(!config.reduced_motion());
        assert_eq!(config.start_slide(), 0);
        assert_eq!(config.base_url(), None);
    }

    #[test]
    fn test_set_valid_values() {
        let mut config = Config::default();
        config.set("defaults.theme", "ocean").unwrap();
        config.set("defaults.show_progress_bar", "false").unwrap();
        config.set("defaults.reduced_motion", "yes").unwrap();
        config.set("defaults.start_mode", "3").unwrap();
        config.set("site.base_url", "https://notes.example/").unwrap();

        assert_eq!(config.theme(), Some("ocean"));
        assert!(!config.show_progress_bar());
        assert!(config.reduced_motion());
        assert_eq!(config.start_slide(), 2);
        assert_eq!(config.base_url(), Some("https://notes.example"));
    }

    #[test]
    fn test_set_rejects_invalid_values() {
        let mut config = Config::default();
        let err = config.set("defaults.theme", "neon").unwrap_err();
        assert!(err.to_string().contains("midnight"));
        assert!(config.set("defaults.show_slide_numbers", "maybe").is_err());
        assert!(config.set("defaults.start_mode", "0").is_err());
        assert!(config.set("defaults.start_mode", "overview").is_err());
        assert!(config.set("site.base_url", "notes.example").is_err());
        let err = config.set("defaults.aspect", "16:9").unwrap_err();
        assert!(err.to_string().contains("defaults.start_mode"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(FILENAME);

        let mut config = Config::default();
        config.set("defaults.theme", "paper").unwrap();
        config.set("defaults.start_mode", "first").unwrap();
        config.set("site.base_url", "https://notes.example").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_mentions_config_show() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join(FILENAME)).unwrap_err();
        assert!(err.to_string().contains("config show"));
    }

    #[test]
    fn test_unset_sections_are_not_written() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        assert!(!yaml.contains("defaults"));
        assert!(!yaml.contains("site"));
    }
}
