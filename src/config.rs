use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono_tz::Tz;
use directories::ProjectDirs;
use serde::Deserialize;

use crate::daily::{parse_timezone, DEFAULT_TIMEZONE};
use crate::error::ConfigurationError;
use crate::words::WordList;

pub const DEFAULT_GAME_NAME: &str = "Wörtle";
pub const DEFAULT_SHARE_LINK: &str = "https://wortle.example/";

/// Settings from `config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// IANA name of the zone whose midnight starts a new word.
    pub timezone: String,
    pub game_name: String,
    pub share_link: String,
    /// Replaces the built in word list.
    pub word_list: Option<PathBuf>,
    pub log_level: String,
    /// Delay between revealing two tiles of a row.
    pub reveal_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            timezone: DEFAULT_TIMEZONE.to_string(),
            game_name: DEFAULT_GAME_NAME.to_string(),
            share_link: DEFAULT_SHARE_LINK.to_string(),
            word_list: None,
            log_level: "info".to_string(),
            reveal_delay_ms: 250,
        }
    }
}

impl Config {
    /// Load `path` if given, otherwise the default config file if it exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let path = config_file_path()?;
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Error reading config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Error parsing config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn timezone(&self) -> Result<Tz, ConfigurationError> {
        parse_timezone(&self.timezone)
    }

    pub fn word_list(&self) -> Result<WordList> {
        match &self.word_list {
            Some(path) => WordList::from_file(path),
            None => Ok(WordList::builtin()?),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "wortle").context("Could not determine home directory")
}

/// Set to keep config and data in one directory.
fn wortle_home() -> Option<PathBuf> {
    std::env::var_os("WORTLE_HOME").map(PathBuf::from)
}

pub fn config_dir() -> Result<PathBuf> {
    if let Some(home) = wortle_home() {
        return Ok(home);
    }
    Ok(project_dirs()?.config_dir().to_path_buf())
}

pub fn data_dir() -> Result<PathBuf> {
    if let Some(home) = wortle_home() {
        return Ok(home.join("data"));
    }
    Ok(project_dirs()?.data_local_dir().to_path_buf())
}

pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

pub fn store_path(data_dir: &Path) -> PathBuf {
    data_dir.join("store.json")
}

pub fn log_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}
