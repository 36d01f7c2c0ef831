use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::clock::{Clock, FixedClock, SystemClock};
use crate::error::{HomeError, Result};
use crate::models::parse_date;

/// Environment variable overriding the data directory.
pub const ENV_DB: &str = "HOMETASK_DB";
/// Environment variable naming the current member (id or name).
pub const ENV_USER: &str = "HOMETASK_USER";
/// Environment variable pinning "today" to a fixed `YYYY-MM-DD` date.
pub const ENV_TODAY: &str = "HOMETASK_TODAY";
/// Environment variable pointing at an alternative config file.
pub const ENV_CONFIG: &str = "HOMETASK_CONFIG";

const DEFAULT_BASE_URL: &str = "http://localhost:5173";

/// User settings, read from `config.toml` and the environment.
///
/// ```toml
/// data_dir = "/home/sam/.local/share/hometask"
/// user = "Sam"
/// base_url = "https://home.example.org"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Member acting as "me" for the assigned-to-me filter.
    #[serde(default)]
    pub user: Option<String>,
    /// Public address of the web app, used in invite links.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default, with = "crate::models::date_only")]
    pub today: Option<NaiveDate>,
}

impl Settings {
    /// Loads the config file (if any), then applies environment overrides.
    pub fn load() -> Result<Settings> {
        let mut settings = match config_path() {
            Some(path) if path.exists() => {
                debug!(path = %path.display(), "loading config file");
                let raw = fs::read_to_string(&path)
                    .map_err(|source| HomeError::Io { path: path.clone(), source })?;
                Settings::from_toml_str(&raw)?
            }
            _ => Settings::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    pub fn from_toml_str(raw: &str) -> Result<Settings> {
        toml::from_str(raw).map_err(|e| HomeError::Config(e.to_string()))
    }

    /// Overrides fields from `lookup`, which maps variable names to values.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_DB).filter(|v| !v.is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(user) = lookup(ENV_USER).filter(|v| !v.is_empty()) {
            self.user = Some(user);
        }
        if let Some(raw) = lookup(ENV_TODAY).filter(|v| !v.is_empty()) {
            let today = parse_date(&raw).ok_or_else(|| {
                HomeError::Config(format!("{} must be a date, got '{}'", ENV_TODAY, raw))
            })?;
            self.today = Some(today);
        }
        Ok(())
    }

    /// Directory holding the JSON files.
    ///
    /// The configured directory if any, else `hometask` under the platform's
    /// local data directory (`~/.local/share/hometask` on Linux), else `.`.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
            p.push("hometask");
            p
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn clock(&self) -> Box<dyn Clock> {
        match self.today {
            Some(day) => Box::new(FixedClock(day)),
            None => Box::new(SystemClock),
        }
    }
}

fn config_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var(ENV_CONFIG) {
        return Some(PathBuf::from(p));
    }
    dirs::config_dir().map(|mut p| {
        p.push("hometask");
        p.push("config.toml");
        p
    })
}
