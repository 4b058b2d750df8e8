use crate::model::{FormState, Method, TimeFrame};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENDPOINT_ENV: &str = "FORECAST_ENDPOINT";
const TIMEOUT_ENV: &str = "FORECAST_TIMEOUT_SECS";

/// Initial form values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormDefaults {
    pub keyword: String,
    pub time_frame: TimeFrame,
    pub method: Method,
    pub days_to_predict: u32,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            time_frame: TimeFrame::Week,
            method: Method::Log,
            days_to_predict: 7,
        }
    }
}

impl FormDefaults {
    pub fn to_form(&self) -> FormState {
        FormState {
            keyword: self.keyword.clone(),
            time_frame: self.time_frame,
            method: self.method,
            days_to_predict: self.days_to_predict.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the prediction service, without the `/predict` path
    pub endpoint: String,
    /// `None` waits forever, as a browser fetch would
    pub request_timeout_secs: Option<u64>,
    pub defaults: FormDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            defaults: FormDefaults::default(),
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".forecast-tui"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    /// Load the saved config, fall back to defaults, then apply env overrides
    pub fn load() -> Config {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path).unwrap_or_default(),
            // First run: write the defaults out so there is a file to edit
            Some(_) => {
                let config = Config::default();
                if let Err(e) = config.save() {
                    tracing::warn!(error = %e, "could not write default config");
                }
                config
            }
            None => Config::default(),
        };
        config.apply_overrides(
            env::var(ENDPOINT_ENV).ok().as_deref(),
            env::var(TIMEOUT_ENV).ok().as_deref(),
        );
        config
    }

    pub fn load_from(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }

        let contents = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                None
            }
        }
    }

    /// Environment wins over the file. A timeout of 0 disables the timeout.
    fn apply_overrides(&mut self, endpoint: Option<&str>, timeout: Option<&str>) {
        if let Some(endpoint) = endpoint.map(str::trim).filter(|e| !e.is_empty()) {
            self.endpoint = endpoint.to_string();
        }
        if let Some(raw) = timeout {
            match raw.trim().parse::<u64>() {
                Ok(0) => self.request_timeout_secs = None,
                Ok(secs) => self.request_timeout_secs = Some(secs),
                Err(_) => tracing::warn!(value = raw, "ignoring invalid {}", TIMEOUT_ENV),
            }
        }
    }

    /// `None` when unset or 0
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }
}
