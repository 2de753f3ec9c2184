//! Client configuration.
//!
//! Handles loading configuration from environment variables, .env files and
//! the persisted settings file. Priority per setting is
//! explicit override > persisted setting > built-in default.

use dotenv::dotenv;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use crate::constants::{endpoints, env as vars, storage};
use crate::error::{Error, Result};

/// Configuration for the client.
#[derive(Debug, Clone)]
pub struct Config {
    /// Candidate API base URLs, in preference order
    pub api_base_urls: Vec<String>,
    /// Storage URL for uploaded images
    pub storage_url: String,
    /// Where the bearer token is persisted
    pub credentials_path: Option<PathBuf>,
}

/// Values supplied explicitly, e.g. from environment variables.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// API base URLs.
    pub api_base_urls: Option<Vec<String>>,
    /// Storage URL.
    pub storage_url: Option<String>,
}

/// Settings persisted in `settings.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersistedSettings {
    /// A single preferred base URL.
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// A full ordered list of base URLs; takes precedence over `api_base_url`.
    #[serde(default)]
    pub api_base_urls: Option<Vec<String>>,
    /// Storage URL.
    #[serde(default)]
    pub storage_url: Option<String>,
}

impl PersistedSettings {
    /// Read settings from a JSON file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs_err::read_to_string(path).map_err(|e| Error::io(e, path.to_path_buf()))?;
        serde_json::from_str(&text).map_err(|e| Error::parse(e.to_string(), path.to_path_buf()))
    }

    fn base_urls(&self) -> Option<Vec<String>> {
        self.api_base_urls
            .clone()
            .filter(|urls| !urls.is_empty())
            .or_else(|| self.api_base_url.clone().map(|url| vec![url]))
    }
}

impl Config {
    /// Host that serves profile images, i.e. `storage_url` without its
    /// trailing `/storage` segment.
    #[must_use]
    pub fn image_host(&self) -> &str {
        let url = self.storage_url.trim_end_matches('/');
        url.strip_suffix("/storage").unwrap_or(url)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_urls: endpoints::DEFAULT_API_BASE_URLS
                .iter()
                .map(ToString::to_string)
                .collect(),
            storage_url: endpoints::DEFAULT_STORAGE_URL.to_string(),
            credentials_path: None,
        }
    }
}

impl Config {
    /// Load configuration from the environment and the persisted settings file
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();

        let persisted = match settings_path() {
            Some(path) => PersistedSettings::load_from(&path)?,
            None => PersistedSettings::default(),
        };

        let mut config = Self::resolve(&overrides_from_env(), &persisted);

        config.credentials_path = env::var(vars::CREDENTIALS_PATH).ok().map_or_else(
            || dirs::data_local_dir().map(|d| d.join(storage::APP_DIR).join(storage::CREDENTIALS_FILE)),
            |path| Some(PathBuf::from(shellexpand::tilde(&path).to_string())),
        );

        if config.api_base_urls.is_empty() {
            return Err(Error::config(
                "No API base URL configured",
                "Set ZENBOOK_API_BASE_URLS or remove the empty list from settings.json",
            ));
        }

        Ok(config)
    }

    /// Merge explicit overrides and persisted settings over the defaults
    pub fn resolve(overrides: &Overrides, persisted: &PersistedSettings) -> Self {
        let mut config = Self::default();

        if let Some(urls) = overrides
            .api_base_urls
            .clone()
            .filter(|urls| !urls.is_empty())
            .or_else(|| persisted.base_urls())
        {
            config.api_base_urls = urls;
        }

        if let Some(url) = overrides
            .storage_url
            .clone()
            .or_else(|| persisted.storage_url.clone())
        {
            config.storage_url = url;
        }

        config
    }
}

/// Location of the persisted settings file
pub fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(storage::APP_DIR).join(storage::SETTINGS_FILE))
}

fn overrides_from_env() -> Overrides {
    let api_base_urls = env::var(vars::API_BASE_URLS)
        .ok()
        .map(|raw| split_urls(&raw))
        .filter(|urls| !urls.is_empty())
        .or_else(|| env::var(vars::API_BASE_URL).ok().map(|url| vec![url]));

    Overrides {
        api_base_urls,
        storage_url: env::var(vars::STORAGE_URL).ok(),
    }
}

fn split_urls(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
