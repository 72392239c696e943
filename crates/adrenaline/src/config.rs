//! Application configuration
//!
//! Configuration loaded from `.adrenaline.toml`.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

const CONFIG_FILE: &str = ".adrenaline.toml";

/// Environment variable that overrides the configured API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Application configuration loaded from .adrenaline.toml
#[derive(Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Key for the edit-suggestion service
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the edit-suggestion service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for edits
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default)]
    pub temperature: f32,

    /// Nucleus sampling mass
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1/".to_string()
}

fn default_model() -> String {
    "code-davinci-edit-001".to_string()
}

fn default_top_p() -> f32 {
    1.0
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: 0.0,
            top_p: default_top_p(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl AppConfig {
    /// Load config from CWD first, then home directory, or use defaults.
    ///
    /// `OPENAI_API_KEY` takes precedence over a key from the file.
    pub fn load() -> Self {
        let mut config = match load_config_file() {
            Some(content) => Self::parse(&content),
            None => {
                log::debug!("Using default app config");
                Self::default()
            }
        };

        if let Ok(key) = env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                log::debug!("Using API key from {}", API_KEY_ENV);
                config.api_key = Some(key);
            }
        }

        config
    }

    /// Parse config file content, falling back to defaults on error
    pub fn parse(content: &str) -> Self {
        match toml::from_str(content) {
            Ok(config) => {
                log::info!("Loaded app config from file");
                config
            }
            Err(e) => {
                log::warn!("Failed to parse config file: {}", e);
                Self::default()
            }
        }
    }

    /// The request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Load config file content from CWD first, then home directory
fn load_config_file() -> Option<String> {
    if let Ok(content) = std::fs::read_to_string(CONFIG_FILE) {
        log::debug!("Loaded config from {}", CONFIG_FILE);
        return Some(content);
    }

    let home_config = home_config_path()?;
    match std::fs::read_to_string(&home_config) {
        Ok(content) => {
            log::debug!("Loaded config from {}", home_config.display());
            Some(content)
        }
        Err(_) => None,
    }
}

/// ~/.adrenaline.toml, if a home directory is known
fn home_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_FILE))
}
