use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};
use tracing::debug;

/// Environment variable that overrides the configured API key.
pub const API_KEY_ENV: &str = "FMP_API_KEY";

fn default_base_url() -> String {
    "https://financialmodelingprep.com/api/v3".to_string()
}

fn default_stable_url() -> String {
    "https://financialmodelingprep.com/stable".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FmpConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_stable_url")]
    pub stable_url: String,
    pub api_key: Option<String>,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FmpConfig {
    fn default() -> Self {
        FmpConfig {
            base_url: default_base_url(),
            stable_url: default_stable_url(),
            api_key: None,
            cache_ttl_secs: default_cache_ttl_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl FmpConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Picks the API key, preferring `env_value` over the configured one.
    pub fn resolve_api_key(&self, env_value: Option<String>) -> Result<String> {
        let key = env_value
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()));
        match key {
            Some(key) => Ok(key.trim().to_string()),
            None => bail!(
                "No API key configured. Set {API_KEY_ENV} or providers.fmp.api_key in the config file"
            ),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub fmp: FmpConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl AppConfig {
    /// Loads the config from the default location, falling back to built-in
    /// defaults when no file exists there.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        debug!("Loading default config");
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "tradedash", "tradedash")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
