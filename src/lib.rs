pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::{CalendarOptions, ScreenerOptions, StrengthOptions, TrendOptions};
use crate::core::config::{API_KEY_ENV, AppConfig};
use crate::providers::FmpProvider;
use crate::store::MemoryCache;
use anyhow::Result;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub enum AppCommand {
    Strength(StrengthOptions),
    Screener(ScreenerOptions),
    Calendar(CalendarOptions),
    Profile(String),
    Trend(TrendOptions),
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    run_command_with_env_key(command, config_path, std::env::var(API_KEY_ENV).ok()).await
}

/// Runs `command` with `env_key` standing in for the `FMP_API_KEY` variable.
pub async fn run_command_with_env_key(
    command: AppCommand,
    config_path: Option<&str>,
    env_key: Option<String>,
) -> Result<()> {
    info!("Trading dashboard starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    let fmp = &config.providers.fmp;
    debug!(
        base_url = %fmp.base_url,
        stable_url = %fmp.stable_url,
        cache_ttl_secs = fmp.cache_ttl_secs,
        "Loaded config"
    );

    let api_key = fmp.resolve_api_key(env_key)?;
    let cache = Arc::new(MemoryCache::<String, Value>::new());
    let provider = FmpProvider::new(fmp, &api_key, cache)?;

    match command {
        AppCommand::Strength(options) => cli::strength::run(&provider, &options).await,
        AppCommand::Screener(options) => cli::screener::run(&provider, &options).await,
        AppCommand::Calendar(options) => cli::calendar::run(&provider, &options).await,
        AppCommand::Profile(symbol) => cli::profile::run(&provider, &symbol).await,
        AppCommand::Trend(options) => cli::trend::run(&provider, &options).await,
    }
}
