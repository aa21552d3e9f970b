use crate::core::cache::Cache;
use crate::core::config::FmpConfig;
use crate::core::market::{MarketDataProvider, QueryParams};
use crate::core::payload::Payload;
use crate::providers::util::with_retry;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Client for the Financial Modeling Prep JSON API.
pub struct FmpProvider {
    base_url: String,
    stable_url: String,
    api_key: String,
    ttl: Duration,
    client: reqwest::Client,
    cache: Arc<dyn Cache<String, Value>>,
}

impl FmpProvider {
    pub fn new(
        config: &FmpConfig,
        api_key: &str,
        cache: Arc<dyn Cache<String, Value>>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("tradedash/0.1")
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(FmpProvider {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            stable_url: config.stable_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            ttl: config.cache_ttl(),
            client,
            cache,
        })
    }

    fn resolve_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http") {
            endpoint.to_string()
        } else {
            format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
        }
    }

    /// Performs the request; `Ok` carries anything the server answered with.
    async fn request(&self, url: &str, params: &QueryParams) -> Result<Value> {
        let query = params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .chain(std::iter::once(("apikey", self.api_key.as_str())));
        let url = Url::parse_with_params(url, query)
            .with_context(|| format!("Invalid request URL: {url}"))?;

        let response = with_retry(
            "Market data request",
            || self.client.get(url.clone()).send(),
            3,
            500,
        )
        .await
        .map_err(|e| anyhow!("Connection error: {}", e.without_url()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("Failed to read response body")?;

        if text.trim().is_empty() {
            if status.is_success() {
                return Ok(Value::Null);
            }
            return Err(anyhow!("HTTP error: {status}"));
        }

        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Ok(value),
            Err(_) if !status.is_success() => Err(anyhow!("HTTP error: {status}")),
            Err(e) => Err(anyhow!("Failed to parse JSON response: {e}")),
        }
    }
}

/// Cache key for a request. The API key never takes part in it.
fn cache_key(endpoint: &str, params: &QueryParams) -> String {
    let query: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{endpoint}?{}", query.join("&"))
}

#[async_trait]
impl MarketDataProvider for FmpProvider {
    #[instrument(name = "FmpGetJson", skip_all, fields(endpoint = %endpoint))]
    async fn get_json(&self, endpoint: &str, params: &QueryParams) -> Payload {
        let key = cache_key(endpoint, params);
        if let Some(cached) = self.cache.get(&key).await {
            return Payload::from_json(cached);
        }

        let url = self.resolve_url(endpoint);
        debug!("Requesting market data from {}", url);

        match self.request(&url, params).await {
            Ok(value) => {
                self.cache.put(key, value.clone(), Some(self.ttl)).await;
                let payload = Payload::from_json(value);
                if let Payload::Error(message) = &payload {
                    warn!(%message, "Market data API reported an error");
                }
                payload
            }
            Err(e) => {
                warn!(error = %e, "Market data request failed");
                Payload::Error(e.to_string())
            }
        }
    }

    fn stable_url(&self) -> &str {
        &self.stable_url
    }
}
