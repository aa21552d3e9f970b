//! Market data abstractions

use crate::core::payload::Payload;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Query parameters for a request, ordered so equal queries share a cache key.
pub type QueryParams = BTreeMap<String, String>;

pub const FOREX_QUOTES: &str = "quotes/forex";
pub const COMPANY_SCREENER: &str = "company-screener";
pub const ECONOMIC_CALENDAR: &str = "economic-calendar";
pub const EARNINGS_CALENDAR: &str = "earnings-calendar";
pub const DIVIDENDS_CALENDAR: &str = "dividends-calendar";

pub fn profile_endpoint(symbol: &str) -> String {
    format!("profile/{symbol}")
}

pub fn history_endpoint(symbol: &str) -> String {
    format!("historical-price-full/{symbol}")
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetches `endpoint` and classifies the response.
    ///
    /// `endpoint` is either relative to the provider's base URL or a full
    /// `http(s)` URL. Failures come back as `Payload::Error`, never as a panic
    /// or an `Err`.
    async fn get_json(&self, endpoint: &str, params: &QueryParams) -> Payload;

    /// Base URL for the newer "stable" endpoints.
    fn stable_url(&self) -> &str;

    fn stable_endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.stable_url().trim_end_matches('/'), path)
    }
}
