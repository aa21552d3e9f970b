//! Currency strength meter.
//!
//! Each major pair is quoted against USD, so its intraday percentage change
//! translates directly into a score for the non-USD leg. USD itself is the
//! pivot and always scores zero.
use crate::core::payload::Payload;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;
use tracing::debug;

/// The pivot every pair in the basket is quoted against.
pub const PIVOT: &str = "USD";

/// Major pairs used for the meter, in display order.
pub const BASKET: [&str; 7] = [
    "EURUSD", "GBPUSD", "USDJPY", "USDCHF", "AUDUSD", "USDCAD", "NZDUSD",
];

/// One FX pair observation as returned by the forex quotes endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    #[serde(rename = "changesPercentage", default)]
    pub changes_percentage: Option<f64>,
}

impl Quote {
    pub fn new(symbol: &str, changes_percentage: Option<f64>) -> Self {
        Self {
            symbol: symbol.to_string(),
            changes_percentage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyScore {
    pub currency: String,
    pub strength: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StrengthError {
    #[error("No forex data available{}", detail(.0))]
    NoData(Option<String>),
    #[error("No recent data found for the major pairs")]
    EmptyBasket,
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    /// `XXXUSD`: the pair rises when XXX strengthens.
    BaseQuoted,
    /// `USDYYY`: the pair rises when YYY weakens.
    UsdQuoted,
}

/// Resolves a basket symbol into its non-USD currency and orientation.
fn classify(symbol: &str) -> Option<(&str, Orientation)> {
    if !BASKET.contains(&symbol) {
        return None;
    }
    let (base, quote) = symbol.split_at(3);
    if quote == PIVOT {
        Some((base, Orientation::BaseQuoted))
    } else {
        Some((quote, Orientation::UsdQuoted))
    }
}

/// Scores every basket currency found in `quotes` and ranks them strongest first.
///
/// A missing change counts as `0.0`. Symbols outside the basket are ignored,
/// and basket currencies whose pair is absent are left out of the result.
/// Equal scores keep the order in which currencies first appeared, with USD
/// after all of them.
pub fn compute_strength(quotes: &[Quote]) -> Result<Vec<CurrencyScore>, StrengthError> {
    if quotes.is_empty() {
        return Err(StrengthError::NoData(None));
    }

    let mut scores: Vec<CurrencyScore> = Vec::with_capacity(BASKET.len() + 1);
    for quote in quotes {
        let Some((currency, orientation)) = classify(&quote.symbol) else {
            continue;
        };
        let change = quote.changes_percentage.unwrap_or(0.0);
        let strength = match orientation {
            Orientation::BaseQuoted => change,
            Orientation::UsdQuoted => -change,
        };
        // `-0.0` would render as "-0.00"
        let strength = if strength == 0.0 { 0.0 } else { strength };

        match scores.iter_mut().find(|s| s.currency == currency) {
            Some(existing) => existing.strength = strength,
            None => scores.push(CurrencyScore {
                currency: currency.to_string(),
                strength,
            }),
        }
    }

    if scores.is_empty() {
        return Err(StrengthError::EmptyBasket);
    }

    scores.push(CurrencyScore {
        currency: PIVOT.to_string(),
        strength: 0.0,
    });
    scores.sort_by(|a, b| {
        b.strength
            .partial_cmp(&a.strength)
            .unwrap_or(Ordering::Equal)
    });
    debug!(?scores, "Computed currency strength");
    Ok(scores)
}

/// Runs the meter on a provider payload.
///
/// Anything other than a list of quote records is reported as missing data
/// without running the computation.
pub fn strength_from_payload(payload: &Payload) -> Result<Vec<CurrencyScore>, StrengthError> {
    match payload {
        Payload::Records(_) => {
            let quotes: Vec<Quote> = payload.parse_records().unwrap_or_default();
            compute_strength(&quotes)
        }
        Payload::Error(message) => Err(StrengthError::NoData(Some(message.clone()))),
        Payload::Document(_) | Payload::Empty => Err(StrengthError::NoData(None)),
    }
}
