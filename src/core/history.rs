//! Daily price history.

use crate::core::indicators::sma;
use crate::core::payload::Payload;
use chrono::NaiveDate;
use serde::Deserialize;

/// Newest bars kept from a history response.
pub const LOOKBACK_DAYS: usize = 200;
pub const FAST_WINDOW: usize = 20;
pub const SLOW_WINDOW: usize = 50;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candle {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub change_percent: Option<f64>,
}

/// A candle with the moving averages ending on its date.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub candle: Candle,
    pub sma_fast: Option<f64>,
    pub sma_slow: Option<f64>,
}

/// Extracts the newest `LOOKBACK_DAYS` candles from a `historical-price-full`
/// document, oldest first.
///
/// Returns `None` when the payload has no `historical` array. Rows that
/// don't parse are dropped.
pub fn candles_from_payload(payload: &Payload) -> Option<Vec<Candle>> {
    let Payload::Document(doc) = payload else {
        return None;
    };
    let rows = doc.get("historical")?.as_array()?;

    let mut candles: Vec<Candle> = rows
        .iter()
        .filter_map(|row| serde_json::from_value(row.clone()).ok())
        .collect();
    candles.sort_by(|a, b| b.date.cmp(&a.date));
    candles.truncate(LOOKBACK_DAYS);
    candles.reverse();
    Some(candles)
}

/// Pairs each candle with its fast and slow simple moving averages.
pub fn trend_points(candles: Vec<Candle>) -> Vec<TrendPoint> {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let fast = sma(&closes, FAST_WINDOW);
    let slow = sma(&closes, SLOW_WINDOW);

    candles
        .into_iter()
        .zip(fast)
        .zip(slow)
        .map(|((candle, sma_fast), sma_slow)| TrendPoint {
            candle,
            sma_fast,
            sma_slow,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn history(days: usize) -> Payload {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        // newest first, the way the API returns it
        let rows: Vec<_> = (0..days)
            .rev()
            .map(|i| {
                let date = start + chrono::Duration::days(i as i64);
                json!({
                    "date": date.format("%Y-%m-%d").to_string(),
                    "open": i as f64,
                    "high": i as f64 + 1.0,
                    "low": i as f64 - 1.0,
                    "close": i as f64,
                    "volume": 1000.0,
                    "changePercent": 0.5
                })
            })
            .collect();
        Payload::from_json(json!({"symbol": "NVDA", "historical": rows}))
    }

    #[test]
    fn test_candles_are_chronological_and_capped() {
        let candles = candles_from_payload(&history(250)).unwrap();
        assert_eq!(candles.len(), LOOKBACK_DAYS);
        assert!(candles.windows(2).all(|w| w[0].date < w[1].date));
        // the oldest 50 days are dropped
        assert_eq!(candles[0].close, 50.0);
        assert_eq!(candles.last().unwrap().close, 249.0);
        assert_eq!(candles.last().unwrap().change_percent, Some(0.5));
    }

    #[test]
    fn test_missing_historical_is_none() {
        let payload = Payload::from_json(json!({"symbol": "NVDA"}));
        assert!(candles_from_payload(&payload).is_none());
        assert!(candles_from_payload(&Payload::Empty).is_none());
        assert!(candles_from_payload(&Payload::Records(vec![json!({})])).is_none());
    }

    #[test]
    fn test_bad_rows_are_dropped() {
        let payload = Payload::from_json(json!({
            "historical": [
                {"date": "2024-01-02", "open": 1.0, "high": 2.0, "low": 0.5, "close": 1.5},
                {"date": "not a date", "open": 1.0, "high": 2.0, "low": 0.5, "close": 1.5},
                {"date": "2024-01-01", "open": 1.0}
            ]
        }));
        let candles = candles_from_payload(&payload).unwrap();
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].volume, 0.0);
        assert!(candles[0].change_percent.is_none());
    }

    #[test]
    fn test_trend_points_moving_averages() {
        let candles = candles_from_payload(&history(60)).unwrap();
        let points = trend_points(candles);
        assert_eq!(points.len(), 60);

        assert!(points[18].sma_fast.is_none());
        // closes 0..=19
        assert_eq!(points[19].sma_fast, Some(9.5));
        assert!(points[48].sma_slow.is_none());
        // closes 0..=49
        assert_eq!(points[49].sma_slow, Some(24.5));
        // closes 40..=59
        assert_eq!(points[59].sma_fast, Some(49.5));
    }
}
