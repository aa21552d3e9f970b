use super::ui;
use crate::core::history::{self, FAST_WINDOW, SLOW_WINDOW, TrendPoint};
use crate::core::market::{MarketDataProvider, QueryParams, history_endpoint};
use crate::core::payload::Payload;
use anyhow::{Result, bail};
use comfy_table::{Cell, CellAlignment, Color, Table};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct TrendOptions {
    pub symbol: String,
    /// Number of most recent bars to print.
    pub rows: usize,
}

impl Default for TrendOptions {
    fn default() -> Self {
        TrendOptions {
            symbol: "NVDA".to_string(),
            rows: 20,
        }
    }
}

pub async fn run(provider: &dyn MarketDataProvider, options: &TrendOptions) -> Result<()> {
    if options.rows == 0 {
        bail!("Number of rows must be at least 1");
    }
    let symbol = options.symbol.trim().to_uppercase();
    info!(%symbol, rows = options.rows, "Loading price history");

    let pb = ui::new_spinner(&format!("Loading price history for {symbol}..."));
    let payload = provider
        .get_json(&history_endpoint(&symbol), &QueryParams::new())
        .await;
    pb.finish_and_clear();

    println!(
        "{}\n",
        ui::style_text(&format!("Trend Analysis: {symbol}"), ui::StyleType::Title)
    );
    println!("{}", render(&symbol, &payload, options.rows));
    Ok(())
}

fn render(symbol: &str, payload: &Payload, rows: usize) -> String {
    if let Payload::Error(message) = payload {
        return ui::style_text(
            &format!("Market data error: {message}"),
            ui::StyleType::Error,
        );
    }

    let points = match history::candles_from_payload(payload) {
        Some(candles) if !candles.is_empty() => history::trend_points(candles),
        _ => {
            return ui::style_text(
                &format!("No price history found for {symbol}."),
                ui::StyleType::Warning,
            );
        }
    };
    debug!(bars = points.len(), "Computed moving averages");

    let recent = &points[points.len().saturating_sub(rows)..];
    let mut output = trend_table(recent).to_string();
    if let Some(latest) = points.last() {
        output.push_str("\n\n");
        output.push_str(&summary(latest));
    }
    output
}

fn price_cell(value: f64) -> Cell {
    Cell::new(format!("{value:.2}")).set_alignment(CellAlignment::Right)
}

/// Up for a close at or above the open.
fn direction_cell(point: &TrendPoint) -> Cell {
    if point.candle.close >= point.candle.open {
        Cell::new("▲").fg(Color::Green)
    } else {
        Cell::new("▼").fg(Color::Red)
    }
}

fn trend_table(points: &[TrendPoint]) -> Table {
    let fast = format!("SMA {FAST_WINDOW}");
    let slow = format!("SMA {SLOW_WINDOW}");
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Open"),
        ui::header_cell("High"),
        ui::header_cell("Low"),
        ui::header_cell("Close"),
        ui::header_cell(&fast),
        ui::header_cell(&slow),
        ui::header_cell(""),
    ]);

    for point in points {
        let candle = &point.candle;
        table.add_row(vec![
            Cell::new(candle.date.format("%Y-%m-%d")),
            price_cell(candle.open),
            price_cell(candle.high),
            price_cell(candle.low),
            price_cell(candle.close),
            ui::format_optional_cell(point.sma_fast, |v| format!("{v:.2}")),
            ui::format_optional_cell(point.sma_slow, |v| format!("{v:.2}")),
            direction_cell(point),
        ]);
    }
    table
}

fn summary(latest: &TrendPoint) -> String {
    let change = latest
        .candle
        .change_percent
        .map_or_else(|| "N/A".to_string(), |c| format!("{c:.2}%"));
    format!(
        "{} {change}\n{} {}",
        ui::style_text("Daily change:", ui::StyleType::Label),
        ui::style_text("Volume:", ui::StyleType::Label),
        ui::format_thousands(latest.candle.volume)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use comfy_table::ContentArrangement;
    use serde_json::{Value, json};

    fn history(days: usize) -> Payload {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let rows: Vec<Value> = (0..days)
            .rev()
            .map(|i| {
                let date = start + chrono::Duration::days(i as i64);
                json!({
                    "date": date.format("%Y-%m-%d").to_string(),
                    "open": 100.0,
                    "high": 110.0,
                    "low": 90.0,
                    "close": if i % 2 == 0 { 105.0 } else { 95.0 },
                    "volume": 1234567.0,
                    "changePercent": -1.5
                })
            })
            .collect();
        Payload::from_json(json!({"symbol": "NVDA", "historical": rows}))
    }

    fn points(days: usize) -> Vec<TrendPoint> {
        let candles = history::candles_from_payload(&history(days)).unwrap();
        history::trend_points(candles)
    }

    #[test]
    fn test_trend_table_columns() {
        let points = points(60);
        let mut table = trend_table(&points[55..]);
        table.set_content_arrangement(ContentArrangement::Disabled);
        let rendered = table.to_string();
        for header in ["Date", "Open", "High", "Low", "Close", "SMA 20", "SMA 50"] {
            assert!(rendered.contains(header), "missing {header}");
        }
        assert!(rendered.contains("2024-02-29"));
        assert!(rendered.contains("▲"));
        assert!(rendered.contains("▼"));
        assert!(!rendered.contains("N/A"));
    }

    #[test]
    fn test_short_history_has_undefined_slow_average() {
        let points = points(30);
        let mut table = trend_table(&points);
        table.set_content_arrangement(ContentArrangement::Disabled);
        let rendered = table.to_string();
        // 30 rows without SMA 50, 19 of them without SMA 20
        assert_eq!(rendered.matches("N/A").count(), 30 + 19);
    }

    #[test]
    fn test_summary_uses_latest_bar() {
        let points = points(5);
        let text = console::strip_ansi_codes(&summary(points.last().unwrap())).to_string();
        assert_eq!(text, "Daily change: -1.50%\nVolume: 1,234,567");
    }

    #[test]
    fn test_render_limits_rows() {
        let text = console::strip_ansi_codes(&render("NVDA", &history(40), 3)).to_string();
        assert_eq!(text.matches("2024-").count(), 3);
        assert!(text.contains("2024-02-09"));
        assert!(!text.contains("2024-02-06"));
    }

    #[test]
    fn test_render_messages() {
        let empty = console::strip_ansi_codes(&render("ZZZZ", &Payload::Empty, 20)).to_string();
        assert_eq!(empty, "No price history found for ZZZZ.");

        let no_history = Payload::from_json(json!({"symbol": "ZZZZ"}));
        let text = console::strip_ansi_codes(&render("ZZZZ", &no_history, 20)).to_string();
        assert_eq!(text, "No price history found for ZZZZ.");

        let error = console::strip_ansi_codes(&render(
            "NVDA",
            &Payload::Error("Limit Reach".into()),
            20,
        ))
        .to_string();
        assert_eq!(error, "Market data error: Limit Reach");
    }
}
