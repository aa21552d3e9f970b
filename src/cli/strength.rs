use super::ui;
use crate::core::market::{FOREX_QUOTES, MarketDataProvider, QueryParams};
use crate::core::strength::{self, CurrencyScore, StrengthError};
use anyhow::{Context, Result};
use comfy_table::Cell;
use console::Style;
use std::cmp::Ordering;
use tracing::{debug, info};

/// Width of each side of the zero axis in the bar chart.
const HALF_WIDTH: usize = 24;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Strength,
    Currency,
}

#[derive(Debug, Clone, Default)]
pub struct StrengthOptions {
    pub sort: SortKey,
    pub ascending: bool,
    pub json: bool,
}

pub async fn run(provider: &dyn MarketDataProvider, options: &StrengthOptions) -> Result<()> {
    info!("Loading forex quotes for the strength meter");
    let pb = ui::new_spinner("Fetching forex quotes...");
    let payload = provider.get_json(FOREX_QUOTES, &QueryParams::new()).await;
    pb.finish_and_clear();

    match strength::strength_from_payload(&payload) {
        Ok(scores) => {
            let scores = sorted(scores, options);
            if options.json {
                let json = serde_json::to_string_pretty(&scores)
                    .context("Failed to serialize strength scores")?;
                println!("{json}");
            } else {
                println!("{}", render(&scores));
            }
        }
        Err(e) => {
            debug!(error = %e, "Currency strength unavailable");
            println!("{}", render_error(&e));
        }
    }
    Ok(())
}

/// Re-orders the ranking for display. The default keeps the meter's order.
fn sorted(mut scores: Vec<CurrencyScore>, options: &StrengthOptions) -> Vec<CurrencyScore> {
    if options.sort == SortKey::Currency {
        scores.sort_by(|a, b| a.currency.cmp(&b.currency));
    }
    if options.ascending {
        match options.sort {
            SortKey::Currency => scores.reverse(),
            SortKey::Strength => scores.sort_by(|a, b| {
                a.strength
                    .partial_cmp(&b.strength)
                    .unwrap_or(Ordering::Equal)
            }),
        }
    }
    scores
}

fn render(scores: &[CurrencyScore]) -> String {
    let mut output = format!(
        "{}\n{}\n\n",
        ui::style_text("Currency Strength Meter", ui::StyleType::Title),
        ui::style_text(
            "Based on the intraday percentage change of each major pair against USD.",
            ui::StyleType::Subtle
        )
    );
    output.push_str(&render_bar_chart(scores));
    output.push('\n');
    output.push_str(&render_table(scores));
    output
}

fn render_table(scores: &[CurrencyScore]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Currency"), ui::header_cell("Strength")]);
    for score in scores {
        table.add_row(vec![
            Cell::new(&score.currency),
            ui::change_cell(score.strength, ""),
        ]);
    }
    table.to_string()
}

/// Horizontal bars around a zero axis, longest bar for the largest magnitude.
fn render_bar_chart(scores: &[CurrencyScore]) -> String {
    let max_abs = scores
        .iter()
        .map(|s| s.strength.abs())
        .fold(0.0_f64, f64::max);

    let mut lines = Vec::with_capacity(scores.len());
    for score in scores {
        let len = if max_abs > 0.0 {
            ((score.strength.abs() / max_abs) * HALF_WIDTH as f64).round() as usize
        } else {
            0
        };
        let bar_style = Style::new().color256(ui::diverging_color(score.strength, max_abs));
        let bar = bar_style.apply_to("█".repeat(len)).to_string();

        let (left, right) = if score.strength < 0.0 {
            (format!("{}{bar}", " ".repeat(HALF_WIDTH - len)), String::new())
        } else {
            (" ".repeat(HALF_WIDTH), format!("{bar}{}", " ".repeat(HALF_WIDTH - len)))
        };
        lines.push(format!(
            "{:<4}{left}│{right} {:+.2}",
            score.currency, score.strength
        ));
    }
    lines.join("\n")
}

fn render_error(error: &StrengthError) -> String {
    match error {
        StrengthError::NoData(Some(message)) => ui::style_text(
            &format!("Could not load forex data: {message}"),
            ui::StyleType::Error,
        ),
        StrengthError::NoData(None) => {
            ui::style_text("Could not load forex data.", ui::StyleType::Error)
        }
        StrengthError::EmptyBasket => {
            ui::style_text("No recent forex data found.", ui::StyleType::Warning)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::payload::Payload;
    use async_trait::async_trait;
    use serde_json::json;

    struct StaticProvider(Payload);

    #[async_trait]
    impl MarketDataProvider for StaticProvider {
        async fn get_json(&self, _endpoint: &str, _params: &QueryParams) -> Payload {
            self.0.clone()
        }

        fn stable_url(&self) -> &str {
            "http://localhost/stable"
        }
    }

    fn score(currency: &str, strength: f64) -> CurrencyScore {
        CurrencyScore {
            currency: currency.to_string(),
            strength,
        }
    }

    fn currencies(scores: &[CurrencyScore]) -> Vec<&str> {
        scores.iter().map(|s| s.currency.as_str()).collect()
    }

    #[test]
    fn test_bar_chart_layout() {
        let scores = vec![score("EUR", 0.5), score("USD", 0.0), score("JPY", -0.25)];
        let chart = console::strip_ansi_codes(&render_bar_chart(&scores)).to_string();
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines.len(), 3);

        let (left, right) = lines[0].split_once('│').unwrap();
        assert!(left.starts_with("EUR"));
        assert!(!left.contains('█'));
        assert_eq!(right.matches('█').count(), HALF_WIDTH);
        assert!(right.ends_with("+0.50"));

        assert_eq!(lines[1].matches('█').count(), 0);
        assert!(lines[1].ends_with("+0.00"));

        let (left, right) = lines[2].split_once('│').unwrap();
        assert_eq!(left.matches('█').count(), HALF_WIDTH / 2);
        assert!(!right.contains('█'));
        assert!(right.ends_with("-0.25"));

        // the axis lines up on every row
        let axis: Vec<usize> = lines
            .iter()
            .map(|l| l.chars().position(|c| c == '│').unwrap())
            .collect();
        assert!(axis.iter().all(|p| *p == 4 + HALF_WIDTH));
    }

    #[test]
    fn test_bar_chart_all_zero() {
        let chart = render_bar_chart(&[score("GBP", 0.0), score("USD", 0.0)]);
        assert!(!chart.contains('█'));
    }

    #[test]
    fn test_render_table() {
        let table = render_table(&[score("CHF", 0.2), score("GBP", 0.0)]);
        assert!(table.contains("Currency"));
        assert!(table.contains("Strength"));
        assert!(table.contains("CHF"));
        assert!(table.contains("0.20"));
    }

    #[test]
    fn test_sorting_options() {
        let ranked = vec![score("EUR", 0.5), score("USD", 0.0), score("JPY", -0.3)];

        let default = sorted(ranked.clone(), &StrengthOptions::default());
        assert_eq!(currencies(&default), vec!["EUR", "USD", "JPY"]);

        let ascending = sorted(
            ranked.clone(),
            &StrengthOptions {
                ascending: true,
                ..Default::default()
            },
        );
        assert_eq!(currencies(&ascending), vec!["JPY", "USD", "EUR"]);

        let by_currency = sorted(
            ranked.clone(),
            &StrengthOptions {
                sort: SortKey::Currency,
                ..Default::default()
            },
        );
        assert_eq!(currencies(&by_currency), vec!["EUR", "JPY", "USD"]);

        let by_currency_desc = sorted(
            ranked,
            &StrengthOptions {
                sort: SortKey::Currency,
                ascending: true,
                ..Default::default()
            },
        );
        assert_eq!(currencies(&by_currency_desc), vec!["USD", "JPY", "EUR"]);
    }

    #[test]
    fn test_error_messages() {
        let no_data = console::strip_ansi_codes(&render_error(&StrengthError::NoData(Some(
            "Limit Reach".to_string(),
        ))))
        .to_string();
        assert_eq!(no_data, "Could not load forex data: Limit Reach");

        let empty = console::strip_ansi_codes(&render_error(&StrengthError::EmptyBasket))
            .to_string();
        assert_eq!(empty, "No recent forex data found.");
    }

    #[tokio::test]
    async fn test_run_never_fails_on_missing_data() {
        for payload in [
            Payload::Empty,
            Payload::Error("Invalid API KEY.".to_string()),
            Payload::from_json(json!([{"symbol": "BTCUSD", "changesPercentage": 5.0}])),
        ] {
            let provider = StaticProvider(payload);
            assert!(run(&provider, &StrengthOptions::default()).await.is_ok());
        }
    }

    #[tokio::test]
    async fn test_run_with_quotes() {
        let provider = StaticProvider(Payload::from_json(json!([
            {"symbol": "EURUSD", "changesPercentage": 0.5},
            {"symbol": "USDJPY", "changesPercentage": 0.3}
        ])));
        let options = StrengthOptions {
            json: true,
            ..Default::default()
        };
        assert!(run(&provider, &options).await.is_ok());
    }
}
