use super::records::{self, Column, ValueFormat, column};
use super::ui;
use crate::core::market::{COMPANY_SCREENER, MarketDataProvider, QueryParams};
use crate::core::payload::Payload;
use anyhow::{Result, bail};
use comfy_table::Table;
use serde_json::Value;
use std::fmt::Display;
use tracing::info;

pub const MIN_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 1000;

const COLUMNS: [Column<'static>; 9] = [
    column("symbol", ValueFormat::Text),
    column("companyName", ValueFormat::Text),
    column("price", ValueFormat::Dollars(2)),
    column("beta", ValueFormat::Decimal(2)),
    column("marketCap", ValueFormat::DollarsGrouped),
    column("sector", ValueFormat::Text),
    column("industry", ValueFormat::Text),
    column("lastAnnualDividend", ValueFormat::Text),
    column("volume", ValueFormat::Grouped),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Sector {
    Technology,
    Healthcare,
    FinancialServices,
    Energy,
    ConsumerCyclical,
    #[default]
    All,
}

impl Display for Sector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Sector::Technology => "Technology",
                Sector::Healthcare => "Healthcare",
                Sector::FinancialServices => "Financial Services",
                Sector::Energy => "Energy",
                Sector::ConsumerCyclical => "Consumer Cyclical",
                Sector::All => "All",
            }
        )
    }
}

#[derive(Debug, Clone)]
pub struct ScreenerOptions {
    pub limit: u32,
    /// Minimum market capitalization, in millions.
    pub min_market_cap: u64,
    pub sector: Sector,
}

impl Default for ScreenerOptions {
    fn default() -> Self {
        ScreenerOptions {
            limit: 50,
            min_market_cap: 1000,
            sector: Sector::All,
        }
    }
}

impl ScreenerOptions {
    fn query(&self) -> Result<QueryParams> {
        if !(MIN_LIMIT..=MAX_LIMIT).contains(&self.limit) {
            bail!(
                "Result limit must be between {MIN_LIMIT} and {MAX_LIMIT}, got {}",
                self.limit
            );
        }
        let Some(market_cap) = self.min_market_cap.checked_mul(1_000_000) else {
            bail!("Minimum market cap is too large: {}", self.min_market_cap);
        };

        let mut params = QueryParams::from([
            ("marketCapMoreThan".to_string(), market_cap.to_string()),
            ("limit".to_string(), self.limit.to_string()),
            ("isEtf".to_string(), "false".to_string()),
            ("isActivelyTrading".to_string(), "true".to_string()),
        ]);
        if self.sector != Sector::All {
            params.insert("sector".to_string(), self.sector.to_string());
        }
        Ok(params)
    }
}

pub async fn run(provider: &dyn MarketDataProvider, options: &ScreenerOptions) -> Result<()> {
    let params = options.query()?;
    info!(?params, "Running stock screener");

    let pb = ui::new_spinner("Running screener...");
    let payload = provider.get_json(COMPANY_SCREENER, &params).await;
    pb.finish_and_clear();

    println!(
        "{}\n",
        ui::style_text("Stock Screener", ui::StyleType::Title)
    );
    println!("{}", render(&payload));
    Ok(())
}

fn screener_table(rows: &[Value]) -> Table {
    let columns = records::available_columns(rows, &COLUMNS);
    records::records_table(rows, &columns)
}

fn render(payload: &Payload) -> String {
    match payload {
        Payload::Records(rows) => screener_table(rows).to_string(),
        Payload::Error(message) => ui::style_text(
            &format!("Market data error: {message}"),
            ui::StyleType::Error,
        ),
        Payload::Document(_) | Payload::Empty => ui::style_text(
            "No results matched those filters.",
            ui::StyleType::Warning,
        ),
    }
}
