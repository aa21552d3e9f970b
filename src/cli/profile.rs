use super::records::{self, ValueFormat};
use super::ui;
use crate::core::market::{MarketDataProvider, QueryParams, profile_endpoint};
use crate::core::payload::Payload;
use anyhow::Result;
use comfy_table::{Cell, Table};
use serde_json::Value;
use tracing::info;

/// Profile fields shown, with their labels.
const FIELDS: [(&str, &str, ValueFormat); 9] = [
    ("companyName", "Company", ValueFormat::Text),
    ("price", "Price", ValueFormat::Dollars(2)),
    ("beta", "Beta", ValueFormat::Text),
    ("sector", "Sector", ValueFormat::Text),
    ("industry", "Industry", ValueFormat::Text),
    ("ceo", "CEO", ValueFormat::Text),
    ("website", "Website", ValueFormat::Text),
    ("image", "Image", ValueFormat::Text),
    ("description", "Description", ValueFormat::Text),
];

pub async fn run(provider: &dyn MarketDataProvider, symbol: &str) -> Result<()> {
    let symbol = symbol.trim().to_uppercase();
    info!(%symbol, "Loading company profile");

    let pb = ui::new_spinner(&format!("Loading profile for {symbol}..."));
    let payload = provider
        .get_json(&profile_endpoint(&symbol), &QueryParams::new())
        .await;
    pb.finish_and_clear();

    println!(
        "{}\n",
        ui::style_text(&format!("Symbol Info: {symbol}"), ui::StyleType::Title)
    );
    println!("{}", render(&symbol, &payload));
    Ok(())
}

fn profile_table(profile: &Value) -> Table {
    let mut table = ui::new_styled_table();
    for (key, label, format) in FIELDS {
        let value = profile
            .get(key)
            .and_then(|v| records::format_value(v, format));
        table.add_row(vec![
            ui::header_cell(label),
            value.map_or_else(ui::na_cell, Cell::new),
        ]);
    }
    table
}

fn render(symbol: &str, payload: &Payload) -> String {
    match payload {
        Payload::Records(rows) if !rows.is_empty() => profile_table(&rows[0]).to_string(),
        Payload::Error(message) => ui::style_text(
            &format!("Market data error: {message}"),
            ui::StyleType::Error,
        ),
        _ => ui::style_text(
            &format!("No profile found for {symbol}."),
            ui::StyleType::Warning,
        ),
    }
}
