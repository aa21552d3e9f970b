use super::records::{self, Column, ValueFormat, column};
use super::ui;
use crate::core::market::{
    DIVIDENDS_CALENDAR, EARNINGS_CALENDAR, ECONOMIC_CALENDAR, MarketDataProvider, QueryParams,
};
use crate::core::payload::Payload;
use anyhow::{Result, bail};
use chrono::{Duration, Local, NaiveDate};
use comfy_table::Table;
use futures::future::join_all;
use serde_json::Value;
use tracing::info;

const DATE_FORMAT: &str = "%Y-%m-%d";

const MACRO_COLUMNS: [Column<'static>; 6] = [
    column("date", ValueFormat::Text),
    column("country", ValueFormat::Text),
    column("event", ValueFormat::Text),
    column("actual", ValueFormat::Text),
    column("estimate", ValueFormat::Text),
    column("impact", ValueFormat::Text),
];

const EARNINGS_COLUMNS: [Column<'static>; 6] = [
    column("symbol", ValueFormat::Text),
    column("date", ValueFormat::Text),
    column("epsEstimated", ValueFormat::Decimal(2)),
    column("epsActual", ValueFormat::Decimal(2)),
    column("revenueEstimated", ValueFormat::DollarsGrouped),
    column("revenueActual", ValueFormat::DollarsGrouped),
];

const DIVIDENDS_COLUMNS: [Column<'static>; 5] = [
    column("symbol", ValueFormat::Text),
    column("date", ValueFormat::Text),
    column("adjDividend", ValueFormat::Dollars(3)),
    column("yield", ValueFormat::Percent(2)),
    column("paymentDate", ValueFormat::Text),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CalendarKind {
    Macro,
    Earnings,
    Dividends,
    #[default]
    All,
}

impl CalendarKind {
    /// The single calendars this kind covers, in display order.
    fn calendars(self) -> Vec<CalendarKind> {
        match self {
            CalendarKind::All => vec![
                CalendarKind::Macro,
                CalendarKind::Earnings,
                CalendarKind::Dividends,
            ],
            kind => vec![kind],
        }
    }

    fn endpoint(self) -> &'static str {
        match self {
            CalendarKind::Macro | CalendarKind::All => ECONOMIC_CALENDAR,
            CalendarKind::Earnings => EARNINGS_CALENDAR,
            CalendarKind::Dividends => DIVIDENDS_CALENDAR,
        }
    }

    fn title(self) -> &'static str {
        match self {
            CalendarKind::Macro => "Economic Calendar",
            CalendarKind::Earnings => "Earnings Calendar",
            CalendarKind::Dividends => "Dividends Calendar",
            CalendarKind::All => "Market Calendar",
        }
    }

    fn empty_message(self) -> &'static str {
        match self {
            CalendarKind::Macro => "No economic events for these dates.",
            CalendarKind::Earnings => "No earnings reports scheduled.",
            CalendarKind::Dividends => "No dividends scheduled.",
            CalendarKind::All => "Nothing scheduled for these dates.",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CalendarOptions {
    pub kind: CalendarKind,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl Default for CalendarOptions {
    /// The coming week, starting today.
    fn default() -> Self {
        let today = Local::now().date_naive();
        CalendarOptions {
            kind: CalendarKind::All,
            from: today,
            to: today + Duration::days(7),
        }
    }
}

impl CalendarOptions {
    fn query(&self) -> Result<QueryParams> {
        if self.from > self.to {
            bail!(
                "Start date {} is after end date {}",
                self.from.format(DATE_FORMAT),
                self.to.format(DATE_FORMAT)
            );
        }
        Ok(QueryParams::from([
            ("from".to_string(), self.from.format(DATE_FORMAT).to_string()),
            ("to".to_string(), self.to.format(DATE_FORMAT).to_string()),
        ]))
    }
}

pub async fn run(provider: &dyn MarketDataProvider, options: &CalendarOptions) -> Result<()> {
    let params = options.query()?;
    let calendars = options.kind.calendars();
    info!(?params, count = calendars.len(), "Loading market calendars");

    let pb = ui::new_spinner("Loading calendar...");
    let requests = calendars.iter().map(|kind| {
        let endpoint = provider.stable_endpoint(kind.endpoint());
        let params = &params;
        async move { provider.get_json(&endpoint, params).await }
    });
    let payloads = join_all(requests).await;
    pb.finish_and_clear();

    for (kind, payload) in calendars.iter().zip(&payloads) {
        println!(
            "{}\n",
            ui::style_text(kind.title(), ui::StyleType::Title)
        );
        println!("{}\n", render(*kind, payload));
    }
    Ok(())
}

fn calendar_table(kind: CalendarKind, rows: &[Value]) -> Table {
    match kind {
        CalendarKind::Macro => macro_table(rows),
        CalendarKind::Earnings => {
            records::records_table(rows, &records::available_columns(rows, &EARNINGS_COLUMNS))
        }
        CalendarKind::Dividends | CalendarKind::All => {
            records::records_table(rows, &records::available_columns(rows, &DIVIDENDS_COLUMNS))
        }
    }
}

/// Economic events, oldest first. Falls back to every field when the
/// records carry no `date`.
fn macro_table(rows: &[Value]) -> Table {
    if !rows.iter().any(|r| r.get("date").is_some()) {
        return records::records_table(rows, &records::all_columns(rows));
    }

    let mut sorted: Vec<Value> = rows.to_vec();
    sorted.sort_by(|a, b| {
        let a = a.get("date").and_then(Value::as_str);
        let b = b.get("date").and_then(Value::as_str);
        a.cmp(&b)
    });
    records::records_table(&sorted, &records::available_columns(&sorted, &MACRO_COLUMNS))
}

fn render(kind: CalendarKind, payload: &Payload) -> String {
    match payload {
        Payload::Records(rows) => calendar_table(kind, rows).to_string(),
        Payload::Error(message) => {
            ui::style_text(&format!("Error: {message}"), ui::StyleType::Error)
        }
        Payload::Document(_) | Payload::Empty => {
            ui::style_text(kind.empty_message(), ui::StyleType::Warning)
        }
    }
}
