//! Terminal panels, one module per command

pub mod calendar;
pub mod profile;
pub mod records;
pub mod screener;
pub mod setup;
pub mod strength;
pub mod trend;
pub mod ui;

pub use calendar::{CalendarKind, CalendarOptions};
pub use screener::{ScreenerOptions, Sector};
pub use strength::{SortKey, StrengthOptions};
pub use trend::TrendOptions;
