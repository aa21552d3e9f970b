//! Core business logic abstractions

pub mod cache;
pub mod config;
pub mod history;
pub mod indicators;
pub mod log;
pub mod market;
pub mod payload;
pub mod strength;

// Re-export main types for cleaner imports
pub use market::{MarketDataProvider, QueryParams};
pub use payload::Payload;
pub use strength::{CurrencyScore, Quote, StrengthError, compute_strength};
