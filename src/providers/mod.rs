pub mod fmp;
pub mod util;

pub use fmp::FmpProvider;
