// Analyzer module: picks and summarizes the listings worth reporting.

pub mod price_analysis;
pub mod selection;

pub use price_analysis::summarize;
pub use selection::{select_airs, select_pros, sort_by_price};
