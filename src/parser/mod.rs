// Gaoxiaojob-specific HTML parsing
pub mod detail;
pub mod listing;

pub use detail::DetailParser;
pub use listing::parse_listing;

use crate::model::ExtractError;
use ::scraper::Selector;

fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Selector(format!("{css}: {e}")))
}
