pub mod bazos_parser;

pub use bazos_parser::{parse_listing_page, parse_metadata, parse_search_page};
