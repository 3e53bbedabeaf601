pub mod client;
pub mod compare;
pub mod error;
pub mod images;
pub mod output;
pub mod parse;
mod rate_limit;
pub mod stores;

pub use client::StoreClient;
pub use compare::{build_offer, scrape_store, sort_offers, ComparisonRun};
pub use error::ScraperError;
pub use images::default_image;
pub use output::{load_existing, save_document};
pub use parse::parse_price;
pub use stores::{ParserRegistry, StoreParser, StoreResult};
