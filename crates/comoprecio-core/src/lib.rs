//! Shared domain types, catalog, and configuration for the `ComoPrecio`
//! scrapers.

pub mod app_config;
pub mod catalog;
pub mod config;
pub mod output;
pub mod products;

use thiserror::Error;

pub use app_config::AppConfig;
pub use catalog::{load_catalog, Catalog, ProductConfig, StoreDescriptor};
pub use config::{load_app_config, load_app_config_from_env};
pub use output::write_json;
pub use products::{
    ComparisonDocument, ComparisonProduct, Offer, ScrapedProduct, SearchDocument, WatchDocument,
    WatchedProduct,
};

/// Source label attached to every record harvested from `AliExpress` pages.
pub const ALIEXPRESS_SOURCE: &str = "AliExpress";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog YAML: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error for {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
