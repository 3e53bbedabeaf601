//! `compare` command: the multi-store HTTP price comparison.

use anyhow::Context;
use comoprecio_core::{AppConfig, Catalog, ComparisonDocument};
use comoprecio_scraper::{
    load_existing, save_document, scrape_store, ComparisonRun, ParserRegistry, StoreClient,
};

const TEST_STORE: &str = "amazon";
const TEST_TERM: &str = "iPhone 15 Pro Max";
const TEST_FALLBACK_BASE_URL: &str = "https://www.amazon.es";

fn load_catalog(config: &AppConfig) -> anyhow::Result<Catalog> {
    let catalog = match &config.catalog_path {
        Some(path) => comoprecio_core::load_catalog(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => Catalog::builtin().context("loading built-in catalog")?,
    };
    Ok(catalog)
}

/// Scrapes the whole catalog and writes the comparison document.
///
/// # Errors
///
/// Returns an error if the catalog or HTTP client cannot be set up or the
/// document cannot be written. Individual store failures only cost offers.
pub(crate) async fn run_compare(config: &AppConfig) -> anyhow::Result<()> {
    let catalog = load_catalog(config)?;
    let client = StoreClient::from_config(config)?;
    let registry = ParserRegistry::builtin();

    let previous = load_existing(&config.output_path);
    if let Some(last_updated) = previous.last_updated {
        tracing::info!(
            path = %config.output_path.display(),
            %last_updated,
            products = previous.products.len(),
            "existing document will be replaced"
        );
    }

    tracing::info!(
        products = catalog.products.len(),
        stores = catalog.stores.len(),
        parsers = ?registry.store_ids(),
        "starting comparison run"
    );
    let products = ComparisonRun::new(
        &catalog,
        &client,
        &registry,
        config.scraper_inter_request_delay_ms,
    )
    .run()
    .await;

    let doc = ComparisonDocument::new(catalog.stores.clone(), products);
    save_document(&config.output_path, &doc)?;

    tracing::info!(
        products = doc.products.len(),
        offers = doc.offer_count(),
        "comparison run complete"
    );
    Ok(())
}

/// Runs the Amazon parser once and prints what it found.
///
/// # Errors
///
/// Returns an error if the catalog or HTTP client cannot be set up. A failed
/// scrape is reported, not returned.
pub(crate) async fn run_test_mode(config: &AppConfig) -> anyhow::Result<()> {
    let catalog = load_catalog(config)?;
    let client = StoreClient::from_config(config)?;
    let registry = ParserRegistry::builtin();
    let parser = registry
        .get(TEST_STORE)
        .with_context(|| format!("no parser registered for {TEST_STORE}"))?;
    let base_url = catalog
        .store(TEST_STORE)
        .map_or(TEST_FALLBACK_BASE_URL, |s| s.base_url.as_str());

    match scrape_store(&client, parser, base_url, TEST_TERM).await {
        Ok(Some(result)) => println!(
            "Test result: {} | {:.2} | {}",
            result.title, result.price, result.url
        ),
        Ok(None) => println!("Test result: no priced listing"),
        Err(e) => {
            tracing::warn!(store = TEST_STORE, error = %e, "test scrape failed");
            println!("Test result: no priced listing");
        }
    }
    Ok(())
}
