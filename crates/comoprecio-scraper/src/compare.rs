//! Catalog-wide price comparison run.
//!
//! Products and their stores are visited strictly in catalog order, one
//! request at a time, with a fixed pause after every store. A store that
//! fails or returns nothing usable simply contributes no offer.

use std::time::Duration;

use comoprecio_core::{Catalog, ComparisonProduct, Offer, ProductConfig};

use crate::client::{extract_domain, StoreClient};
use crate::error::ScraperError;
use crate::images::default_image;
use crate::stores::{ParserRegistry, StoreParser, StoreResult};

/// Confidence attached to every scraped offer.
pub const OFFER_CONFIDENCE: f64 = 0.90;

/// Delivery bucket, in days, quoted for a store.
#[must_use]
pub fn delivery_estimate(store_id: &str) -> &'static str {
    if store_id == "aliexpress" {
        "10-20"
    } else {
        "1-3"
    }
}

/// Turns a parsed store listing into an offer.
#[must_use]
pub fn build_offer(store_id: &str, result: &StoreResult) -> Offer {
    Offer {
        source: store_id.to_owned(),
        price: result.price,
        shipping: result.shipping,
        total: result.price + result.shipping,
        url: result.url.clone(),
        stock: result.stock,
        delivery: delivery_estimate(store_id).to_owned(),
        confidence: OFFER_CONFIDENCE,
    }
}

/// Orders offers by ascending total; equal totals keep their visiting order.
pub fn sort_offers(offers: &mut [Offer]) {
    offers.sort_by(|a, b| a.total.total_cmp(&b.total));
}

/// Fetches one store's search page for `term` and parses it.
///
/// # Errors
///
/// Propagates [`StoreClient::fetch_html`] failures once retries are exhausted.
pub async fn scrape_store(
    client: &StoreClient,
    parser: &dyn StoreParser,
    base_url: &str,
    term: &str,
) -> Result<Option<StoreResult>, ScraperError> {
    let url = parser.search_url(base_url, term);
    tracing::info!(store = parser.store_id(), term, domain = %extract_domain(&url), "querying store");
    let html = client.fetch_html(&url).await?;
    Ok(parser.parse(&html, base_url))
}

/// Drives the comparison run over a catalog.
pub struct ComparisonRun<'a> {
    catalog: &'a Catalog,
    client: &'a StoreClient,
    registry: &'a ParserRegistry,
    inter_request_delay: Duration,
}

impl<'a> ComparisonRun<'a> {
    #[must_use]
    pub fn new(
        catalog: &'a Catalog,
        client: &'a StoreClient,
        registry: &'a ParserRegistry,
        inter_request_delay_ms: u64,
    ) -> Self {
        Self {
            catalog,
            client,
            registry,
            inter_request_delay: Duration::from_millis(inter_request_delay_ms),
        }
    }

    /// Scrapes every catalog product and returns them in catalog order.
    pub async fn run(&self) -> Vec<ComparisonProduct> {
        let mut products = Vec::with_capacity(self.catalog.products.len());
        for product in &self.catalog.products {
            products.push(self.scrape_product(product).await);
        }
        products
    }

    /// Collects offers for one product across its configured stores.
    pub async fn scrape_product(&self, product: &ProductConfig) -> ComparisonProduct {
        tracing::info!(product = %product.id, "scraping product");

        let term = product.primary_search_term();
        let mut offers = Vec::new();

        for store_id in &product.stores {
            if let Some(offer) = self.offer_from_store(store_id, term).await {
                offers.push(offer);
            }

            if !self.inter_request_delay.is_zero() {
                tokio::time::sleep(self.inter_request_delay).await;
            }
        }

        sort_offers(&mut offers);

        let scraped = ComparisonProduct {
            id: product.id.clone(),
            title: term.to_owned(),
            brand: product.brand.clone(),
            category: product.category.clone(),
            upc: None,
            image: default_image(&product.brand, &product.id),
            offers,
        };

        match scraped.best_offer() {
            Some(best) => tracing::info!(
                product = %scraped.id,
                offers = scraped.offers.len(),
                best_store = %best.source,
                best_total = best.total,
                "product scraped"
            ),
            None => tracing::warn!(product = %scraped.id, "no offers found"),
        }
        scraped
    }

    async fn offer_from_store(&self, store_id: &str, term: &str) -> Option<Offer> {
        let Some(parser) = self.registry.get(store_id) else {
            tracing::info!(store = store_id, "no parser for store, skipping");
            return None;
        };
        let Some(store) = self.catalog.store(store_id) else {
            tracing::warn!(store = store_id, "store missing from catalog, skipping");
            return None;
        };

        match scrape_store(self.client, parser, &store.base_url, term).await {
            Ok(Some(result)) => {
                tracing::info!(store = store_id, price = result.price, "offer found");
                Some(build_offer(store_id, &result))
            }
            Ok(None) => {
                tracing::info!(store = store_id, "no priced result");
                None
            }
            Err(e) => {
                tracing::warn!(store = store_id, error = %e, "store scrape failed");
                None
            }
        }
    }
}
