//! The scroll-and-extract loop behind the search harvest.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use comoprecio_core::ScrapedProduct;

use crate::cards::{extract_search_cards, SearchAccumulator};
use crate::error::BrowserError;

/// Rendered state of the results page at one point in time.
#[derive(Debug, Clone, Default)]
pub struct PageSnapshot {
    pub html: String,
    pub url: String,
}

/// A scrollable results page.
pub trait ResultsPage {
    fn snapshot(&mut self) -> impl Future<Output = Result<PageSnapshot, BrowserError>> + Send;

    /// Scrolls down by one viewport height.
    fn scroll_viewport(&mut self) -> impl Future<Output = Result<(), BrowserError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestLimits {
    pub max_products: usize,
    pub max_scrolls: usize,
    pub scroll_pause: Duration,
}

impl Default for HarvestLimits {
    fn default() -> Self {
        Self {
            max_products: 200,
            max_scrolls: 50,
            scroll_pause: Duration::from_secs(2),
        }
    }
}

#[derive(Debug)]
pub struct HarvestOutcome {
    pub products: Vec<ScrapedProduct>,
    pub scrolls: usize,
    /// The error that ended the loop early, if any.
    pub error: Option<BrowserError>,
}

/// Snapshots, extracts and scrolls until either limit is reached.
///
/// The product limit is only checked between scrolls, so the last batch may
/// overshoot it. A page error ends the loop; whatever was collected so far is
/// returned alongside it.
pub async fn harvest<P: ResultsPage>(page: &mut P, limits: &HarvestLimits) -> HarvestOutcome {
    let mut acc = SearchAccumulator::new();
    let mut scrolls = 0;

    let error = loop {
        if acc.len() >= limits.max_products || scrolls >= limits.max_scrolls {
            break None;
        }
        tracing::debug!(scroll = scrolls + 1, max = limits.max_scrolls, "harvesting");

        let snapshot = match page.snapshot().await {
            Ok(s) => s,
            Err(e) => break Some(e),
        };

        let cards = extract_search_cards(&snapshot.html, &snapshot.url, Utc::now().timestamp_millis());
        let added = acc.extend(cards);
        if added > 0 {
            tracing::info!(added, total = acc.len(), "new products");
        }

        if let Err(e) = page.scroll_viewport().await {
            break Some(e);
        }
        tokio::time::sleep(limits.scroll_pause).await;
        scrolls += 1;
    };

    if let Some(e) = &error {
        tracing::error!(error = %e, collected = acc.len(), "harvest stopped early");
    } else if acc.is_empty() {
        tracing::warn!(scrolls, "no product cards matched on the results page");
    }

    HarvestOutcome {
        products: acc.into_products(),
        scrolls,
        error,
    }
}

#[cfg(test)]
#[path = "harvest_test.rs"]
mod tests;
