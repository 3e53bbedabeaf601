use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use comoprecio_core::{write_json, WatchDocument, WatchedProduct, ALIEXPRESS_SOURCE};
use scraper::Html;
use tokio::time::Instant;
use url::Url;

use super::extract::{card_id, fallback_id, watched_product, CARD};
use crate::error::BrowserError;

const TITLE_PREVIEW_CHARS: usize = 50;

/// Products captured while watching a page.
#[derive(Debug, Default)]
pub struct WatchSession {
    seen: HashSet<String>,
    products: Vec<WatchedProduct>,
}

impl WatchSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records every unseen card in `html` and returns how many were added.
    pub fn scan(&mut self, html: &str, page_url: &str, now: DateTime<Utc>) -> usize {
        let doc = Html::parse_document(html);
        let base = Url::parse(page_url).ok();
        let mut added = 0;

        for card in doc.select(&CARD) {
            let id = card_id(card).unwrap_or_else(|| fallback_id(now.timestamp_millis()));
            if self.seen.contains(&id) {
                continue;
            }
            if let Some(product) = watched_product(card, id.clone(), base.as_ref(), now) {
                self.seen.insert(id);
                self.products.push(product);
                added += 1;
            }
        }

        if added > 0 {
            tracing::info!(added, total = self.products.len(), "new products");
        }
        added
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn clear(&mut self) {
        self.products.clear();
        self.seen.clear();
    }

    #[must_use]
    pub fn document(&self, scraped_at: DateTime<Utc>) -> WatchDocument {
        WatchDocument {
            source: ALIEXPRESS_SOURCE.to_owned(),
            scraped_at,
            count: self.products.len(),
            products: self.products.clone(),
        }
    }

    /// Writes `aliexpress_products_<epoch-ms>.json` into `dir`.
    ///
    /// Returns `None` without touching the disk when nothing was captured.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Output`] if the file cannot be written.
    pub fn download(&self, dir: &Path, now: DateTime<Utc>) -> Result<Option<PathBuf>, BrowserError> {
        if self.is_empty() {
            return Ok(None);
        }
        let path = dir.join(format!("aliexpress_products_{}.json", now.timestamp_millis()));
        write_json(&path, &self.document(now))?;
        Ok(Some(path))
    }

    /// Plain-text table of id, title preview, price and discount.
    #[must_use]
    pub fn summary_table(&self) -> String {
        let mut out = format!("{:<20} {:<54} {:<14} {}\n", "ID", "Title", "Price", "Discount");
        for p in &self.products {
            let mut title: String = p.product_desc.chars().take(TITLE_PREVIEW_CHARS).collect();
            title.push_str("...");
            out.push_str(&format!(
                "{:<20} {:<54} {:<14} {}\n",
                p.product_id, title, p.discount_price, p.discount
            ));
        }
        out
    }
}

/// Fires once scrolling has been quiet for a fixed period.
#[derive(Debug)]
pub struct Debounce {
    quiet: Duration,
    last_event: Option<Instant>,
}

impl Debounce {
    #[must_use]
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            last_event: None,
        }
    }

    /// Notes an event; any pending firing is pushed back.
    pub fn record(&mut self, at: Instant) {
        self.last_event = Some(at);
    }

    /// True once per burst of events, when `quiet` has passed since the last one.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.last_event {
            Some(last) if now.duration_since(last) >= self.quiet => {
                self.last_event = None;
                true
            }
            _ => false,
        }
    }
}

/// Commands typed on stdin while watching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchCommand {
    Download,
    Show,
    Clear,
    Quit,
}

impl WatchCommand {
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "download" | "d" => Some(Self::Download),
            "show" | "s" => Some(Self::Show),
            "clear" | "c" => Some(Self::Clear),
            "quit" | "q" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
