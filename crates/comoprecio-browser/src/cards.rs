//! Product cards on a rendered AliExpress search results page.

use std::collections::HashSet;
use std::sync::LazyLock;

use comoprecio_core::{ScrapedProduct, ALIEXPRESS_SOURCE};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::dom::{attr, first_text, image_url, selector, text_of};

const MAX_TITLE_CHARS: usize = 200;
const MAX_PRICE_TEXT_CHARS: usize = 20;

/// Card selectors, most specific first; the first one with any match wins.
pub const CARD_SELECTORS: [&str; 5] = [
    r#"[class*="search-item-card"]"#,
    r#"[class*="product-item"]"#,
    ".search-card-item",
    r#"[class*="manhattan--container"]"#,
    r#"a[href*="/item/"]"#,
];

static CARDS: LazyLock<Vec<Selector>> =
    LazyLock::new(|| CARD_SELECTORS.into_iter().map(selector).collect());
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"[class*="title"], h3, [class*="Title"]"#));
static IMAGE: LazyLock<Selector> = LazyLock::new(|| selector("img"));
static PRICE: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"[class*="price"], span[class*="Price"]"#));
static ITEM_LINK: LazyLock<Selector> = LazyLock::new(|| selector(r#"a[href*="/item/"]"#));
static DISCOUNT: LazyLock<Selector> = LazyLock::new(|| selector(r#"[class*="discount"]"#));
static ITEM_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/item/(\d+)").expect("valid item id regex"));

/// Extracts every usable card from a results page snapshot.
///
/// `page_url` resolves relative links; `now_ms` seeds the synthetic id given
/// to cards whose link carries no item number.
#[must_use]
pub fn extract_search_cards(html: &str, page_url: &str, now_ms: i64) -> Vec<ScrapedProduct> {
    let doc = Html::parse_document(html);
    let base = Url::parse(page_url).ok();

    let Some(cards) = CARDS
        .iter()
        .map(|sel| doc.select(sel).collect::<Vec<_>>())
        .find(|found| !found.is_empty())
    else {
        return Vec::new();
    };

    cards
        .into_iter()
        .enumerate()
        .filter_map(|(index, card)| card_product(card, index, base.as_ref(), now_ms))
        .collect()
}

fn card_product(
    card: ElementRef<'_>,
    index: usize,
    base: Option<&Url>,
    now_ms: i64,
) -> Option<ScrapedProduct> {
    let title = first_text(card, &TITLE);
    let image_url = card.select(&IMAGE).next().map(image_url).unwrap_or_default();
    if title.is_empty() || image_url.is_empty() {
        return None;
    }

    let (price, original_price) = price_texts(card);
    let product_url = product_link(card)
        .map(|href| resolve(base, href))
        .unwrap_or_default();
    let product_id = item_id(&product_url)
        .map_or_else(|| format!("ali-{now_ms}-{index}"), str::to_owned);

    Some(ScrapedProduct {
        product_id,
        title: title.chars().take(MAX_TITLE_CHARS).collect(),
        price,
        original_price,
        discount: first_text(card, &DISCOUNT),
        image_url,
        product_url,
        source: ALIEXPRESS_SOURCE.to_owned(),
    })
}

/// First and second short, price-looking texts in the card.
fn price_texts(card: ElementRef<'_>) -> (String, String) {
    let mut texts = card.select(&PRICE).map(text_of).filter(|text| {
        text.contains(|c: char| c.is_ascii_digit() || c == ',' || c == '.')
            && text.chars().count() < MAX_PRICE_TEXT_CHARS
    });
    let price = texts.next().unwrap_or_default();
    let original = texts.next().unwrap_or_default();
    (price, original)
}

/// The card's item link, else the nearest enclosing anchor (the card itself included).
fn product_link(card: ElementRef<'_>) -> Option<&str> {
    if let Some(link) = card.select(&ITEM_LINK).next() {
        return attr(link, "href");
    }
    std::iter::once(card)
        .chain(card.ancestors().filter_map(ElementRef::wrap))
        .find(|el| el.value().name() == "a")
        .and_then(|a| attr(a, "href"))
}

fn resolve(base: Option<&Url>, href: &str) -> String {
    base.and_then(|b| b.join(href).ok())
        .map_or_else(|| href.to_owned(), String::from)
}

/// Numeric AliExpress item id in a product URL.
#[must_use]
pub fn item_id(url: &str) -> Option<&str> {
    ITEM_ID
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Products harvested so far, unique by id, in first-seen order.
#[derive(Debug, Default)]
pub struct SearchAccumulator {
    seen: HashSet<String>,
    products: Vec<ScrapedProduct>,
}

impl SearchAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps `product` unless its id was already recorded.
    pub fn push(&mut self, product: ScrapedProduct) -> bool {
        if !self.seen.insert(product.product_id.clone()) {
            return false;
        }
        self.products.push(product);
        true
    }

    /// Pushes every product and returns how many were new.
    pub fn extend(&mut self, products: impl IntoIterator<Item = ScrapedProduct>) -> usize {
        let mut added = 0;
        for product in products {
            if self.push(product) {
                added += 1;
            }
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

    #[must_use]
    pub fn into_products(self) -> Vec<ScrapedProduct> {
        self.products
    }
}

#[cfg(test)]
#[path = "cards_test.rs"]
mod tests;
