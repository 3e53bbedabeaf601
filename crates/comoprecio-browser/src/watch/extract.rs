//! Card extraction for the page watcher.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use comoprecio_core::{WatchedProduct, ALIEXPRESS_SOURCE};
use rand::Rng;
use regex::Regex;
use scraper::{ElementRef, Selector};
use url::Url;

use crate::dom::{attr, first_text, image_url, selector};

pub const WATCH_CARD_SELECTOR: &str = r#"[class*="search-item-card"], [class*="product-item"], .search-card-item, [data-product-id]"#;

pub(crate) static CARD: LazyLock<Selector> = LazyLock::new(|| selector(WATCH_CARD_SELECTOR));
static FIRST_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a"));
static IMAGE: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"img[src*="alicdn"], img[data-src*="alicdn"]"#));
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"[class*="title"], .manhattan--titleText, h3"#));
static PRICE: LazyLock<Selector> = LazyLock::new(|| {
    selector(r#"[class*="price"], .manhattan--price-sale, .search-card-item--price"#)
});
static ORIGINAL_PRICE: LazyLock<Selector> = LazyLock::new(|| {
    selector(r#"[class*="origPrice"], .manhattan--price-del, [class*="original"]"#)
});
static DISCOUNT: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"[class*="discount"], .manhattan--discount"#));
static SALES: LazyLock<Selector> = LazyLock::new(|| selector(r#"[class*="sold"], [class*="trade"]"#));
static ITEM_LINK: LazyLock<Selector> = LazyLock::new(|| selector(r#"a[href*="/item/"]"#));
static STORE: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"[class*="store"], .manhattan--store"#));

static ITEM_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/item/(\d+)").expect("valid item id regex"));
static NUMBER_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\d,.]+").expect("valid number regex"));
static LEADING_FLOAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+\.?\d*|\.\d+)").expect("valid float regex"));
static FIRST_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid integer regex"));

/// Id a card is tracked under: its data attribute, else the item number in
/// its first link.
#[must_use]
pub fn card_id(card: ElementRef<'_>) -> Option<String> {
    if let Some(id) = attr(card, "data-product-id") {
        return Some(id.to_owned());
    }
    card.select(&FIRST_LINK)
        .next()
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| ITEM_ID.captures(href))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_owned())
}

/// Synthetic id for cards that expose none: epoch millis plus nine random
/// base-36 characters.
///
/// Every call returns a new value, so a card without either id is recorded
/// again on every scan.
#[must_use]
pub fn fallback_id(now_ms: i64) -> String {
    const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::rng();
    let suffix: String = (0..9)
        .map(|_| char::from(BASE36[rng.random_range(0..BASE36.len())]))
        .collect();
    format!("{now_ms}{suffix}")
}

/// First number in a price text, with its first comma read as the decimal
/// point. Zero counts as no price.
#[must_use]
pub fn parse_listing_price(text: &str) -> Option<f64> {
    let run = NUMBER_RUN.find(text)?.as_str().replacen(',', ".", 1);
    let number = LEADING_FLOAT.find(&run)?.as_str();
    number.parse::<f64>().ok().filter(|p| *p > 0.0)
}

/// `USD` when the text shows a dollar sign and no euro marker, else `EUR`.
#[must_use]
pub fn detect_currency(price_text: &str) -> &'static str {
    let euro = price_text.contains('€') || price_text.contains("EUR");
    let dollar = price_text.contains('$') || price_text.contains("USD");
    if dollar && !euro {
        "USD"
    } else {
        "EUR"
    }
}

/// `"<n>%"` off the original price, when the original is higher.
#[must_use]
pub fn computed_discount(current: Option<f64>, original: Option<f64>) -> Option<String> {
    match (current, original) {
        (Some(c), Some(o)) if o > c => Some(format!("{}%", ((1.0 - c / o) * 100.0).round())),
        _ => None,
    }
}

/// First integer in the text, 0 when there is none.
#[must_use]
pub fn first_integer(text: &str) -> u64 {
    FIRST_INTEGER
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

fn resolve(base: Option<&Url>, href: &str) -> String {
    base.and_then(|b| b.join(href).ok())
        .map_or_else(|| href.to_owned(), String::from)
}

fn format_price(currency: &str, amount: Option<f64>) -> String {
    amount.map_or_else(String::new, |a| format!("{currency} {a:.2}"))
}

/// Builds the record for a card already known to be unseen. Cards without a
/// title yield `None`.
#[must_use]
pub fn watched_product(
    card: ElementRef<'_>,
    product_id: String,
    page_url: Option<&Url>,
    scraped_at: DateTime<Utc>,
) -> Option<WatchedProduct> {
    let title = first_text(card, &TITLE);
    if title.is_empty() {
        return None;
    }

    let price_text = first_text(card, &PRICE);
    let current = parse_listing_price(&price_text);
    let original = parse_listing_price(&first_text(card, &ORIGINAL_PRICE)).or(current);
    let currency = detect_currency(&price_text);

    let discount_text = first_text(card, &DISCOUNT);
    let discount = if discount_text.is_empty() {
        computed_discount(current, original).unwrap_or_default()
    } else {
        discount_text
    };

    let store = first_text(card, &STORE);

    Some(WatchedProduct {
        product_id,
        image_url: card.select(&IMAGE).next().map(image_url).unwrap_or_default(),
        video_url: String::new(),
        product_desc: title,
        origin_price: format_price(currency, original),
        discount_price: format_price(currency, current),
        discount,
        currency: currency.to_owned(),
        commission_rate: 0.0,
        commission: String::new(),
        sales_180_day: first_integer(&first_text(card, &SALES)),
        positive_feedback: String::new(),
        promotion_url: card
            .select(&ITEM_LINK)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(|href| resolve(page_url, href))
            .unwrap_or_default(),
        store: if store.is_empty() {
            ALIEXPRESS_SOURCE.to_owned()
        } else {
            store
        },
        scraped_at,
    })
}
