use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::{first_href, joined_text, selector, StoreParser, StoreResult};
use crate::client::{absolutize, encode_component};
use crate::parse::parse_price;

static ITEM: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"[data-test="mms-search-srp-productlist-item"]"#));
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector(r#"[data-test="product-title"]"#));
static PRICE: LazyLock<Selector> = LazyLock::new(|| selector(r#"[data-test="product-price"]"#));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a"));

/// `MediaMarkt` Spain search results (`/es/search.html?query=`).
pub struct MediaMarktParser;

impl StoreParser for MediaMarktParser {
    fn store_id(&self) -> &'static str {
        "mediamarkt"
    }

    fn search_path(&self, term: &str) -> String {
        format!("/es/search.html?query={}", encode_component(term))
    }

    fn parse(&self, html: &str, base_url: &str) -> Option<StoreResult> {
        let doc = Html::parse_document(html);
        let item = doc.select(&ITEM).next()?;

        let price = parse_price(&joined_text(item, &PRICE)).filter(|p| *p > 0.0)?;

        Some(StoreResult {
            title: joined_text(item, &TITLE),
            price,
            shipping: self.shipping(),
            url: absolutize(base_url, first_href(item, &LINK)),
            stock: true,
        })
    }
}
