use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::{first_href, first_text, joined_text, selector, StoreParser, StoreResult};
use crate::client::{absolutize, encode_component};
use crate::parse::parse_price;

/// Only the top results are considered; sponsored noise grows further down.
const MAX_RESULTS: usize = 3;

static RESULT: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"[data-component-type="s-search-result"]"#));
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("h2 a span"));
static PRICE_WHOLE: LazyLock<Selector> = LazyLock::new(|| selector(".a-price-whole"));
static PRICE_FRACTION: LazyLock<Selector> = LazyLock::new(|| selector(".a-price-fraction"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("h2 a"));

/// Amazon ES search results (`/s?k=`).
pub struct AmazonParser;

impl StoreParser for AmazonParser {
    fn store_id(&self) -> &'static str {
        "amazon"
    }

    fn search_path(&self, term: &str) -> String {
        format!("/s?k={}", encode_component(term))
    }

    fn parse(&self, html: &str, base_url: &str) -> Option<StoreResult> {
        let doc = Html::parse_document(html);

        doc.select(&RESULT).take(MAX_RESULTS).find_map(|item| {
            let whole = first_text(item, &PRICE_WHOLE).filter(|w| !w.is_empty())?;
            let fraction = first_text(item, &PRICE_FRACTION).unwrap_or_default();
            let price = parse_price(&format!("{whole}{fraction}")).filter(|p| *p > 0.0)?;

            Some(StoreResult {
                title: joined_text(item, &TITLE),
                price,
                // Prime listings ship free.
                shipping: self.shipping(),
                url: absolutize(base_url, first_href(item, &LINK)),
                stock: true,
            })
        })
    }
}
