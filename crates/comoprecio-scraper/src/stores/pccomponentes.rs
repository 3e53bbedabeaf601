use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::{first_href, selector, StoreParser, StoreResult};
use crate::client::{absolutize, encode_component};
use crate::parse::parse_price;

static PRODUCT: LazyLock<Selector> = LazyLock::new(|| selector("[data-product-name]"));
static PRICE: LazyLock<Selector> = LazyLock::new(|| selector("[data-product-price]"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a"));

/// `PCComponentes` search results (`/buscar/?query=`).
pub struct PcComponentesParser;

impl StoreParser for PcComponentesParser {
    fn store_id(&self) -> &'static str {
        "pccomponentes"
    }

    fn search_path(&self, term: &str) -> String {
        format!("/buscar/?query={}", encode_component(term))
    }

    fn parse(&self, html: &str, base_url: &str) -> Option<StoreResult> {
        let doc = Html::parse_document(html);
        let product = doc.select(&PRODUCT).next()?;

        let price_attr = product
            .select(&PRICE)
            .next()
            .and_then(|el| el.value().attr("data-product-price"))?;
        let price = parse_price(price_attr).filter(|p| *p > 0.0)?;

        Some(StoreResult {
            title: product
                .value()
                .attr("data-product-name")
                .unwrap_or_default()
                .to_owned(),
            price,
            // Free shipping above 25 EUR, which covers the catalog.
            shipping: self.shipping(),
            url: absolutize(base_url, first_href(product, &LINK)),
            stock: true,
        })
    }
}
