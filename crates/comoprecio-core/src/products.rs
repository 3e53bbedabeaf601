use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::StoreDescriptor;

/// One store's priced listing for a catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    /// Store id, e.g. `"amazon"`.
    pub source: String,
    pub price: f64,
    /// Flat per-store constant; never measured.
    pub shipping: f64,
    /// `price + shipping`; offers are ordered by this field.
    pub total: f64,
    pub url: String,
    pub stock: bool,
    /// Delivery estimate bucket in days, e.g. `"1-3"`.
    pub delivery: String,
    pub confidence: f64,
}

/// A catalog product together with the offers found for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonProduct {
    pub id: String,
    pub title: String,
    pub brand: String,
    pub category: String,
    pub upc: Option<String>,
    pub image: String,
    pub offers: Vec<Offer>,
}

impl ComparisonProduct {
    /// The cheapest offer by total, if any.
    #[must_use]
    pub fn best_offer(&self) -> Option<&Offer> {
        self.offers.first()
    }
}

/// The price-comparison document written by `comoprecio compare`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonDocument {
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sources: Vec<StoreDescriptor>,
    #[serde(default)]
    pub products: Vec<ComparisonProduct>,
}

impl ComparisonDocument {
    #[must_use]
    pub fn new(sources: Vec<StoreDescriptor>, products: Vec<ComparisonProduct>) -> Self {
        Self {
            last_updated: Some(Utc::now()),
            sources,
            products,
        }
    }

    /// A document with no sources and no products.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            last_updated: None,
            sources: Vec::new(),
            products: Vec::new(),
        }
    }

    #[must_use]
    pub fn offer_count(&self) -> usize {
        self.products.iter().map(|p| p.offers.len()).sum()
    }
}

/// A product card harvested by the search scraper.
///
/// Prices are kept as the free text shown on the card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedProduct {
    pub product_id: String,
    pub title: String,
    pub price: String,
    pub original_price: String,
    pub discount: String,
    pub image_url: String,
    pub product_url: String,
    pub source: String,
}

/// Output of one search harvest run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDocument {
    pub source: String,
    pub search_term: String,
    pub scraped_at: DateTime<Utc>,
    pub count: usize,
    pub products: Vec<ScrapedProduct>,
}

impl SearchDocument {
    #[must_use]
    pub fn new(source: &str, search_term: &str, products: Vec<ScrapedProduct>) -> Self {
        Self {
            source: source.to_string(),
            search_term: search_term.to_string(),
            scraped_at: Utc::now(),
            count: products.len(),
            products,
        }
    }
}

/// A product card captured while watching a live page.
///
/// Field names follow the affiliate-feed layout the downloads are imported
/// into, so they are serialized in `PascalCase`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WatchedProduct {
    pub product_id: String,
    pub image_url: String,
    pub video_url: String,
    pub product_desc: String,
    /// Formatted as `"<CUR> <amount>"`, empty when unknown.
    pub origin_price: String,
    pub discount_price: String,
    pub discount: String,
    pub currency: String,
    pub commission_rate: f64,
    pub commission: String,
    #[serde(rename = "Sales180Day")]
    pub sales_180_day: u64,
    pub positive_feedback: String,
    pub promotion_url: String,
    pub store: String,
    pub scraped_at: DateTime<Utc>,
}

/// Download produced by the page watcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchDocument {
    pub source: String,
    pub scraped_at: DateTime<Utc>,
    pub count: usize,
    pub products: Vec<WatchedProduct>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(source: &str, price: f64) -> Offer {
        Offer {
            source: source.to_string(),
            price,
            shipping: 0.0,
            total: price,
            url: format!("https://{source}.example/p"),
            stock: true,
            delivery: "1-3".to_string(),
            confidence: 0.9,
        }
    }

    #[test]
    fn comparison_document_counts_offers_across_products() {
        let product = |id: &str, offers: Vec<Offer>| ComparisonProduct {
            id: id.to_string(),
            title: id.to_string(),
            brand: "B".to_string(),
            category: "C".to_string(),
            upc: None,
            image: String::new(),
            offers,
        };
        let doc = ComparisonDocument::new(
            vec![],
            vec![
                product("a", vec![offer("amazon", 10.0), offer("fnac", 12.0)]),
                product("b", vec![]),
                product("c", vec![offer("mediamarkt", 3.0)]),
            ],
        );
        assert_eq!(doc.offer_count(), 3);
        assert!(doc.last_updated.is_some());
        assert_eq!(doc.products[0].best_offer().unwrap().source, "amazon");
        assert!(doc.products[1].best_offer().is_none());
    }

    #[test]
    fn comparison_product_serializes_null_upc() {
        let product = ComparisonProduct {
            id: "x".to_string(),
            title: "X".to_string(),
            brand: "B".to_string(),
            category: "C".to_string(),
            upc: None,
            image: "img".to_string(),
            offers: vec![offer("amazon", 1.5)],
        };
        let json = serde_json::to_value(&product).unwrap();
        assert!(json["upc"].is_null());
        assert_eq!(json["offers"][0]["total"], 1.5);
        assert_eq!(json["offers"][0]["stock"], true);
    }

    #[test]
    fn scraped_product_uses_camel_case_keys() {
        let p = ScrapedProduct {
            product_id: "1005".to_string(),
            title: "Dress".to_string(),
            price: "€12,99".to_string(),
            original_price: String::new(),
            discount: "-40%".to_string(),
            image_url: "https://img".to_string(),
            product_url: "https://www.aliexpress.com/item/1005.html".to_string(),
            source: "AliExpress".to_string(),
        };
        let json = serde_json::to_value(&p).unwrap();
        for key in [
            "productId",
            "title",
            "price",
            "originalPrice",
            "discount",
            "imageUrl",
            "productUrl",
            "source",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
    }

    #[test]
    fn search_document_counts_products() {
        let doc = SearchDocument::new("AliExpress", "women clothes", vec![]);
        assert_eq!(doc.count, 0);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["searchTerm"], "women clothes");
        assert!(json.get("scrapedAt").is_some());
    }

    #[test]
    fn watched_product_uses_feed_keys() {
        let p = WatchedProduct {
            product_id: "42".to_string(),
            image_url: String::new(),
            video_url: String::new(),
            product_desc: "Lamp".to_string(),
            origin_price: "EUR 20.00".to_string(),
            discount_price: "EUR 10.00".to_string(),
            discount: "50%".to_string(),
            currency: "EUR".to_string(),
            commission_rate: 0.0,
            commission: String::new(),
            sales_180_day: 7,
            positive_feedback: String::new(),
            promotion_url: String::new(),
            store: "AliExpress".to_string(),
            scraped_at: Utc::now(),
        };
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["ProductId"], "42");
        assert_eq!(json["Sales180Day"], 7);
        assert_eq!(json["DiscountPrice"], "EUR 10.00");
        assert!(json.get("ScrapedAt").is_some());
    }
}
