//! Per-store search result parsers.
//!
//! Each parser knows how to build its store's search URL and how to pull the
//! first usable listing out of the returned HTML. Stores without a parser are
//! skipped by the comparison run.

mod amazon;
mod mediamarkt;
mod pccomponentes;

use scraper::{ElementRef, Selector};

pub use amazon::AmazonParser;
pub use mediamarkt::MediaMarktParser;
pub use pccomponentes::PcComponentesParser;

/// The first priced listing a store returned for a search.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreResult {
    pub title: String,
    pub price: f64,
    pub shipping: f64,
    pub url: String,
    pub stock: bool,
}

pub trait StoreParser: Send + Sync {
    /// Catalog store id this parser serves, e.g. `"amazon"`.
    fn store_id(&self) -> &'static str;

    /// Path and query appended to the store's base URL for `term`.
    fn search_path(&self, term: &str) -> String;

    /// Extracts the first listing with a usable price, or `None`.
    fn parse(&self, html: &str, base_url: &str) -> Option<StoreResult>;

    /// Flat shipping cost added to every offer from this store.
    fn shipping(&self) -> f64 {
        0.0
    }

    fn search_url(&self, base_url: &str, term: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.search_path(term))
    }
}

/// Lookup table from store id to its parser.
pub struct ParserRegistry {
    parsers: Vec<Box<dyn StoreParser>>,
}

impl ParserRegistry {
    /// A registry with no parsers.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Amazon ES, `PCComponentes` and `MediaMarkt`.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(AmazonParser));
        registry.register(Box::new(PcComponentesParser));
        registry.register(Box::new(MediaMarktParser));
        registry
    }

    /// Adds a parser, replacing any earlier one for the same store.
    pub fn register(&mut self, parser: Box<dyn StoreParser>) {
        self.parsers.retain(|p| p.store_id() != parser.store_id());
        self.parsers.push(parser);
    }

    #[must_use]
    pub fn get(&self, store_id: &str) -> Option<&dyn StoreParser> {
        self.parsers
            .iter()
            .find(|p| p.store_id() == store_id)
            .map(|p| &**p)
    }

    #[must_use]
    pub fn store_ids(&self) -> Vec<&'static str> {
        self.parsers.iter().map(|p| p.store_id()).collect()
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

/// Concatenated, trimmed text of every element under `el` matching `sel`.
pub(crate) fn joined_text(el: ElementRef<'_>, sel: &Selector) -> String {
    el.select(sel)
        .flat_map(|m| m.text())
        .collect::<String>()
        .trim()
        .to_owned()
}

/// Raw text of the first element under `el` matching `sel`.
pub(crate) fn first_text(el: ElementRef<'_>, sel: &Selector) -> Option<String> {
    el.select(sel).next().map(|m| m.text().collect())
}

/// `href` of the first element under `el` matching `sel`.
pub(crate) fn first_href<'a>(el: ElementRef<'a>, sel: &Selector) -> Option<&'a str> {
    el.select(sel).next().and_then(|a| a.value().attr("href"))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedParser(&'static str);

    impl StoreParser for FixedParser {
        fn store_id(&self) -> &'static str {
            self.0
        }

        fn search_path(&self, term: &str) -> String {
            format!("/find/{term}")
        }

        fn parse(&self, _html: &str, base_url: &str) -> Option<StoreResult> {
            Some(StoreResult {
                title: "fixed".to_owned(),
                price: 1.0,
                shipping: self.shipping(),
                url: base_url.to_owned(),
                stock: true,
            })
        }
    }

    #[test]
    fn builtin_registry_covers_three_stores() {
        let registry = ParserRegistry::builtin();
        assert_eq!(
            registry.store_ids(),
            vec!["amazon", "pccomponentes", "mediamarkt"]
        );
        assert!(registry.get("amazon").is_some());
        assert!(registry.get("aliexpress").is_none());
        assert!(registry.get("fnac").is_none());
    }

    #[test]
    fn register_replaces_parser_for_same_store() {
        let mut registry = ParserRegistry::builtin();
        registry.register(Box::new(FixedParser("amazon")));
        assert_eq!(registry.store_ids().len(), 3);
        let parser = registry.get("amazon").unwrap();
        assert_eq!(parser.search_path("x"), "/find/x");
    }

    #[test]
    fn search_url_joins_base_and_path() {
        let parser = FixedParser("demo");
        assert_eq!(
            parser.search_url("https://demo.example/", "abc"),
            "https://demo.example/find/abc"
        );
    }

    #[test]
    fn empty_registry_has_no_parsers() {
        let registry = ParserRegistry::empty();
        assert!(registry.store_ids().is_empty());
        assert!(registry.get("amazon").is_none());
    }
}
