//! End-to-end comparison runs against a local `wiremock` server standing in
//! for every store.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use comoprecio_core::Catalog;
use comoprecio_scraper::{scrape_store, ComparisonRun, ParserRegistry, ScraperError, StoreClient};

fn test_client(max_attempts: u32) -> StoreClient {
    StoreClient::new(5, "comoprecio-test/0.1", max_attempts, 0)
        .expect("failed to build test StoreClient")
}

/// One product looked up in Amazon, `PCComponentes` and Fnac, all served by `base`.
fn catalog_for(base: &str) -> Catalog {
    Catalog::from_yaml(&format!(
        r#"
stores:
  - id: amazon
    name: Amazon
    logo: https://logo.example/amazon.png
    country: ES
    base_url: {base}
  - id: pccomponentes
    name: PCComponentes
    logo: https://logo.example/pcc.png
    country: ES
    base_url: {base}
  - id: fnac
    name: Fnac
    logo: https://logo.example/fnac.png
    country: ES
    base_url: {base}
products:
  - id: airpods-pro-2
    search_terms: ["AirPods Pro 2", "Apple AirPods Pro"]
    brand: Apple
    category: audio
    stores: [amazon, pccomponentes, fnac]
"#
    ))
    .expect("test catalog should validate")
}

fn amazon_page(whole: &str, fraction: &str) -> String {
    format!(
        r#"<html><body>
             <div data-component-type="s-search-result">
               <h2><a href="/airpods/dp/B0CHWRXH8B"><span>Apple AirPods Pro 2</span></a></h2>
               <span class="a-price-whole">{whole}</span><span class="a-price-fraction">{fraction}</span>
             </div>
           </body></html>"#
    )
}

fn pccomponentes_page(price: &str) -> String {
    format!(
        r#"<html><body>
             <article data-product-name="Apple AirPods Pro 2 USB-C">
               <a href="/apple-airpods-pro-2">ver</a>
               <span data-product-price="{price}"></span>
             </article>
           </body></html>"#
    )
}

#[tokio::test]
async fn run_collects_offers_sorted_by_total() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .and(query_param("k", "AirPods Pro 2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(amazon_page("249,", "00")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/buscar/"))
        .and(query_param("query", "AirPods Pro 2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(pccomponentes_page("229.99")))
        .expect(1)
        .mount(&server)
        .await;

    let catalog = catalog_for(&server.uri());
    let client = test_client(3);
    let registry = ParserRegistry::builtin();

    let products = ComparisonRun::new(&catalog, &client, &registry, 0).run().await;

    assert_eq!(products.len(), 1);
    let product = &products[0];
    assert_eq!(product.id, "airpods-pro-2");
    assert_eq!(product.title, "AirPods Pro 2");
    assert!(product.upc.is_none());
    assert!(product.image.contains("MQD83"));

    // Fnac has no parser, so only two offers, cheapest first.
    let sources: Vec<&str> = product.offers.iter().map(|o| o.source.as_str()).collect();
    assert_eq!(sources, vec!["pccomponentes", "amazon"]);
    assert_eq!(
        product.best_offer().map(|o| o.source.as_str()),
        Some("pccomponentes")
    );
    for offer in &product.offers {
        assert!((offer.total - (offer.price + offer.shipping)).abs() < 1e-9);
        assert_eq!(offer.delivery, "1-3");
    }
    assert_eq!(
        product.offers[1].url,
        format!("{}/airpods/dp/B0CHWRXH8B", server.uri())
    );
}

#[tokio::test]
async fn failing_store_contributes_no_offer() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/buscar/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(pccomponentes_page("229.99")))
        .mount(&server)
        .await;

    let catalog = catalog_for(&server.uri());
    let client = test_client(3);
    let registry = ParserRegistry::builtin();

    let products = ComparisonRun::new(&catalog, &client, &registry, 0).run().await;

    let offers = &products[0].offers;
    assert_eq!(offers.len(), 1);
    assert_eq!(offers[0].source, "pccomponentes");
}

#[tokio::test]
async fn page_without_price_contributes_no_offer() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>Sin resultados</body></html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/buscar/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(pccomponentes_page("0")))
        .mount(&server)
        .await;

    let catalog = catalog_for(&server.uri());
    let client = test_client(1);
    let registry = ParserRegistry::builtin();

    let products = ComparisonRun::new(&catalog, &client, &registry, 0).run().await;

    assert!(products[0].offers.is_empty());
    assert!(products[0].best_offer().is_none());
}

#[tokio::test]
async fn transient_errors_are_retried_until_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(200).set_body_string(amazon_page("1.299,", "00")))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(3);
    let registry = ParserRegistry::builtin();
    let parser = registry.get("amazon").expect("amazon parser registered");

    let result = scrape_store(&client, parser, &server.uri(), "iPhone 15 Pro Max")
        .await
        .expect("third attempt should succeed")
        .expect("page has a priced result");

    assert!((result.price - 1299.0).abs() < 1e-9);
}

#[tokio::test]
async fn persistent_errors_exhaust_all_attempts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(404))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(3);
    let registry = ParserRegistry::builtin();
    let parser = registry.get("amazon").expect("amazon parser registered");

    let err = scrape_store(&client, parser, &server.uri(), "iPhone 15 Pro Max")
        .await
        .expect_err("all attempts return 404");

    assert!(
        matches!(err, ScraperError::UnexpectedStatus { status: 404, .. }),
        "expected UnexpectedStatus(404), got {err:?}"
    );
}
