use std::collections::VecDeque;

use tokio::time::Instant;

use super::*;

const PAGE_URL: &str = "https://www.aliexpress.com/w/wholesale-dress.html";

enum Step {
    Html(String),
    Fail,
}

/// Replays scripted snapshots; the last one repeats once the script runs out.
struct ScriptedPage {
    steps: VecDeque<Step>,
    last_html: String,
    scroll_calls: usize,
}

impl ScriptedPage {
    fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: steps.into(),
            last_html: String::new(),
            scroll_calls: 0,
        }
    }
}

impl ResultsPage for ScriptedPage {
    async fn snapshot(&mut self) -> Result<PageSnapshot, BrowserError> {
        match self.steps.pop_front() {
            Some(Step::Html(html)) => self.last_html = html,
            Some(Step::Fail) => return Err(BrowserError::NoPage),
            None => {}
        }
        Ok(PageSnapshot {
            html: self.last_html.clone(),
            url: PAGE_URL.to_owned(),
        })
    }

    async fn scroll_viewport(&mut self) -> Result<(), BrowserError> {
        self.scroll_calls += 1;
        Ok(())
    }
}

fn results(ids: &[u32]) -> String {
    let cards: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<div class="search-item-card">
                     <a href="/item/{id}.html"><img src="//ae01.alicdn.com/{id}.jpg"></a>
                     <h3>Producto {id}</h3>
                     <span class="price-sale">€{id},99</span>
                   </div>"#
            )
        })
        .collect();
    format!("<html><body>{cards}</body></html>")
}

fn limits(max_products: usize, max_scrolls: usize) -> HarvestLimits {
    HarvestLimits {
        max_products,
        max_scrolls,
        ..HarvestLimits::default()
    }
}

#[test]
fn default_limits() {
    let l = HarvestLimits::default();
    assert_eq!(l.max_products, 200);
    assert_eq!(l.max_scrolls, 50);
    assert_eq!(l.scroll_pause, Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn stops_after_max_scrolls_pausing_between_each() {
    let mut page = ScriptedPage::new(vec![Step::Html(results(&[1, 2]))]);
    let start = Instant::now();

    let outcome = harvest(&mut page, &limits(200, 3)).await;

    assert!(outcome.error.is_none());
    assert_eq!(outcome.scrolls, 3);
    assert_eq!(page.scroll_calls, 3);
    assert_eq!(outcome.products.len(), 2);
    assert!(start.elapsed() >= Duration::from_secs(6));
}

#[tokio::test(start_paused = true)]
async fn stops_once_product_limit_reached_keeping_the_whole_batch() {
    let mut page = ScriptedPage::new(vec![
        Step::Html(results(&[1, 2])),
        Step::Html(results(&[1, 2, 3, 4])),
        Step::Html(results(&[5, 6])),
    ]);

    let outcome = harvest(&mut page, &limits(3, 50)).await;

    assert_eq!(outcome.scrolls, 2);
    let ids: Vec<&str> = outcome.products.iter().map(|p| p.product_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4"]);
}

#[tokio::test(start_paused = true)]
async fn page_error_ends_harvest_but_keeps_products() {
    let mut page = ScriptedPage::new(vec![Step::Html(results(&[10, 11])), Step::Fail]);

    let outcome = harvest(&mut page, &limits(200, 50)).await;

    assert!(matches!(outcome.error, Some(BrowserError::NoPage)));
    assert_eq!(outcome.scrolls, 1);
    assert_eq!(outcome.products.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn empty_results_still_scroll_until_limit() {
    let mut page = ScriptedPage::new(vec![Step::Html("<html><body></body></html>".to_owned())]);

    let outcome = harvest(&mut page, &limits(200, 4)).await;

    assert!(outcome.products.is_empty());
    assert_eq!(outcome.scrolls, 4);
}
