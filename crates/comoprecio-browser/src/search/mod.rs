//! Search harvest: drive a visible browser through an AliExpress search and
//! collect the product cards it scrolls past.

mod harvest;

use std::path::PathBuf;
use std::time::Duration;

use chromiumoxide::element::Element;
use chromiumoxide::Page;
use comoprecio_core::{write_json, SearchDocument, ALIEXPRESS_SOURCE};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::error::BrowserError;
use crate::launch::{find_browser_executable, launch, search_browser_config};

pub use harvest::{harvest, HarvestLimits, HarvestOutcome, PageSnapshot, ResultsPage};

pub const ALIEXPRESS_HOME: &str = "https://www.aliexpress.com";

/// Search box selectors, tried in order.
pub const SEARCH_BOX_SELECTORS: [&str; 5] = [
    r#"input[type="search"]"#,
    r#"input[class*="search"]"#,
    "#search-words",
    r#"input[placeholder*="search"]"#,
    r#"input[name="SearchText"]"#,
];

const POPUP_CLOSE_SELECTOR: &str = r#"[class*="close"]"#;

const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(60);
const AFTER_HOME_LOAD: Duration = Duration::from_secs(3);
const POPUP_WAIT: Duration = Duration::from_secs(2);
const SEARCH_BOX_WAIT: Duration = Duration::from_secs(3);
const KEY_DELAY: Duration = Duration::from_millis(50);
const AFTER_SEARCH: Duration = Duration::from_secs(5);
const HOLD_OPEN: Duration = Duration::from_secs(5);
const ELEMENT_POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub term: String,
    pub output_path: PathBuf,
    pub executable: Option<String>,
    pub limits: HarvestLimits,
}

/// Result-page URL used when no search box could be typed into.
#[must_use]
pub fn direct_search_url(term: &str) -> String {
    format!(
        "{ALIEXPRESS_HOME}/wholesale?SearchText={}",
        utf8_percent_encode(term, NON_ALPHANUMERIC)
    )
}

/// Runs a full search harvest and returns how many products were saved.
///
/// Failures while navigating or harvesting are logged and end the harvest;
/// products collected up to that point are still written.
///
/// # Errors
///
/// Returns [`BrowserError`] when no browser can be found or launched, or when
/// the output file cannot be written.
pub async fn run_search(options: &SearchOptions) -> Result<usize, BrowserError> {
    let executable =
        find_browser_executable(options.executable.as_deref()).ok_or(BrowserError::NoBrowser)?;
    tracing::info!(browser = %executable, term = %options.term, "launching browser");

    let (mut browser, handler) = launch(search_browser_config(&executable)?).await?;
    let page = browser.new_page("about:blank").await?;

    let products = match open_results(&page, &options.term).await {
        Ok(()) => {
            let mut results = ChromeResultsPage { page: &page };
            harvest(&mut results, &options.limits).await.products
        }
        Err(e) => {
            tracing::error!(error = %e, "could not reach search results");
            Vec::new()
        }
    };
    tracing::info!(count = products.len(), "harvest finished");

    let saved = products.len();
    if saved > 0 {
        let doc = SearchDocument::new(ALIEXPRESS_SOURCE, &options.term, products);
        write_json(&options.output_path, &doc)?;
        tracing::info!(path = %options.output_path.display(), count = saved, "search results saved");
    }

    tokio::time::sleep(HOLD_OPEN).await;
    if let Err(e) = browser.close().await {
        tracing::warn!(error = %e, "browser did not close cleanly");
    }
    handler.abort();

    Ok(saved)
}

/// Loads the home page and submits the search, falling back to the direct
/// results URL when no search box accepts input.
async fn open_results(page: &Page, term: &str) -> Result<(), BrowserError> {
    navigate(page, ALIEXPRESS_HOME).await?;
    tokio::time::sleep(AFTER_HOME_LOAD).await;

    dismiss_popup(page).await;

    if !submit_search(page, term).await {
        tracing::info!("no search box found, opening results directly");
        navigate(page, &direct_search_url(term)).await?;
    }

    tokio::time::sleep(AFTER_SEARCH).await;
    Ok(())
}

async fn navigate(page: &Page, url: &str) -> Result<(), BrowserError> {
    tracing::debug!(url, "navigating");
    tokio::time::timeout(NAVIGATION_TIMEOUT, page.goto(url))
        .await
        .map_err(|_| BrowserError::NavigationTimeout {
            url: url.to_owned(),
            secs: NAVIGATION_TIMEOUT.as_secs(),
        })??;
    Ok(())
}

async fn dismiss_popup(page: &Page) {
    match wait_for_element(page, POPUP_CLOSE_SELECTOR, POPUP_WAIT).await {
        Ok(el) => {
            if let Err(e) = el.click().await {
                tracing::debug!(error = %e, "popup close click failed");
            }
        }
        Err(_) => tracing::debug!("no popup to dismiss"),
    }
}

/// Types `term` into the first search box that shows up, then presses Enter.
async fn submit_search(page: &Page, term: &str) -> bool {
    for css in SEARCH_BOX_SELECTORS {
        let Ok(input) = wait_for_element(page, css, SEARCH_BOX_WAIT).await else {
            continue;
        };
        match type_slowly(&input, term).await {
            Ok(()) => {
                tracing::info!(selector = css, "search submitted");
                return true;
            }
            Err(e) => tracing::debug!(selector = css, error = %e, "search box rejected input"),
        }
    }
    false
}

async fn type_slowly(input: &Element, term: &str) -> Result<(), BrowserError> {
    input.click().await?;
    let mut buf = [0u8; 4];
    for ch in term.chars() {
        input.type_str(ch.encode_utf8(&mut buf)).await?;
        tokio::time::sleep(KEY_DELAY).await;
    }
    input.press_key("Enter").await?;
    Ok(())
}

/// Polls for `css` until it appears or `timeout` elapses.
async fn wait_for_element(page: &Page, css: &str, timeout: Duration) -> Result<Element, BrowserError> {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if let Ok(el) = page.find_element(css).await {
            return Ok(el);
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(BrowserError::Selector(css.to_owned()));
        }
        tokio::time::sleep(ELEMENT_POLL).await;
    }
}

struct ChromeResultsPage<'a> {
    page: &'a Page,
}

impl ResultsPage for ChromeResultsPage<'_> {
    async fn snapshot(&mut self) -> Result<PageSnapshot, BrowserError> {
        let html = self.page.content().await?;
        let url = self.page.url().await?.unwrap_or_default();
        Ok(PageSnapshot { html, url })
    }

    async fn scroll_viewport(&mut self) -> Result<(), BrowserError> {
        self.page
            .evaluate("window.scrollBy(0, window.innerHeight)")
            .await?;
        Ok(())
    }
}
