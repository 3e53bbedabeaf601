//! Page watch: attach to a browser the user is already driving and collect
//! product cards as they scroll.
//!
//! The page gets a scroll counter and a small badge. Scans run one second
//! after attaching, every three seconds after that, and whenever scrolling
//! has settled for half a second. Clicking the badge saves a download.

mod extract;
mod session;

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use chromiumoxide::Page;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};

use crate::error::BrowserError;
use crate::launch::connect;

pub use extract::{
    card_id, computed_discount, detect_currency, fallback_id, first_integer, parse_listing_price,
    watched_product, WATCH_CARD_SELECTOR,
};
pub use session::{Debounce, WatchCommand, WatchSession};

const INITIAL_SCAN_DELAY: Duration = Duration::from_secs(1);
const SCAN_INTERVAL: Duration = Duration::from_secs(3);
const SCROLL_QUIET: Duration = Duration::from_millis(500);
const POLL_INTERVAL: Duration = Duration::from_millis(250);
const BADGE_REFRESH: Duration = Duration::from_secs(1);

const INSTALL_SCRIPT: &str = r#"(() => {
  if (window.__comoprecioWatch) return true;
  const state = { scrolls: 0, downloadRequested: false };
  window.__comoprecioWatch = state;
  window.addEventListener('scroll', () => { state.scrolls += 1; });
  const badge = document.createElement('div');
  badge.id = 'comoprecio-watch-badge';
  badge.style.cssText = 'position:fixed;top:10px;right:10px;background:linear-gradient(135deg,#ff6b35,#ff4757);'
    + 'color:white;padding:12px 20px;border-radius:12px;font-family:-apple-system,BlinkMacSystemFont,sans-serif;'
    + 'font-size:14px;z-index:99999;box-shadow:0 4px 20px rgba(0,0,0,0.3);cursor:pointer;';
  badge.innerHTML = 'Scraper activo: <span id="comoprecio-watch-count">0</span> productos';
  badge.addEventListener('click', () => { state.downloadRequested = true; });
  document.body.appendChild(badge);
  return true;
})()"#;

const POLL_SCRIPT: &str = r"(() => {
  const state = window.__comoprecioWatch;
  if (!state) return null;
  const out = { scrolls: state.scrolls, downloadRequested: state.downloadRequested };
  state.downloadRequested = false;
  return out;
})()";

#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub ws_url: String,
    pub output_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageState {
    scrolls: u64,
    download_requested: bool,
}

/// Attaches to the browser at `options.ws_url` and watches its first page
/// until `quit` is typed or stdin closes. Returns the number of products
/// held when the session ended.
///
/// # Errors
///
/// Returns [`BrowserError::Cdp`] if the browser cannot be reached and
/// [`BrowserError::NoPage`] if it has no open page. Failures after attaching
/// are logged and the session carries on.
pub async fn run_watch(options: &WatchOptions) -> Result<usize, BrowserError> {
    let (browser, handler) = connect(&options.ws_url).await?;
    let page = browser
        .pages()
        .await?
        .into_iter()
        .next()
        .ok_or(BrowserError::NoPage)?;

    install(&page).await;
    print_help();

    let mut session = WatchSession::new();
    let mut debounce = Debounce::new(SCROLL_QUIET);
    let mut last_scrolls = 0;

    let start = Instant::now();
    let initial = tokio::time::sleep(INITIAL_SCAN_DELAY);
    tokio::pin!(initial);
    let mut initial_done = false;

    let mut periodic = interval_at(start + SCAN_INTERVAL, SCAN_INTERVAL);
    let mut poll = interval(POLL_INTERVAL);
    let mut badge = interval(BADGE_REFRESH);
    for timer in [&mut periodic, &mut poll, &mut badge] {
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            () = &mut initial, if !initial_done => {
                initial_done = true;
                scan(&page, &mut session).await;
            }
            _ = periodic.tick() => scan(&page, &mut session).await,
            _ = poll.tick() => {
                let Some(state) = poll_state(&page).await else {
                    continue;
                };
                let now = Instant::now();
                if state.scrolls != last_scrolls {
                    last_scrolls = state.scrolls;
                    debounce.record(now);
                }
                if debounce.fire(now) {
                    scan(&page, &mut session).await;
                }
                if state.download_requested {
                    download(&session, options);
                }
            }
            _ = badge.tick() => refresh_badge(&page, session.len()).await,
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!(error = %e, "stdin read failed");
                        break;
                    }
                };
                match WatchCommand::parse(&line) {
                    Some(WatchCommand::Download) => download(&session, options),
                    Some(WatchCommand::Show) => print!("{}", session.summary_table()),
                    Some(WatchCommand::Clear) => {
                        session.clear();
                        tracing::info!("products cleared");
                    }
                    Some(WatchCommand::Quit) => break,
                    None if line.trim().is_empty() => {}
                    None => print_help(),
                }
            }
        }
    }

    handler.abort();
    tracing::info!(count = session.len(), "watch ended");
    Ok(session.len())
}

fn print_help() {
    println!("Commands: download | show | clear | quit");
}

async fn install(page: &Page) {
    if let Err(e) = page.evaluate(INSTALL_SCRIPT).await {
        tracing::warn!(error = %e, "could not instrument page");
    }
}

/// Reads and resets the page-side state, reinstalling it after a navigation.
async fn poll_state(page: &Page) -> Option<PageState> {
    let state = match page.evaluate(POLL_SCRIPT).await {
        Ok(result) => result.into_value::<Option<PageState>>().ok().flatten(),
        Err(e) => {
            tracing::debug!(error = %e, "page poll failed");
            return None;
        }
    };
    if state.is_none() {
        install(page).await;
    }
    state
}

async fn scan(page: &Page, session: &mut WatchSession) {
    let html = match page.content().await {
        Ok(html) => html,
        Err(e) => {
            tracing::warn!(error = %e, "page snapshot failed");
            return;
        }
    };
    let url = page.url().await.ok().flatten().unwrap_or_default();
    session.scan(&html, &url, Utc::now());
}

async fn refresh_badge(page: &Page, count: usize) {
    let script = format!(
        "(() => {{ const el = document.getElementById('comoprecio-watch-count'); if (el) el.textContent = '{count}'; }})()"
    );
    if let Err(e) = page.evaluate(script).await {
        tracing::debug!(error = %e, "badge refresh failed");
    }
}

fn download(session: &WatchSession, options: &WatchOptions) {
    match session.download(&options.output_dir, Utc::now()) {
        Ok(Some(path)) => {
            tracing::info!(path = %path.display(), count = session.len(), "products downloaded");
        }
        Ok(None) => tracing::warn!("no products to download"),
        Err(e) => tracing::error!(error = %e, "download failed"),
    }
}
