//! Locating, launching and attaching to a Chromium-family browser.

use std::path::Path;

use chromiumoxide::browser::BrowserConfig;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::{Browser, Handler};
use futures::StreamExt;
use tokio::task::JoinHandle;

use crate::error::BrowserError;

/// User agent presented by the search harvest browser.
pub const SEARCH_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const VIEWPORT_WIDTH: u32 = 1280;
pub const VIEWPORT_HEIGHT: u32 = 900;

const PATH_CANDIDATES: [&str; 5] = [
    "google-chrome",
    "chromium",
    "chromium-browser",
    "chrome",
    "brave-browser",
];

#[cfg(target_os = "macos")]
const WELL_KNOWN: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "/Applications/Brave Browser.app/Contents/MacOS/Brave Browser",
];

#[cfg(target_os = "windows")]
const WELL_KNOWN: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const WELL_KNOWN: &[&str] = &[
    "/usr/bin/google-chrome",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/usr/local/bin/chromium",
];

/// Finds a browser executable.
///
/// An explicit override wins when it exists on disk; otherwise `PATH` is
/// scanned, then the platform's usual install locations.
#[must_use]
pub fn find_browser_executable(override_path: Option<&str>) -> Option<String> {
    if let Some(p) = override_path.filter(|p| Path::new(p).exists()) {
        return Some(p.to_owned());
    }

    if let Some(path_var) = std::env::var_os("PATH") {
        for dir in std::env::split_paths(&path_var) {
            for exe in PATH_CANDIDATES {
                let full = dir.join(exe);
                if full.exists() {
                    return Some(full.to_string_lossy().into_owned());
                }
            }
        }
    }

    WELL_KNOWN
        .iter()
        .find(|p| Path::new(p).exists())
        .map(|p| (*p).to_owned())
}

/// Visible browser for the search harvest: fixed viewport, sandbox off.
///
/// # Errors
///
/// Returns [`BrowserError::Launch`] if chromiumoxide rejects the config.
pub fn search_browser_config(executable: &str) -> Result<BrowserConfig, BrowserError> {
    BrowserConfig::builder()
        .with_head()
        .chrome_executable(executable)
        .viewport(Viewport {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
            device_scale_factor: Some(1.0),
            emulating_mobile: false,
            is_landscape: true,
            has_touch: false,
        })
        .window_size(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
        .arg("--no-sandbox")
        .arg("--disable-setuid-sandbox")
        .arg(format!("--user-agent={SEARCH_USER_AGENT}"))
        .build()
        .map_err(BrowserError::Launch)
}

/// Launches a browser and spawns its event loop.
///
/// # Errors
///
/// Returns [`BrowserError::Cdp`] if the process cannot be started.
pub async fn launch(config: BrowserConfig) -> Result<(Browser, JoinHandle<()>), BrowserError> {
    let (browser, handler) = Browser::launch(config).await?;
    Ok((browser, spawn_handler(handler)))
}

/// Attaches to an already running browser through its DevTools websocket.
///
/// # Errors
///
/// Returns [`BrowserError::Cdp`] if the websocket cannot be reached.
pub async fn connect(ws_url: &str) -> Result<(Browser, JoinHandle<()>), BrowserError> {
    let (browser, handler) = Browser::connect(ws_url).await?;
    Ok((browser, spawn_handler(handler)))
}

fn spawn_handler(mut handler: Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                tracing::warn!(error = %e, "browser handler error");
            }
        }
    })
}
