use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("no Chromium-family browser found; set COMOPRECIO_BROWSER_EXECUTABLE")]
    NoBrowser,

    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("DevTools protocol error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    #[error("navigation to {url} timed out after {secs}s")]
    NavigationTimeout { url: String, secs: u64 },

    #[error(transparent)]
    Output(#[from] comoprecio_core::OutputError),

    #[error("no element matched selector {0:?} in time")]
    Selector(String),

    #[error("attached browser has no open page")]
    NoPage,
}
