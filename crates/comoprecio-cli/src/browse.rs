//! `search` and `watch` commands: the browser-driven AliExpress scrapers.

use comoprecio_browser::{HarvestLimits, SearchOptions, WatchOptions};
use comoprecio_core::AppConfig;

pub(crate) async fn run_search(config: &AppConfig, term: &str) -> anyhow::Result<()> {
    let options = SearchOptions {
        term: term.to_owned(),
        output_path: config.browser_output_path.clone(),
        executable: config.browser_executable.clone(),
        limits: HarvestLimits::default(),
    };

    let saved = comoprecio_browser::run_search(&options).await?;
    if saved == 0 {
        tracing::warn!(term, "no products captured, nothing written");
    }
    Ok(())
}

pub(crate) async fn run_watch(config: &AppConfig, ws_url: &str) -> anyhow::Result<()> {
    let options = WatchOptions {
        ws_url: ws_url.to_owned(),
        output_dir: config.watch_output_dir.clone(),
    };
    comoprecio_browser::run_watch(&options).await?;
    Ok(())
}
