pub mod cards;
mod dom;
pub mod error;
pub mod launch;
pub mod search;
pub mod watch;

pub use cards::{extract_search_cards, SearchAccumulator};
pub use error::BrowserError;
pub use launch::find_browser_executable;
pub use search::{run_search, HarvestLimits, SearchOptions};
pub use watch::{run_watch, WatchOptions, WatchSession};
