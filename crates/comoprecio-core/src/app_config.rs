use std::path::PathBuf;

/// User agent sent by the HTTP comparison scraper unless overridden.
pub const DEFAULT_SCRAPER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_level: String,
    /// Optional catalog override; `None` means the embedded catalog.
    pub catalog_path: Option<PathBuf>,
    /// Where the comparison document is written.
    pub output_path: PathBuf,
    /// Where the search harvest document is written.
    pub browser_output_path: PathBuf,
    /// Directory receiving page-watch downloads.
    pub watch_output_dir: PathBuf,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    /// Total attempts per GET, including the first.
    pub scraper_max_attempts: u32,
    /// Linear backoff unit: the wait after attempt `n` is `n * scraper_retry_backoff_ms`.
    pub scraper_retry_backoff_ms: u64,
    /// Pause after every store visit.
    pub scraper_inter_request_delay_ms: u64,
    pub browser_executable: Option<String>,
}

impl std::fmt::Display for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "output={} browser_output={} timeout={}s attempts={} backoff={}ms delay={}ms",
            self.output_path.display(),
            self.browser_output_path.display(),
            self.scraper_request_timeout_secs,
            self.scraper_max_attempts,
            self.scraper_retry_backoff_ms,
            self.scraper_inter_request_delay_ms,
        )
    }
}
