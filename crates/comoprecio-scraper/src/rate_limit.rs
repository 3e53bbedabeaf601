//! Retry with linear backoff for store search requests.
//!
//! Transport failures and non-2xx responses are retried; malformed request
//! URLs and local I/O failures are propagated immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Returns `true` if `err` represents a failure worth another attempt.
fn is_retriable(err: &ScraperError) -> bool {
    matches!(
        err,
        ScraperError::Http(_) | ScraperError::UnexpectedStatus { .. }
    )
}

/// Executes `operation` up to `max_attempts` times.
///
/// After failed attempt `n` (1-based) the function sleeps `backoff_ms * n`
/// milliseconds before trying again. The error from the final attempt is
/// returned unchanged.
///
/// # Backoff schedule (`max_attempts = 3`, `backoff_ms = 2000`)
///
/// | Attempt | Sleep after failure |
/// |---------|---------------------|
/// | 1 | 2000 ms |
/// | 2 | 4000 ms |
/// | 3 | none, error returned |
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_attempts: u32,
    backoff_ms: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !is_retriable(&err) || attempt >= max_attempts {
            return Err(err);
        }

        let delay_ms = backoff_ms.saturating_mul(u64::from(attempt));
        tracing::warn!(
            attempt,
            max_attempts,
            delay_ms,
            error = %err,
            "store request failed, retrying"
        );
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn server_error() -> ScraperError {
        ScraperError::UnexpectedStatus {
            status: 503,
            url: "https://store.example/s?k=x".to_owned(),
        }
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, ScraperError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn third_attempt_success_waits_two_then_four_seconds() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let started = tokio::time::Instant::now();

        let result = retry_with_backoff(3, 2000, || {
            let cc = Arc::clone(&cc);
            async move {
                let n = cc.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(server_error())
                } else {
                    Ok::<&str, ScraperError>("<html>ok</html>")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "<html>ok</html>");
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
        let waited = started.elapsed();
        assert!(
            waited >= Duration::from_millis(2000 + 4000) && waited < Duration::from_millis(6010),
            "expected 6000ms of backoff, waited {waited:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn propagates_last_error_after_all_attempts_fail() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let started = tokio::time::Instant::now();

        let result = retry_with_backoff(3, 2000, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(server_error())
            }
        })
        .await;

        assert_eq!(call_count.load(Ordering::SeqCst), 3);
        assert!(matches!(
            result,
            Err(ScraperError::UnexpectedStatus { status: 503, .. })
        ));
        // No sleep follows the final attempt.
        let waited = started.elapsed();
        assert!(
            waited >= Duration::from_millis(6000) && waited < Duration::from_millis(6010),
            "expected 6000ms of backoff, waited {waited:?}"
        );
    }

    #[tokio::test]
    async fn does_not_retry_invalid_url() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(ScraperError::InvalidUrl {
                    url: "nope".to_owned(),
                    reason: "relative URL without a base".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(ScraperError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn zero_attempts_still_tries_once() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(0, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(server_error())
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(result.is_err());
    }
}
