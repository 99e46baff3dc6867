use std::fmt::Display;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Retry an async operation with staged backoff: one attempt per entry in
/// `base_delays` (sleeping that many seconds after a failure), then
/// `final_retries` extra attempts spaced 10 seconds apart.
///
/// Returns the first success, or the last error once every attempt is spent.
pub async fn retry_with_backoff<F, Fut, T, E>(
    mut operation: F,
    base_delays: &[u64],
    final_retries: usize,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Display,
{
    const FINAL_DELAY_SECS: u64 = 10;

    let total_attempts = base_delays.len() + final_retries;
    let mut last_error = None;

    for attempt in 1..=total_attempts {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if attempt < total_attempts {
                    let delay_secs = base_delays
                        .get(attempt - 1)
                        .copied()
                        .unwrap_or(FINAL_DELAY_SECS);
                    warn!(
                        "Request failed (attempt {attempt}/{total_attempts}): {e}. Retrying after {delay_secs}s..."
                    );
                    sleep(Duration::from_secs(delay_secs)).await;
                }
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) => Err(e),
        // Unreachable: the loop always runs at least once when
        // total_attempts > 0, and zero attempts cannot produce Ok either.
        None => unreachable!("retry loop ran zero attempts"),
    }
}
