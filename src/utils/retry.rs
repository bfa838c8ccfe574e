use anyhow::Result;
use log::warn;
use std::future::Future;
use tokio::time::{sleep, Duration};

/// Runs `op` up to `retries + 1` times, pausing `delay` between attempts.
/// Errors for which `should_retry` returns false are returned immediately.
pub async fn with_retry<T, F, Fut, P>(
    label: &str,
    retries: usize,
    delay: Duration,
    should_retry: P,
    mut op: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    P: Fn(&anyhow::Error) -> bool,
{
    let max_attempts = retries + 1;
    let mut attempt = 0;

    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts && should_retry(&e) => {
                warn!(
                    "{} failed (attempt {}/{}): {:#}, retrying...",
                    label, attempt, max_attempts, e
                );
                sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
