//! Back-off for idempotent reads.
//!
//! Only `GET` requests go through [`retry_with_backoff`]. Mutations are sent
//! exactly once.

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

/// Longest sleep between two attempts.
const MAX_DELAY: Duration = Duration::from_secs(30);

/// Network failures and 5xx responses are retriable. Backend envelopes,
/// decoding failures and client-side problems are not.
pub(crate) fn is_retriable(err: &ClientError) -> bool {
    match err {
        ClientError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ClientError::UnexpectedStatus { status, .. } => *status >= 500,
        ClientError::Api(_)
        | ClientError::Deserialize { .. }
        | ClientError::InvalidBaseUrl { .. }
        | ClientError::Io { .. } => false,
    }
}

/// Nominal wait before retry number `retry` (1-based): `base × 2^(retry-1)`,
/// capped at [`MAX_DELAY`].
fn nominal_delay(base_ms: u64, retry: u32) -> Duration {
    let factor = 1u64 << retry.saturating_sub(1).min(16);
    Duration::from_millis(base_ms.saturating_mul(factor)).min(MAX_DELAY)
}

/// Spreads `delay` uniformly over 75 % to 125 % of its value.
fn jittered(delay: Duration) -> Duration {
    delay.mul_f64(0.75 + rand::random::<f64>() * 0.5)
}

/// Runs `operation`, retrying transient failures up to `max_retries` times.
///
/// Non-retriable errors and the error from the final attempt are returned
/// as-is.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut retry = 0;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if retry >= max_retries || !is_retriable(&err) => return Err(err),
            Err(err) => err,
        };
        retry += 1;
        let delay = jittered(nominal_delay(backoff_base_ms, retry));
        tracing::warn!(
            retry,
            max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "backend read failed, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}
