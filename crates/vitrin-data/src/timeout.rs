//! Timeout configuration for outbound requests.

#[cfg(not(target_arch = "wasm32"))]
use std::future::Future;
use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
use crate::error::StoreError;

/// Timeout configuration for a store request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Connection establishment.
    pub connect: Duration,
    /// Whole exchange, including reading the body.
    pub total: Duration,
}

impl TimeoutConfig {
    pub fn new(connect: Duration, total: Duration) -> Self {
        Self { connect, total }
    }

    /// Create from a single total timeout.
    pub fn from_total(total: Duration) -> Self {
        Self {
            connect: std::cmp::min(total / 4, Duration::from_secs(2)),
            total,
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self::from_total(Duration::from_secs(8))
    }
}

/// Whole nanoseconds, saturating, as wasi clocks count them.
pub fn nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

/// Run `fut`, failing with [`StoreError::Timeout`] once `total` elapses.
#[cfg(not(target_arch = "wasm32"))]
pub async fn with_deadline<F, T>(total: Duration, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(total, fut).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(total)),
    }
}

/// Sleep between retry attempts.
#[cfg(not(target_arch = "wasm32"))]
pub async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(target_arch = "wasm32")]
pub async fn pause(delay: Duration) {
    if !delay.is_zero() {
        wasi::clocks::monotonic_clock::subscribe_duration(nanos(delay)).block();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_total_splits_connect() {
        let cfg = TimeoutConfig::from_total(Duration::from_secs(4));
        assert_eq!(cfg.connect, Duration::from_secs(1));
        assert_eq!(TimeoutConfig::default().connect, Duration::from_secs(2));
    }

    #[test]
    fn test_nanos_saturates() {
        assert_eq!(nanos(Duration::from_secs(8)), 8_000_000_000);
        assert_eq!(nanos(Duration::MAX), u64::MAX);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_elapses() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok::<_, StoreError>(())
        };
        let result = with_deadline(Duration::from_secs(8), slow).await;
        assert_eq!(result, Err(StoreError::Timeout(Duration::from_secs(8))));
    }

    #[tokio::test]
    async fn test_deadline_passes_through() {
        let result = with_deadline(Duration::from_secs(1), async { Ok::<_, StoreError>(7) }).await;
        assert_eq!(result, Ok(7));
    }
}
