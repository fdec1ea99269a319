//! 지수 백오프 재시도.
//!
//! 외부 소스 호출은 읽기 전용이므로 안전하게 재시도할 수 있습니다.
//! `attempt`번째 실패 후 대기 시간은
//! `clamp(multiplier * 2^(attempt-1), min_delay, max_delay)`입니다.

use std::future::Future;
use std::time::Duration;

use etl_core::FetchConfig;
use tracing::{debug, warn};

use crate::error::{DataError, Result};

/// 재시도 설정.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryConfig {
    /// 최대 시도 횟수 (첫 시도 포함)
    pub max_attempts: u32,
    /// 백오프 배수
    pub multiplier: Duration,
    /// 최소 대기 시간
    pub min_delay: Duration,
    /// 최대 대기 시간
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            multiplier: Duration::from_secs(1),
            min_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryConfig {
    /// 재시도 없이 한 번만 시도합니다.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    /// `attempt`번째 실패 이후 대기 시간 (1부터 시작).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(31);
        let raw = self.multiplier.as_secs_f64() * 2f64.powi(exp as i32);
        let secs = raw.clamp(self.min_delay.as_secs_f64(), self.max_delay.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}

impl From<&FetchConfig> for RetryConfig {
    fn from(config: &FetchConfig) -> Self {
        let secs = |v: f64| Duration::from_secs_f64(v.max(0.0));
        let min_delay = secs(config.backoff_min_secs);
        Self {
            max_attempts: config.max_attempts.max(1),
            multiplier: secs(config.backoff_multiplier_secs),
            min_delay,
            max_delay: secs(config.backoff_max_secs).max(min_delay),
        }
    }
}

/// 재시도 가능한 오류에 대해 작업을 반복합니다.
///
/// 재시도할 수 없는 오류는 즉시 반환하고, 시도 횟수를 모두 쓰면
/// 마지막 오류를 반환합니다.
pub async fn with_retry<T, F, Fut>(config: &RetryConfig, label: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(label, attempt, "Retry succeeded");
                }
                return Ok(value);
            }
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                let delay = config.delay_for(attempt);
                warn!(
                    label,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Attempt failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                if e.is_retryable() {
                    warn!(label, attempts = attempt, error = %e, "Retries exhausted");
                }
                return Err(e);
            }
        }
    }
}

/// `DataError::Fetch`를 만드는 헬퍼.
pub(crate) fn fetch_error(context: &str, ticker: &str, err: impl std::fmt::Display) -> DataError {
    DataError::Fetch(format!("Failed to fetch {} for {}: {}", context, ticker, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_delay_schedule() {
        let config = RetryConfig::default();
        let secs: Vec<u64> = (1..=5).map(|n| config.delay_for(n).as_secs()).collect();
        assert_eq!(secs, vec![2, 2, 4, 8, 10]);
    }

    #[test]
    fn test_from_fetch_config() {
        let config = RetryConfig::from(&FetchConfig::default());
        assert_eq!(config, RetryConfig::default());

        let zero = RetryConfig::from(&FetchConfig {
            max_attempts: 0,
            ..Default::default()
        });
        assert_eq!(zero.max_attempts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_success() {
        let calls = AtomicU32::new(0);
        let calls = &calls;
        let result = with_retry(&RetryConfig::default(), "test", move || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n < 3 {
                Err(DataError::Fetch("flaky".into()))
            } else {
                Ok(n)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_returns_last_error() {
        let calls = AtomicU32::new(0);
        let calls = &calls;
        let result: Result<()> = with_retry(&RetryConfig::default(), "test", move || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            Err(DataError::Fetch(format!("attempt {}", n)))
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match result {
            Err(DataError::Fetch(msg)) => assert_eq!(msg, "attempt 3"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_retryable_fails_fast() {
        let calls = AtomicU32::new(0);
        let calls = &calls;
        let result: Result<()> = with_retry(&RetryConfig::default(), "test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(DataError::NoData("none".into()))
        })
        .await;

        assert!(matches!(result, Err(DataError::NoData(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
