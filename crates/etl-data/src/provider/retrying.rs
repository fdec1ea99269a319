//! 재시도 데코레이터.

use async_trait::async_trait;
use etl_core::{HistoryBar, TickerInfo};

use super::MarketDataSource;
use crate::error::Result;
use crate::retry::{with_retry, RetryConfig};

/// 내부 소스의 모든 호출에 지수 백오프 재시도를 적용합니다.
pub struct RetryingSource<S> {
    inner: S,
    config: RetryConfig,
}

impl<S: MarketDataSource> RetryingSource<S> {
    pub fn new(inner: S, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: MarketDataSource> MarketDataSource for RetryingSource<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn fetch_info(&self, ticker: &str) -> Result<TickerInfo> {
        let label = format!("info:{}", ticker);
        with_retry(&self.config, &label, || self.inner.fetch_info(ticker)).await
    }

    async fn fetch_history(&self, ticker: &str, period: &str) -> Result<Vec<HistoryBar>> {
        let label = format!("history:{}", ticker);
        with_retry(&self.config, &label, || self.inner.fetch_history(ticker, period)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;
    use crate::provider::StaticSource;

    #[tokio::test(start_paused = true)]
    async fn test_recovers_from_transient_failures() {
        let source = StaticSource::sample(&["AAPL"]).failing_times("AAPL", 2);
        let retrying = RetryingSource::new(source, RetryConfig::default());

        let info = retrying.fetch_info("AAPL").await.unwrap();
        assert_eq!(info.ticker, "AAPL");
        assert_eq!(retrying.inner().calls("AAPL"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let source = StaticSource::sample(&["AAPL"]).failing_times("AAPL", 10);
        let retrying = RetryingSource::new(source, RetryConfig::default());

        let err = retrying.fetch_history("AAPL", "1mo").await.unwrap_err();
        assert!(matches!(err, DataError::Fetch(_)));
        assert_eq!(retrying.inner().calls("AAPL"), 3);
    }
}
