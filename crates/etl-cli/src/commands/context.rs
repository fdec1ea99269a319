//! 명령 실행에 필요한 서비스 묶음.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use etl_core::AppConfig;
use etl_data::{
    BatchStore, Extractor, FileBatchStore, MarketDataSource, RetryConfig, RetryingSource,
    StaticSource, YahooSource,
};
use tracing::info;

/// `--offline` 실행 시 샘플 데이터가 준비되는 종목.
pub const OFFLINE_TICKERS: [&str; 5] = ["AAPL", "MSFT", "GOOGL", "AMZN", "NVDA"];

/// 추출 서비스와 배치 저장소.
#[derive(Clone)]
pub struct Context {
    pub extractor: Extractor,
    pub store: Arc<dyn BatchStore>,
}

impl Context {
    pub fn new(extractor: Extractor, store: Arc<dyn BatchStore>) -> Self {
        Self { extractor, store }
    }

    /// 설정에서 서비스를 구성합니다.
    ///
    /// `offline`이면 Yahoo Finance 대신 메모리 샘플 데이터를 사용합니다.
    pub fn from_config(config: &AppConfig, offline: bool) -> Result<Self> {
        let retry = RetryConfig::from(&config.fetch);
        let source: Arc<dyn MarketDataSource> = if offline {
            info!(tickers = ?OFFLINE_TICKERS, "Using offline sample data");
            Arc::new(RetryingSource::new(StaticSource::sample(&OFFLINE_TICKERS), retry))
        } else {
            let yahoo = YahooSource::new().context("failed to create Yahoo Finance source")?;
            Arc::new(RetryingSource::new(yahoo, retry))
        };

        let extractor =
            Extractor::new(source).with_default_period(config.fetch.default_period.clone());
        let store = FileBatchStore::new(&config.storage.data_dir).with_context(|| {
            format!(
                "failed to open batch store at {}",
                config.storage.data_dir.display()
            )
        })?;

        Ok(Self::new(extractor, Arc::new(store)))
    }
}
