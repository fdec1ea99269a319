//! 시세 데이터 Provider 모듈.
//!
//! - `YahooSource`: Yahoo Finance 일봉 + 종목 요약 정보
//! - `RetryingSource`: 임의의 소스에 지수 백오프 재시도를 적용하는 데코레이터
//! - `StaticSource`: 테스트 및 오프라인 실행용 메모리 소스

mod fixture;
mod retrying;
mod yahoo;

use async_trait::async_trait;
use etl_core::{HistoryBar, TickerInfo};

use crate::error::Result;

pub use fixture::StaticSource;
pub use retrying::RetryingSource;
pub use yahoo::YahooSource;

/// 종목 단위 시세 소스.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Provider 이름.
    fn name(&self) -> &str;

    /// 종목 정적 정보 조회. `ticker` 필드는 요청 심볼 그대로입니다.
    async fn fetch_info(&self, ticker: &str) -> Result<TickerInfo>;

    /// 일별 시세 조회 (`period` 예: "1mo", "1y").
    async fn fetch_history(&self, ticker: &str, period: &str) -> Result<Vec<HistoryBar>>;
}
