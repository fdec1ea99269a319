//! 데이터 수집 및 저장.
//!
//! 이 crate는 다음을 제공합니다:
//! - 외부 시세 소스 (`MarketDataSource`, Yahoo Finance, 재시도 데코레이터)
//! - 레코드 조립 및 추출 서비스 (`Extractor`)
//! - 배치 저장소 (`BatchStore`, 파일 기반 구현)

pub mod error;
pub mod extract;
pub mod provider;
pub mod retry;
pub mod storage;

pub use error::{DataError, Result};
pub use extract::{assemble_records, Extractor, ManyExtraction, TickerOutcome};
pub use provider::{MarketDataSource, RetryingSource, StaticSource, YahooSource};
pub use retry::{with_retry, RetryConfig};
pub use storage::{parse_payload, BatchStore, FileBatchStore};
