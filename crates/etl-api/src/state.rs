//! 애플리케이션 공유 상태.
//!
//! 모든 핸들러가 `Arc<AppState>`로 접근합니다.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use etl_data::{BatchStore, Extractor};

/// 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 추출 서비스
    pub extractor: Extractor,
    /// 배치 저장소
    pub store: Arc<dyn BatchStore>,
    /// 서버 시작 시각
    pub started_at: DateTime<Utc>,
    /// API 버전
    pub version: String,
}

impl AppState {
    pub fn new(extractor: Extractor, store: Arc<dyn BatchStore>) -> Self {
        Self {
            extractor,
            store,
            started_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }

    /// 저장소 접근 가능 여부.
    pub async fn is_store_healthy(&self) -> bool {
        self.store.health_check().await.is_ok()
    }
}

#[cfg(test)]
pub(crate) fn create_test_state(dir: &std::path::Path) -> AppState {
    use etl_data::{FileBatchStore, StaticSource};

    let source = StaticSource::sample(&["AAPL", "MSFT"]);
    let store = FileBatchStore::new(dir).expect("test store");
    AppState::new(Extractor::new(Arc::new(source)), Arc::new(store))
}
