//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/extract/{ticker}`, `/info/{ticker}`, `/history/{ticker}`, `/extract_many` - 추출
//! - `/transform` - 변환
//! - `/load`, `/batches`, `/batch/{batch_id}` - 적재 및 조회

pub mod extract;
pub mod health;
pub mod load;
pub mod transform;

pub use extract::{extract_router, ExtractResponse, HistoryResponse, PeriodQuery};
pub use health::{
    health_router, ComponentHealth, ComponentState, ComponentStatus, HealthResponse, ServiceStatus,
};
pub use load::{load_router, LoadQuery};
pub use transform::{transform_router, TransformRequest};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/health", health_router())
        .merge(extract_router())
        .merge(transform_router())
        .merge(load_router())
}
