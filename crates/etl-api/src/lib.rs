//! 추출/변환/적재 서비스 REST API.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API (extract, transform, load)
//! - 헬스 체크 엔드포인트
//! - Prometheus 메트릭
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`error`]: 에러 응답 형식과 상태 코드 매핑
//! - [`metrics`]: Prometheus 메트릭 수집
//! - [`middleware`]: HTTP 미들웨어

pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiErrorResponse, ApiResult};
pub use metrics::setup_metrics_recorder;
pub use middleware::metrics_layer;
pub use routes::create_api_router;
pub use state::AppState;
