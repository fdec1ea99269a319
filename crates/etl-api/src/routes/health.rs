//! `/health` 라우트.
//!
//! `/health`는 프로세스 생존 여부만, `/health/ready`는 배치 저장소 접근 여부까지 확인합니다.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// 서비스 전체 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Unhealthy,
}

impl ServiceStatus {
    fn status_code(self) -> StatusCode {
        match self {
            Self::Healthy => StatusCode::OK,
            Self::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentState {
    Up,
    Down,
}

/// 컴포넌트 하나의 상태와 부가 설명.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentStatus {
    pub status: ComponentState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentStatus {
    /// 점검 결과를 상태로 변환합니다. 실패 시 에러 메시지를 남깁니다.
    fn probe<E: std::fmt::Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self {
                status: ComponentState::Up,
                message: None,
            },
            Err(e) => Self {
                status: ComponentState::Down,
                message: Some(e.to_string()),
            },
        }
    }

    fn describe(name: &str) -> Self {
        Self {
            status: ComponentState::Up,
            message: Some(name.to_string()),
        }
    }

    pub fn is_up(&self) -> bool {
        self.status == ComponentState::Up
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// 배치 저장소 디렉토리
    pub store: ComponentStatus,
    /// 시세 소스 이름. 원격 호출 없이 보고만 합니다.
    pub provider: ComponentStatus,
}

impl ComponentHealth {
    fn overall(&self) -> ServiceStatus {
        if self.store.is_up() && self.provider.is_up() {
            ServiceStatus::Healthy
        } else {
            ServiceStatus::Unhealthy
        }
    }
}

/// `/health/ready` 응답.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ServiceStatus,
    pub version: String,
    pub uptime_secs: i64,
    /// RFC 3339
    pub timestamp: String,
    pub components: ComponentHealth,
}

/// GET /health
async fn liveness() -> &'static str {
    "OK"
}

/// GET /health/ready
async fn readiness(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let components = ComponentHealth {
        store: ComponentStatus::probe(state.store.health_check().await),
        provider: ComponentStatus::describe(state.extractor.source_name()),
    };
    let status = components.overall();

    if status == ServiceStatus::Unhealthy {
        tracing::warn!(components = ?components, "Readiness check failed");
    }

    let body = HealthResponse {
        status,
        version: state.version.clone(),
        uptime_secs: state.uptime_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        components,
    };
    (status.status_code(), Json(body))
}

pub fn health_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(liveness))
        .route("/ready", get(readiness))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    use crate::state::create_test_state;

    async fn ready(state: AppState) -> (StatusCode, HealthResponse) {
        let app = Router::new()
            .nest("/health", health_router())
            .with_state(Arc::new(state));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/ready")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_liveness_is_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let app = Router::new()
            .nest("/health", health_router())
            .with_state(Arc::new(create_test_state(dir.path())));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn test_ready_reports_source_name() {
        let dir = tempfile::tempdir().unwrap();
        let (status, health) = ready(create_test_state(dir.path())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(health.status, ServiceStatus::Healthy);
        assert!(health.components.store.message.is_none());
        assert_eq!(health.components.provider.message.as_deref(), Some("static"));
    }

    #[tokio::test]
    async fn test_ready_when_data_dir_removed() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("batches");
        let state = create_test_state(&data_dir);
        std::fs::remove_dir_all(&data_dir).unwrap();

        let (status, health) = ready(state).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(health.status, ServiceStatus::Unhealthy);
        assert_eq!(health.components.store.status, ComponentState::Down);
        assert!(health.components.store.message.is_some());
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_value(ComponentStatus::probe::<String>(Ok(()))).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "up" }));
        assert_eq!(
            serde_json::to_value(ServiceStatus::Unhealthy).unwrap(),
            serde_json::json!("unhealthy")
        );
    }
}
