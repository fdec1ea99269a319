//! 변환 endpoint.
//!
//! `POST /transform` - 레코드 배치를 정규화하고 검증합니다.

use axum::{routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use etl_core::{transform_with_stats, Record, TransformResult};

use crate::metrics::record_transform;
use crate::state::AppState;

/// 변환 요청.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransformRequest {
    #[serde(default)]
    pub batch_id: Option<String>,
    pub data: Vec<Record>,
}

/// POST /transform
///
/// 데이터 품질 문제로 실패하지 않습니다. 잘못된 행은 `errors`에 보고됩니다.
pub async fn transform_batch(Json(request): Json<TransformRequest>) -> Json<TransformResult> {
    let rows = request.data.into_iter().map(Record::into_row).collect();
    let (result, stats) = transform_with_stats(request.batch_id, rows);
    record_transform(&stats);
    Json(result)
}

/// 변환 라우터 생성.
pub fn transform_router() -> Router<Arc<AppState>> {
    Router::new().route("/transform", post(transform_batch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::json;
    use tower::ServiceExt;

    use crate::state::create_test_state;

    async fn post_transform(body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let dir = tempfile::tempdir().unwrap();
        let app = transform_router().with_state(Arc::new(create_test_state(dir.path())));
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/transform")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_transform_normalizes_and_validates() {
        let (status, body) = post_transform(json!({
            "batch_id": "t-1",
            "data": [
                {"Date": "2024-01-02", "Close": 10.0, "Volume": 100, "Ticker": "aapl", "currency": "$USD"},
                {"Date": "2024-01-02", "Close": 10.0, "Volume": 100, "Ticker": "aapl", "currency": "$USD"},
                {"Date": "yesterday", "Close": 11.0, "Volume": 100, "Ticker": "msft"}
            ]
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["batch_id"], "t-1");
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["Date"], "2024-01-02T00:00:00Z");
        assert_eq!(data[0]["Ticker"], "AAPL");
        assert_eq!(data[0]["currency"], "USD");
        assert_eq!(data[1]["Date"], serde_json::Value::Null);
        assert_eq!(data[1]["Ticker"], "MSFT");
        assert_eq!(body["errors"], json!(["Row 1: Date must be present and a string"]));
    }

    #[tokio::test]
    async fn test_transform_generates_batch_id() {
        let (status, body) = post_transform(json!({"data": []})).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body["batch_id"].as_str().unwrap().is_empty());
        assert_eq!(body["data"], json!([]));
        assert_eq!(body["errors"], json!([]));
    }

    #[tokio::test]
    async fn test_transform_rejects_malformed_body() {
        let (status, _) = post_transform(json!({"data": [{"Close": "abc"}]})).await;
        assert!(status.is_client_error());
    }
}
