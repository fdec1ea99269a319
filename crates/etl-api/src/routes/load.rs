//! 적재 및 배치 조회 endpoint.
//!
//! # 엔드포인트
//!
//! - `POST /load?batch_id=` - multipart `file` 필드의 JSON 배열을 배치로 저장
//! - `GET /batches` - 저장된 배치 ID 목록
//! - `GET /batch/{batch_id}` - 저장된 배치 조회

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::{sync::Arc, time::Instant};
use tracing::info;

use etl_core::{resolve_batch_id, Row, StoreReceipt};
use etl_data::parse_payload;

use crate::error::{bad_request, data_error, ApiErrorResponse, ApiResult};
use crate::metrics::record_batch_stored;
use crate::state::AppState;

/// 업로드 본문 최대 크기.
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// 업로드 파일 필드 이름.
const FILE_FIELD: &str = "file";

/// 적재 쿼리.
#[derive(Debug, Default, Deserialize)]
pub struct LoadQuery {
    /// 배치 ID. 없으면 새 UUID
    pub batch_id: Option<String>,
}

/// POST /load
pub async fn load_batch(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LoadQuery>,
    mut multipart: Multipart,
) -> ApiResult<Json<StoreReceipt>> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request("INVALID_UPLOAD", e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        if !file_name.ends_with(".json") {
            let body = ApiErrorResponse::new("UNSUPPORTED_FILE", "Only .json files are supported.")
                .details(json!({ "file_name": file_name }));
            return Err((StatusCode::BAD_REQUEST, Json(body)));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| bad_request("INVALID_UPLOAD", e.body_text()))?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) = upload.ok_or_else(|| {
        bad_request("MISSING_FILE", format!("multipart field '{}' is required", FILE_FIELD))
    })?;

    let rows = parse_payload(&bytes).map_err(data_error)?;
    let batch_id = resolve_batch_id(query.batch_id);
    let started = Instant::now();
    let receipt = state
        .store
        .store(&batch_id, &rows)
        .await
        .map_err(data_error)?;

    record_batch_stored(&receipt, started.elapsed().as_secs_f64());
    info!(
        batch_id = %receipt.batch_id,
        file_name = %file_name,
        rows = receipt.rows_loaded,
        "Batch loaded"
    );
    Ok(Json(receipt))
}

/// GET /batches
pub async fn list_batches(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<String>>> {
    let batches = state.store.list().await.map_err(data_error)?;
    Ok(Json(batches))
}

/// GET /batch/{batch_id}
pub async fn get_batch(
    State(state): State<Arc<AppState>>,
    Path(batch_id): Path<String>,
) -> ApiResult<Json<Vec<Row>>> {
    let rows = state.store.retrieve(&batch_id).await.map_err(data_error)?;
    Ok(Json(rows))
}

/// 적재 라우터 생성.
pub fn load_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/load",
            post(load_batch).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/batches", get(list_batches))
        .route("/batch/{batch_id}", get(get_batch))
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

    const BOUNDARY: &str = "etl-test-boundary";

    fn multipart_request(uri: &str, file_name: &str, contents: &str) -> Request<Body> {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\n\
             Content-Type: application/json\r\n\r\n{c}\r\n--{b}--\r\n",
            b = BOUNDARY,
            f = file_name,
            c = contents
        );
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_load_then_retrieve() {
        let dir = tempfile::tempdir().unwrap();
        let app = load_router().with_state(Arc::new(create_test_state(dir.path())));

        let response = app
            .clone()
            .oneshot(multipart_request(
                "/load?batch_id=up-1",
                "rows.json",
                r#"[{"Ticker":"AAPL","Close":1.5},{"Ticker":"MSFT","Close":2.5}]"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let receipt = body_json(response).await;
        assert_eq!(receipt["batch_id"], "up-1");
        assert_eq!(receipt["rows_loaded"], 2);

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/batch/up-1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let rows = body_json(response).await;
        assert_eq!(rows[1]["Ticker"], "MSFT");

        let response = app
            .oneshot(Request::builder().uri("/batches").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(response).await, json!(["up-1"]));
    }

    #[tokio::test]
    async fn test_load_rejects_non_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let app = load_router().with_state(Arc::new(create_test_state(dir.path())));

        let response = app
            .oneshot(multipart_request("/load", "rows.csv", "a,b\n1,2"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["message"],
            "Only .json files are supported."
        );
    }

    #[tokio::test]
    async fn test_load_rejects_invalid_payload() {
        let dir = tempfile::tempdir().unwrap();
        let app = load_router().with_state(Arc::new(create_test_state(dir.path())));

        let response = app
            .oneshot(multipart_request("/load", "rows.json", r#"{"not":"array"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "INVALID_PAYLOAD");
    }

    #[tokio::test]
    async fn test_get_batch_errors() {
        let dir = tempfile::tempdir().unwrap();
        let app = load_router().with_state(Arc::new(create_test_state(dir.path())));

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/batch/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(Request::builder().uri("/batch/bad%20id").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
