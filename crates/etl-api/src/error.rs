//! API 에러 응답.
//!
//! 모든 엔드포인트가 같은 에러 형식을 사용하며, 데이터 계층 오류를
//! HTTP 상태 코드로 바꾸는 곳은 이 모듈 하나뿐입니다.

use axum::{http::StatusCode, Json};
use etl_data::DataError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 에러 응답 본문.
///
/// ```json
/// { "code": "NOT_FOUND", "message": "Not found: Batch 'abc' not found", "timestamp": 1738300800 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 기계가 읽는 코드 (`FETCH_FAILED`, `INVALID_INPUT`, `NOT_FOUND` 등)
    pub code: String,
    pub message: String,
    /// 요청별 부가 정보 (예: 거부된 파일 이름)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Unix 초
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    pub fn details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiErrorResponse>)>;

/// 데이터 계층 오류의 상태 코드와 에러 코드.
pub fn status_for(err: &DataError) -> (StatusCode, &'static str) {
    match err {
        DataError::Fetch(_) | DataError::Parse(_) | DataError::Timeout(_) => {
            (StatusCode::BAD_GATEWAY, "FETCH_FAILED")
        }
        DataError::NoData(_) => (StatusCode::NOT_FOUND, "NO_DATA"),
        DataError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        DataError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
        DataError::InvalidPayload(_) => (StatusCode::BAD_REQUEST, "INVALID_PAYLOAD"),
        DataError::Io(_)
        | DataError::Serialization(_)
        | DataError::Config(_)
        | DataError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

/// 데이터 계층 오류를 API 에러로 변환합니다.
pub fn data_error(err: DataError) -> (StatusCode, Json<ApiErrorResponse>) {
    let (status, code) = status_for(&err);
    if status.is_server_error() {
        tracing::error!(code, error = %err, "Request failed");
    }
    (status, Json(ApiErrorResponse::new(code, err.to_string())))
}

/// 잘못된 요청 에러.
pub fn bad_request(code: &str, message: impl Into<String>) -> (StatusCode, Json<ApiErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiErrorResponse::new(code, message)),
    )
}
