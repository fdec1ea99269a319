//! 추출 endpoint.
//!
//! # 엔드포인트
//!
//! - `GET /extract/{ticker}` - 일봉과 정적 정보를 합친 레코드
//! - `GET /info/{ticker}` - 정적 정보
//! - `GET /history/{ticker}` - 일봉
//! - `GET /extract_many?ticker=A,B` - 다중 종목 추출

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use etl_core::{HistoryRecord, Record, TickerInfo};
use etl_data::ManyExtraction;

use crate::error::{data_error, ApiResult};
use crate::state::AppState;

/// 조회 기간 쿼리.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    /// 조회 기간 (예: 1mo, 1y). 없으면 설정된 기본값
    pub period: Option<String>,
}

/// 다중 종목 추출 쿼리.
#[derive(Debug, Deserialize)]
pub struct ExtractManyQuery {
    /// 쉼표로 구분된 종목 목록
    pub ticker: String,
    pub period: Option<String>,
    pub batch_id: Option<String>,
}

/// 추출 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub data: Vec<Record>,
}

/// 일봉 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub data: Vec<HistoryRecord>,
}

/// GET /extract/{ticker}
pub async fn extract_ticker(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<Json<ExtractResponse>> {
    let data = state
        .extractor
        .extract(&ticker, query.period.as_deref())
        .await
        .map_err(data_error)?;
    Ok(Json(ExtractResponse { data }))
}

/// GET /info/{ticker}
pub async fn ticker_info(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> ApiResult<Json<TickerInfo>> {
    let info = state.extractor.info(&ticker).await.map_err(data_error)?;
    Ok(Json(info))
}

/// GET /history/{ticker}
pub async fn ticker_history(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<Json<HistoryResponse>> {
    let data = state
        .extractor
        .history(&ticker, query.period.as_deref())
        .await
        .map_err(data_error)?;
    Ok(Json(HistoryResponse { data }))
}

/// GET /extract_many
///
/// 종목별 실패는 결과 안에 `{"error": ...}`로 포함되며 상태 코드는 항상 200.
pub async fn extract_many(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExtractManyQuery>,
) -> Json<ManyExtraction> {
    let result = state
        .extractor
        .extract_many(&query.ticker, query.period.as_deref(), query.batch_id)
        .await;
    Json(result)
}

/// 추출 라우터 생성.
pub fn extract_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/extract/{ticker}", get(extract_ticker))
        .route("/info/{ticker}", get(ticker_info))
        .route("/history/{ticker}", get(ticker_history))
        .route("/extract_many", get(extract_many))
}
