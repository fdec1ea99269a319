//! 배치 ID 규칙 및 배치 결과 타입.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::record::Row;
use crate::error::{PipelineError, PipelineResult};

/// 배치 ID 최대 길이.
pub const MAX_BATCH_ID_LEN: usize = 128;

/// 배치 ID를 결정합니다.
///
/// 주어진 ID는 손대지 않고 그대로 사용합니다. 없거나 빈 문자열
/// (`?batch_id=` 처럼 값 없이 온 쿼리)이면 새 UUID v4를 생성합니다.
pub fn resolve_batch_id(batch_id: Option<String>) -> String {
    match batch_id {
        Some(id) if !id.is_empty() => id,
        _ => Uuid::new_v4().to_string(),
    }
}

/// 파일 이름 구성 요소로 쓰일 배치 ID를 검증합니다.
pub fn validate_batch_id(batch_id: &str) -> PipelineResult<()> {
    if batch_id.is_empty() {
        return Err(PipelineError::InvalidInput(
            "batch_id must not be empty".to_string(),
        ));
    }
    if batch_id.len() > MAX_BATCH_ID_LEN {
        return Err(PipelineError::InvalidInput(format!(
            "batch_id must be at most {} characters",
            MAX_BATCH_ID_LEN
        )));
    }
    if batch_id == "." || batch_id == ".." {
        return Err(PipelineError::InvalidInput(format!(
            "batch_id '{}' is reserved",
            batch_id
        )));
    }
    if let Some(c) = batch_id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(PipelineError::InvalidInput(format!(
            "batch_id contains invalid character '{}'",
            c
        )));
    }
    Ok(())
}

/// 변환 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformResult {
    /// 입력 배치 ID (없었다면 생성된 ID)
    pub batch_id: String,
    /// 정제된 행
    pub data: Vec<Row>,
    /// 행 단위 검증 메시지
    pub errors: Vec<String>,
}

/// 배치 저장 확인.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreReceipt {
    pub batch_id: String,
    pub rows_loaded: usize,
    /// 저장된 위치
    pub file_path: String,
}
