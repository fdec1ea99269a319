//! 배치 저장소.
//!
//! 배치 ID마다 하나의 객체로 행 목록을 저장하고 조회합니다.
//! 한 배치의 내용은 완전히 저장되었거나 아예 없는 상태만 관찰됩니다.

mod file;

use async_trait::async_trait;
use etl_core::{Row, StoreReceipt};
use serde_json::Value;

use crate::error::{DataError, Result};

pub use file::FileBatchStore;

/// 배치 저장소.
#[async_trait]
pub trait BatchStore: Send + Sync {
    /// 배치를 저장합니다. 같은 ID로 다시 저장하면 내용을 교체합니다.
    async fn store(&self, batch_id: &str, rows: &[Row]) -> Result<StoreReceipt>;

    /// 저장된 배치 ID 목록 (정렬됨).
    async fn list(&self) -> Result<Vec<String>>;

    /// 배치 내용을 조회합니다. 없으면 `DataError::NotFound`.
    async fn retrieve(&self, batch_id: &str) -> Result<Vec<Row>>;

    /// 저장소 사용 가능 여부.
    async fn health_check(&self) -> Result<()>;
}

/// 업로드 본문을 행 목록으로 파싱합니다.
///
/// 본문은 객체의 JSON 배열이어야 합니다.
pub fn parse_payload(bytes: &[u8]) -> Result<Vec<Row>> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| DataError::InvalidPayload(format!("Invalid JSON: {}", e)))?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(DataError::InvalidPayload(format!(
                "expected a JSON array of objects, got {}",
                json_kind(&other)
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(row) => Ok(row),
            other => Err(DataError::InvalidPayload(format!(
                "element {} is {}, expected an object",
                i,
                json_kind(&other)
            ))),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
