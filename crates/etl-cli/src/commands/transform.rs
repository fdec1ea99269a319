//! 파일 단위 변환 명령.

use std::path::Path;

use anyhow::{Context as _, Result};
use etl_core::{transform_with_stats, Row, TransformResult, TransformStats};
use etl_data::parse_payload;
use serde::Serialize;

/// JSON 배열 파일을 행 목록으로 읽습니다.
pub fn read_rows(path: &Path) -> Result<Vec<Row>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let rows = parse_payload(&bytes).with_context(|| format!("invalid input {}", path.display()))?;
    Ok(rows)
}

/// 입력 파일을 변환합니다.
pub fn transform_file(
    input: &Path,
    batch_id: Option<String>,
) -> Result<(TransformResult, TransformStats)> {
    let rows = read_rows(input)?;
    Ok(transform_with_stats(batch_id, rows))
}

/// 값을 들여쓰기된 JSON으로 쓰거나 출력합니다.
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}
