//! 2단계: 행 단위 검증.
//!
//! 검증은 행을 제거하지 않고 위반 사항만 보고합니다. 모든 검사는
//! 중단 없이 모든 행에 대해 실행됩니다.

use serde_json::Value;

use crate::domain::Row;

/// 한 행의 검증 위반.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Close,
    Volume,
    Date,
    Ticker,
}

impl Violation {
    pub fn message(self) -> &'static str {
        match self {
            Violation::Close => "Close price must be numeric and not null",
            Violation::Volume => "Volume must be >= 0 and not null",
            Violation::Date => "Date must be present and a string",
            Violation::Ticker => "Ticker must be present and a string",
        }
    }
}

fn is_non_empty_string(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::String(s)) if !s.is_empty())
}

/// 한 행을 검증합니다.
///
/// 검사 순서는 Close, Volume, Date, Ticker입니다. 키가 없으면 null과 같습니다.
pub fn validate_row(row: &Row) -> Vec<Violation> {
    let mut violations = Vec::new();

    if !matches!(row.get("Close"), Some(Value::Number(_))) {
        violations.push(Violation::Close);
    }

    let volume_ok = row
        .get("Volume")
        .and_then(Value::as_f64)
        .is_some_and(|v| v >= 0.0);
    if !volume_ok {
        violations.push(Violation::Volume);
    }

    if !is_non_empty_string(row.get("Date")) {
        violations.push(Violation::Date);
    }

    if !is_non_empty_string(row.get("Ticker")) {
        violations.push(Violation::Ticker);
    }

    violations
}

/// 모든 행을 검증해 `"Row {i}: {message}"` 형식의 메시지 목록을 반환합니다.
pub fn validate_rows(rows: &[Row]) -> Vec<String> {
    rows.iter()
        .enumerate()
        .flat_map(|(i, row)| {
            validate_row(row)
                .into_iter()
                .map(move |v| format!("Row {}: {}", i, v.message()))
        })
        .collect()
}
