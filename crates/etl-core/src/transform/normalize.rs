//! 1단계: 정규화 (중복 제거, 결측값 채우기, 필수 컬럼 행 제거, 값 표준화).

use std::collections::HashSet;

use serde_json::Value;

use super::dates::normalize_date;
use crate::domain::{field_kind, FieldKind, Row, RECORD_SCHEMA};

/// 비어 있으면 행을 제거하는 컬럼.
pub const CRITICAL_COLUMNS: [&str; 3] = ["Date", "Close", "Ticker"];

/// 배치의 컬럼 집합.
///
/// 고정 레코드 스키마가 항상 앞에 오고, 그 밖의 키는 처음 나타난 순서로 뒤에 붙습니다.
/// 키가 빠진 행도 `Date`, `Close`, `Ticker`를 가진 것으로 취급됩니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSchema {
    columns: Vec<String>,
}

impl BatchSchema {
    pub fn from_rows(rows: &[Row]) -> Self {
        let mut columns: Vec<String> = RECORD_SCHEMA
            .iter()
            .map(|(name, _)| name.to_string())
            .collect();
        let mut seen: HashSet<String> = columns.iter().cloned().collect();
        for key in rows.iter().flat_map(|row| row.keys()) {
            if seen.insert(key.clone()) {
                columns.push(key.clone());
            }
        }
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

/// 정규화 결과.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub schema: BatchSchema,
    pub rows: Vec<Row>,
    pub duplicates_removed: usize,
    pub critical_dropped: usize,
    pub unparsed_dates: usize,
}

/// 중복 비교용 셀 키. 숫자는 값으로 비교합니다 (`1 == 1.0`).
#[derive(Debug, PartialEq, Eq, Hash)]
enum CellKey {
    Null,
    Bool(bool),
    Number(u64),
    Other(String),
}

impl CellKey {
    fn of(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => CellKey::Null,
            Some(Value::Bool(b)) => CellKey::Bool(*b),
            Some(Value::Number(n)) => {
                let f = n.as_f64().unwrap_or(0.0);
                // -0.0과 0.0은 같은 값
                let f = if f == 0.0 { 0.0 } else { f };
                CellKey::Number(f.to_bits())
            }
            Some(Value::String(s)) => CellKey::Other(format!("s:{}", s)),
            Some(other) => CellKey::Other(other.to_string()),
        }
    }
}

/// 모든 컬럼이 같은 행을 제거합니다. 첫 등장 행이 남고 순서는 유지됩니다.
pub fn drop_duplicates(rows: Vec<Row>, schema: &BatchSchema) -> (Vec<Row>, usize) {
    let mut seen = HashSet::new();
    let before = rows.len();
    let unique: Vec<Row> = rows
        .into_iter()
        .filter(|row| {
            let key: Vec<CellKey> = schema
                .columns()
                .iter()
                .map(|c| CellKey::of(row.get(c)))
                .collect();
            seen.insert(key)
        })
        .collect();
    let removed = before - unique.len();
    (unique, removed)
}

/// 스키마 순서로 행을 재구성하며 결측값을 채웁니다.
///
/// 숫자 필드는 0, 문자열 필드는 빈 문자열. 고정 스키마 밖의 키는
/// 값이 있으면 그대로 옮기고 채우지 않습니다.
pub fn fill_missing(mut row: Row, schema: &BatchSchema) -> Row {
    let mut out = Row::new();
    for column in schema.columns() {
        let value = row.get_mut(column).map(Value::take);
        match (field_kind(column), value) {
            (Some(kind), None | Some(Value::Null)) => {
                out.insert(column.clone(), kind.fill_value());
            }
            (_, Some(value)) => {
                out.insert(column.clone(), value);
            }
            (None, None) => {}
        }
    }
    out
}

/// 채우기 이후 필수 문자열 컬럼이 비어 있으면 행을 제거해야 합니다.
///
/// `Close`는 이미 0으로 채워졌으므로 이 경로로는 제거되지 않습니다.
pub fn is_critically_empty(row: &Row, critical: &[&str]) -> bool {
    critical.iter().any(|column| {
        field_kind(column) == Some(FieldKind::Text)
            && matches!(row.get(*column), Some(Value::String(s)) if s.is_empty())
    })
}

/// `Date`, `currency`, `Ticker` 값을 표준화합니다.
///
/// 날짜 파싱에 실패하면 `true`를 반환합니다.
pub fn standardize(row: &mut Row) -> bool {
    let mut unparsed = false;
    if let Some(date) = row.get_mut("Date") {
        let normalized = normalize_date(date);
        unparsed = normalized.is_null();
        *date = normalized;
    }
    if let Some(Value::String(currency)) = row.get_mut("currency") {
        if currency.contains('$') {
            *currency = currency.replace('$', "");
        }
    }
    if let Some(Value::String(ticker)) = row.get_mut("Ticker") {
        *ticker = ticker.to_uppercase();
    }
    unparsed
}

/// 배치 전체에 1단계를 적용합니다.
pub fn normalize(rows: Vec<Row>) -> Normalized {
    let schema = BatchSchema::from_rows(&rows);
    let (rows, duplicates_removed) = drop_duplicates(rows, &schema);

    let filled: Vec<Row> = rows
        .into_iter()
        .map(|row| fill_missing(row, &schema))
        .collect();
    let before_drop = filled.len();
    let mut kept: Vec<Row> = filled
        .into_iter()
        .filter(|row| !is_critically_empty(row, &CRITICAL_COLUMNS))
        .collect();
    let critical_dropped = before_drop - kept.len();

    let unparsed_dates = kept.iter_mut().map(standardize).filter(|unparsed| *unparsed).count();

    Normalized {
        schema,
        rows: kept,
        duplicates_removed,
        critical_dropped,
        unparsed_dates,
    }
}
