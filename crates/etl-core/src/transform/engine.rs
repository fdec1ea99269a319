//! 변환 엔진: 정규화와 검증을 묶어 배치 결과를 만듭니다.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::normalize::normalize;
use super::validate::validate_rows;
use crate::domain::{resolve_batch_id, Record, Row, TransformResult};

/// 한 배치 변환의 집계.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformStats {
    pub input_rows: usize,
    pub duplicates_removed: usize,
    pub critical_dropped: usize,
    pub unparsed_dates: usize,
    pub output_rows: usize,
    pub error_count: usize,
}

/// 배치를 변환하고 집계를 함께 반환합니다.
///
/// 데이터 품질 문제로 실패하지 않습니다. 잘못된 행은 `errors`에
/// 보고되거나 필수 컬럼 규칙에 따라 제거됩니다.
pub fn transform_with_stats(
    batch_id: Option<String>,
    rows: Vec<Row>,
) -> (TransformResult, TransformStats) {
    let batch_id = resolve_batch_id(batch_id);
    let input_rows = rows.len();

    let normalized = normalize(rows);
    let errors = validate_rows(&normalized.rows);
    debug!(
        batch_id = %batch_id,
        columns = normalized.schema.columns().len(),
        "Batch normalized"
    );

    let stats = TransformStats {
        input_rows,
        duplicates_removed: normalized.duplicates_removed,
        critical_dropped: normalized.critical_dropped,
        unparsed_dates: normalized.unparsed_dates,
        output_rows: normalized.rows.len(),
        error_count: errors.len(),
    };

    info!(
        batch_id = %batch_id,
        input_rows = stats.input_rows,
        duplicates_removed = stats.duplicates_removed,
        critical_dropped = stats.critical_dropped,
        unparsed_dates = stats.unparsed_dates,
        output_rows = stats.output_rows,
        error_count = stats.error_count,
        "Batch transformed"
    );

    let result = TransformResult {
        batch_id,
        data: normalized.rows,
        errors,
    };
    (result, stats)
}

/// 범용 행 배치를 변환합니다.
pub fn transform(batch_id: Option<String>, rows: Vec<Row>) -> TransformResult {
    transform_with_stats(batch_id, rows).0
}

/// 타입 있는 레코드 배치를 변환합니다. 각 레코드는 전체 스키마를 가집니다.
pub fn transform_records(batch_id: Option<String>, records: Vec<Record>) -> TransformResult {
    let rows = records.into_iter().map(Record::into_row).collect();
    transform(batch_id, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn rows(value: Value) -> Vec<Row> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_scenario_negative_volume_kept_and_reported() {
        let records = vec![Record {
            date: Some("2024-01-02".to_string()),
            close: Some(150.0),
            volume: Some(-5),
            ticker: Some("aapl".to_string()),
            ..Default::default()
        }];
        let result = transform_records(Some("X".to_string()), records);

        assert_eq!(result.batch_id, "X");
        assert_eq!(result.data.len(), 1);
        let row = &result.data[0];
        assert_eq!(row["Date"], json!("2024-01-02T00:00:00Z"));
        assert_eq!(row["Close"], json!(150.0));
        assert_eq!(row["Volume"], json!(-5));
        assert_eq!(row["Ticker"], json!("AAPL"));
        assert_eq!(row["Open"], json!(0.0));
        assert_eq!(row["fullTimeEmployees"], json!(0));
        assert_eq!(row["sector"], json!(""));
        assert_eq!(
            result.errors,
            vec!["Row 0: Volume must be >= 0 and not null".to_string()]
        );
    }

    #[test]
    fn test_scenario_missing_date_drops_row() {
        let records = vec![Record {
            close: Some(10.0),
            ticker: Some("MSFT".to_string()),
            ..Default::default()
        }];
        let result = transform_records(None, records);
        assert!(result.data.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_scenario_identical_rows_collapse() {
        let record = Record {
            date: Some("2024-01-02".to_string()),
            close: Some(1.0),
            ticker: Some("A".to_string()),
            ..Default::default()
        };
        let result = transform_records(None, vec![record.clone(), record]);
        assert_eq!(result.data.len(), 1);
    }

    #[test]
    fn test_raw_row_without_date_key_drops() {
        let input = rows(json!([{"Close": 10.0, "Ticker": "MSFT"}]));
        let result = transform(Some("p".to_string()), input);
        assert_eq!(result.batch_id, "p");
        assert!(result.data.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_raw_rows_match_typed_records() {
        let record = Record {
            date: Some("2024-01-02".to_string()),
            close: Some(3.0),
            ticker: Some("nvda".to_string()),
            ..Default::default()
        };
        let raw = rows(json!([{"Date": "2024-01-02", "Close": 3.0, "Ticker": "nvda"}]));

        let typed = transform_records(Some("same".to_string()), vec![record]);
        let generic = transform(Some("same".to_string()), raw);
        assert_eq!(typed, generic);
    }

    #[test]
    fn test_blank_batch_id_passes_through() {
        let result = transform(Some("  ".to_string()), Vec::new());
        assert_eq!(result.batch_id, "  ");

        let generated = transform(Some(String::new()), Vec::new());
        assert!(!generated.batch_id.is_empty());
    }

    #[test]
    fn test_missing_and_empty_ticker_both_drop() {
        let input = rows(json!([
            {"Date": "2024-01-02", "Close": 1.0},
            {"Date": "2024-01-02", "Close": 1.0, "Ticker": ""},
            {"Date": "2024-01-03", "Close": 2.0, "Ticker": "ok"}
        ]));
        let (result, stats) = transform_with_stats(None, input);
        assert_eq!(result.data.len(), 1);
        assert_eq!(result.data[0]["Ticker"], json!("OK"));
        assert_eq!(stats.critical_dropped, 2);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_error_index_counts_surviving_rows() {
        let input = rows(json!([
            {"Date": "2024-01-02", "Close": 1.0, "Ticker": ""},
            {"Date": "2024-01-03", "Close": "n/a", "Volume": -1, "Ticker": "b"}
        ]));
        let result = transform(None, input);
        assert_eq!(
            result.errors,
            vec![
                "Row 0: Close price must be numeric and not null".to_string(),
                "Row 0: Volume must be >= 0 and not null".to_string(),
            ]
        );
    }

    #[test]
    fn test_unparsed_date_kept_with_error() {
        let input = rows(json!([{"Date": "someday", "Close": 1.0, "Ticker": "a"}]));
        let (result, stats) = transform_with_stats(Some("b1".to_string()), input);
        assert_eq!(result.data.len(), 1);
        assert_eq!(result.data[0]["Date"], Value::Null);
        assert_eq!(stats.unparsed_dates, 1);
        assert_eq!(
            result.errors,
            vec!["Row 0: Date must be present and a string".to_string()]
        );
    }

    #[test]
    fn test_empty_batch() {
        let (result, stats) = transform_with_stats(Some("empty".to_string()), Vec::new());
        assert_eq!(result.batch_id, "empty");
        assert!(result.data.is_empty());
        assert!(result.errors.is_empty());
        assert_eq!(stats, TransformStats::default());
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let input = rows(json!([
            {"Date": "2024-01-02", "Close": 1.0, "Ticker": "a", "source": "manual"}
        ]));
        let result = transform(None, input);
        assert_eq!(result.data[0]["source"], json!("manual"));
    }

    #[test]
    fn test_stats_add_up() {
        let input = rows(json!([
            {"Date": "2024-01-02", "Close": 1.0, "Ticker": "a"},
            {"Date": "2024-01-02", "Close": 1.0, "Ticker": "a"},
            {"Close": 1.0, "Ticker": "b"},
            {"Date": "2024-01-04", "Close": null, "Ticker": "c", "Volume": -2}
        ]));
        let (result, stats) = transform_with_stats(None, input);
        assert_eq!(stats.input_rows, 4);
        assert_eq!(
            stats.output_rows,
            stats.input_rows - stats.duplicates_removed - stats.critical_dropped
        );
        assert_eq!(stats.error_count, result.errors.len());
        // Close null은 0으로 채워져 유효
        assert_eq!(result.errors, vec!["Row 1: Volume must be >= 0 and not null"]);
    }
}
