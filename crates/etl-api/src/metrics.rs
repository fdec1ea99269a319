//! Prometheus 메트릭.
//!
//! HTTP 요청 메트릭과 파이프라인 메트릭을 수집하고 `/metrics` 엔드포인트로 노출합니다.

use etl_core::{StoreReceipt, TransformStats};
use metrics::{counter, histogram, Label};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

/// 레코더를 전역으로 설치하고 `/metrics` 렌더링 핸들을 돌려줍니다.
///
/// 이미 설치되어 있으면 에러.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(HTTP_DURATION.to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )?
        .set_buckets_for_metric(
            Matcher::Full(STORE_DURATION.to_string()),
            &[0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0],
        )?
        .install_recorder()
}

const HTTP_DURATION: &str = "http_request_duration_seconds";
const STORE_DURATION: &str = "etl_batch_store_duration_seconds";

fn http_labels(method: &str, path: &str) -> Vec<Label> {
    vec![
        Label::new("method", method.to_owned()),
        Label::new("path", path.to_owned()),
    ]
}

pub fn record_http_request(method: &str, path: &str) {
    counter!("http_requests_total", http_labels(method, path)).increment(1);
}

pub fn record_http_response(method: &str, path: &str, status: u16) {
    let mut labels = http_labels(method, path);
    labels.push(Label::new("status", status.to_string()));
    counter!("http_responses_total", labels).increment(1);
}

pub fn record_http_duration(method: &str, path: &str, duration_secs: f64) {
    histogram!(HTTP_DURATION, http_labels(method, path)).record(duration_secs);
}

/// 변환 한 번의 행 흐름. 제거 사유는 `reason` 라벨로 구분합니다.
pub fn record_transform(stats: &TransformStats) {
    counter!("etl_transform_rows_in_total").increment(stats.input_rows as u64);
    counter!("etl_transform_rows_out_total").increment(stats.output_rows as u64);
    counter!("etl_transform_rows_dropped_total", "reason" => "duplicate")
        .increment(stats.duplicates_removed as u64);
    counter!("etl_transform_rows_dropped_total", "reason" => "critical_empty")
        .increment(stats.critical_dropped as u64);
    counter!("etl_validation_errors_total").increment(stats.error_count as u64);
}

pub fn record_batch_stored(receipt: &StoreReceipt, duration_secs: f64) {
    counter!("etl_batches_stored_total").increment(1);
    counter!("etl_rows_loaded_total").increment(receipt.rows_loaded as u64);
    histogram!(STORE_DURATION).record(duration_secs);
}

/// 값을 경로에 담는 라우트와 그 자리의 라벨.
const PARAM_ROUTES: [(&str, &str); 4] = [
    ("extract", ":ticker"),
    ("info", ":ticker"),
    ("history", ":ticker"),
    ("batch", ":batch_id"),
];

fn looks_like_id(segment: &str) -> bool {
    let uuid_shape = segment.len() == 36 && segment.matches('-').count() == 4;
    let digits = !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit());
    uuid_shape || digits
}

/// 실제 요청 경로를 라벨용 템플릿으로 바꿉니다.
///
/// `/extract/AAPL` → `/extract/:ticker`, `/batch/nightly` → `/batch/:batch_id`.
/// 알 수 없는 라우트에서는 UUID나 숫자 세그먼트만 `:id`로 바뀝니다.
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    let param_label = segments
        .get(1)
        .and_then(|route| PARAM_ROUTES.iter().find(|(name, _)| name == route))
        .map(|(_, label)| *label);

    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| match param_label {
            Some(label) if i == 2 && !segment.is_empty() => label.to_string(),
            _ if looks_like_id(segment) => ":id".to_string(),
            _ => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_ticker() {
        assert_eq!(normalize_path("/extract/AAPL"), "/extract/:ticker");
        assert_eq!(normalize_path("/info/msft"), "/info/:ticker");
        assert_eq!(normalize_path("/history/BRK-B"), "/history/:ticker");
    }

    #[test]
    fn test_normalize_path_batch() {
        assert_eq!(
            normalize_path("/batch/123e4567-e89b-12d3-a456-426614174000"),
            "/batch/:batch_id"
        );
        assert_eq!(normalize_path("/batch/nightly"), "/batch/:batch_id");
    }

    #[test]
    fn test_normalize_path_static_routes() {
        assert_eq!(normalize_path("/extract_many"), "/extract_many");
        assert_eq!(normalize_path("/batches"), "/batches");
        assert_eq!(normalize_path("/health/ready"), "/health/ready");
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn test_normalize_path_fallback_id() {
        assert_eq!(normalize_path("/unknown/12345"), "/unknown/:id");
    }
}
