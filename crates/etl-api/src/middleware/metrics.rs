//! 요청별 HTTP 메트릭 기록.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};

use crate::metrics::{
    normalize_path, record_http_duration, record_http_request, record_http_response,
};

/// 메트릭 `path` 라벨.
///
/// 라우터가 매칭한 템플릿(`/batch/{batch_id}`)을 `:batch_id` 표기로 바꿉니다.
/// 매칭되지 않은 요청은 실제 경로를 정규화해 라벨 수가 늘어나지 않게 합니다.
fn path_label(request: &Request) -> String {
    match request.extensions().get::<MatchedPath>() {
        Some(matched) => matched
            .as_str()
            .split('/')
            .map(|segment| match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(param) => format!(":{}", param),
                None => segment.to_string(),
            })
            .collect::<Vec<_>>()
            .join("/"),
        None => normalize_path(request.uri().path()),
    }
}

/// `axum::middleware::from_fn`으로 붙이는 메트릭 미들웨어.
pub async fn metrics_layer(request: Request, next: Next) -> Response {
    let method = request.method().as_str().to_owned();
    let path = path_label(&request);
    record_http_request(&method, &path);

    let started = Instant::now();
    let response = next.run(request).await;

    record_http_response(&method, &path, response.status().as_u16());
    record_http_duration(&method, &path, started.elapsed().as_secs_f64());
    response
}
