//! ETL API 서버.
//!
//! 추출, 변환, 적재 서비스를 하나의 HTTP 서버로 제공합니다.

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    middleware,
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use etl_api::{create_api_router, metrics_layer, setup_metrics_recorder, AppState};
use etl_core::{init_logging, AppConfig, LogConfig, ServerConfig};
use etl_data::{Extractor, FileBatchStore, RetryConfig, RetryingSource, YahooSource};

/// CORS 레이어 생성.
///
/// 허용 origin 목록이 비어 있으면 모든 origin을 허용합니다 (개발 모드).
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let allow_origin = if origins.is_empty() {
        if !config.cors_origins.is_empty() {
            warn!("cors_origins contains no valid origins, allowing any");
        } else {
            warn!("cors_origins not set, allowing any origin (development mode)");
        }
        AllowOrigin::any()
    } else {
        info!("CORS configured with {} allowed origins", origins.len());
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
}

/// Prometheus 메트릭 핸들러.
async fn metrics_handler(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}

/// 라우터 구성.
fn create_router(state: Arc<AppState>, metrics_handle: PrometheusHandle, config: &ServerConfig) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics_handle);

    Router::new()
        .merge(metrics_router)
        .merge(create_api_router().with_state(state))
        .layer(middleware::from_fn(metrics_layer))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout(),
        ))
        .layer(cors_layer(config))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    let config = AppConfig::load_default()?;
    init_logging(LogConfig::from_settings(&config.logging))?;

    info!("Starting ETL API server...");

    let metrics_handle = setup_metrics_recorder()?;
    info!("Prometheus metrics recorder initialized");

    let source = RetryingSource::new(YahooSource::new()?, RetryConfig::from(&config.fetch));
    let extractor =
        Extractor::new(Arc::new(source)).with_default_period(config.fetch.default_period.clone());
    let store = FileBatchStore::new(&config.storage.data_dir)?;
    info!(data_dir = %config.storage.data_dir.display(), "Batch store ready");

    let state = Arc::new(AppState::new(extractor, Arc::new(store)));
    let app = create_router(state, metrics_handle, &config.server);

    let addr = config.server.socket_addr().map_err(|e| {
        error!(
            host = %config.server.host,
            port = config.server.port,
            error = %e,
            "Invalid socket address. Check server.host and server.port."
        );
        e
    })?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
