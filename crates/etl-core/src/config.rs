//! 설정 관리.
//!
//! TOML 파일(선택)과 `ETL__` 접두사 환경 변수에서 애플리케이션 설정을 로드합니다.
//! 모든 섹션은 기본값을 가지므로 설정 파일 없이도 실행됩니다.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{PipelineError, PipelineResult};

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 외부 데이터 수집 설정
    pub fetch: FetchConfig,
    /// 배치 저장소 설정
    pub storage: StorageConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
    /// 허용 CORS origin 목록 (비어 있으면 모두 허용)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            request_timeout_secs: 60,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// 소켓 주소 반환.
    pub fn socket_addr(&self) -> PipelineResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| PipelineError::Config(format!("invalid server address: {}", e)))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 외부 데이터 수집(재시도 포함) 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    /// 최대 시도 횟수 (첫 시도 포함)
    pub max_attempts: u32,
    /// 지수 백오프 배수 (초)
    pub backoff_multiplier_secs: f64,
    /// 최소 대기 시간 (초)
    pub backoff_min_secs: f64,
    /// 최대 대기 시간 (초)
    pub backoff_max_secs: f64,
    /// 기본 조회 기간 (예: "1mo", "1y")
    pub default_period: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_multiplier_secs: 1.0,
            backoff_min_secs: 2.0,
            backoff_max_secs: 10.0,
            default_period: "1mo".to_string(),
        }
    }
}

/// 배치 저장소 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// 배치 파일을 저장할 디렉토리
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data/batches"),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    /// 환경 변수 예: `ETL__SERVER__PORT=9000`, `ETL__STORAGE__DATA_DIR=/var/lib/etl`.
    pub fn load<P: AsRef<Path>>(path: P) -> PipelineResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("ETL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// 기본 경로에서 설정을 로드합니다.
    ///
    /// `ETL_CONFIG` 환경 변수로 경로를 바꿀 수 있습니다.
    pub fn load_default() -> PipelineResult<Self> {
        let path =
            std::env::var("ETL_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
        Self::load(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.fetch.max_attempts, 3);
        assert_eq!(config.fetch.default_period, "1mo");
        assert_eq!(config.storage.data_dir, PathBuf::from("./data/batches"));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = AppConfig::load("does/not/exist.toml").unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.fetch.backoff_max_secs, 10.0);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let toml = r#"
            [server]
            port = 9100

            [storage]
            data_dir = "/tmp/etl-batches"
        "#;
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/etl-batches"));
        assert_eq!(config.fetch.max_attempts, 3);
    }

    #[test]
    fn test_socket_addr() {
        let server = ServerConfig::default();
        assert_eq!(server.socket_addr().unwrap().port(), 8000);

        let bad = ServerConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };
        assert!(bad.socket_addr().is_err());
    }
}
