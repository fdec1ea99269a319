//! 파이프라인 공통 에러 타입.
//!
//! 변환 엔진은 데이터 품질 문제로 실패하지 않습니다. 이 에러들은
//! 배치 경계(ID 검증, 설정, 직렬화)에서만 발생합니다.

use thiserror::Error;

/// 파이프라인 에러.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// 설정 에러
    #[error("Configuration error: {0}")]
    Config(String),

    /// 잘못된 입력 (배치 ID, 요청 본문 등)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 찾을 수 없음
    #[error("Not found: {0}")]
    NotFound(String),

    /// 직렬화 에러
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// 내부 에러
    #[error("Internal error: {0}")]
    Internal(String),
}

/// 파이프라인 작업을 위한 Result 타입.
pub type PipelineResult<T> = Result<T, PipelineError>;

impl PipelineError {
    /// 클라이언트 요청 문제인지 확인합니다 (HTTP 4xx 대응).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PipelineError::InvalidInput(_) | PipelineError::NotFound(_)
        )
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for PipelineError {
    fn from(err: config::ConfigError) -> Self {
        PipelineError::Config(err.to_string())
    }
}
