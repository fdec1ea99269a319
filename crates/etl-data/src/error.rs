//! 데이터 모듈 오류 타입.

use etl_core::PipelineError;
use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 데이터 가져오기 오류 (외부 소스, 재시도 대상)
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// 외부 소스 응답 파싱 오류
    #[error("Parse error: {0}")]
    Parse(String),

    /// 타임아웃 오류
    #[error("Operation timeout: {0}")]
    Timeout(String),

    /// 종목 데이터 없음
    #[error("{0}")]
    NoData(String),

    /// 레코드를 찾을 수 없음
    #[error("Not found: {0}")]
    NotFound(String),

    /// 잘못된 입력 (배치 ID 등)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 업로드 본문 형식 오류
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// 파일 입출력 오류
    #[error("I/O error: {0}")]
    Io(String),

    /// 직렬화/역직렬화 오류
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// 설정 오류
    #[error("Configuration error: {0}")]
    Config(String),

    /// 내부 오류
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DataError {
    /// 재시도하면 성공할 수 있는 일시적 오류인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DataError::Fetch(_) | DataError::Timeout(_))
    }
}

impl From<std::io::Error> for DataError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            DataError::NotFound(err.to_string())
        } else {
            DataError::Io(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::Serialization(err.to_string())
    }
}

impl From<tempfile::PersistError> for DataError {
    fn from(err: tempfile::PersistError) -> Self {
        DataError::Io(err.error.to_string())
    }
}

impl From<PipelineError> for DataError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InvalidInput(msg) => DataError::InvalidInput(msg),
            PipelineError::NotFound(msg) => DataError::NotFound(msg),
            PipelineError::Serialization(msg) => DataError::Serialization(msg),
            PipelineError::Config(msg) => DataError::Config(msg),
            PipelineError::Internal(msg) => DataError::Internal(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
