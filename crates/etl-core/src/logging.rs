//! tracing 기반 로깅 초기화.
//!
//! API 서버와 CLI가 같은 경로로 subscriber를 설치합니다. 출력 형식은
//! `pretty`, `json`, `compact` 중 하나이며 CLI는 결과를 stdout에 쓰기 때문에
//! 로그를 stderr로 보냅니다.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan, writer::BoxMakeWriter},
    layer::SubscriberExt,
    registry::Registry,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::config::LoggingConfig;

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 개발용 여러 줄 형식
    #[default]
    Pretty,
    /// 로그 수집기용 JSON 한 줄
    Json,
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(format!("Unknown log format: {}", other)),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// `EnvFilter` 지시어 (예: "info", "etl_data=debug,info")
    pub level: String,
    pub format: LogFormat,
    /// span 생성/종료 이벤트 기록
    pub span_events: bool,
    /// 파일명과 줄 번호 기록
    pub source_location: bool,
    pub to_stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            span_events: false,
            source_location: false,
            to_stderr: false,
        }
    }
}

impl LogConfig {
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Default::default()
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    pub fn with_source_location(mut self, enabled: bool) -> Self {
        self.source_location = enabled;
        self
    }

    /// 로그를 stderr로 보냅니다.
    pub fn with_stderr(mut self, enabled: bool) -> Self {
        self.to_stderr = enabled;
        self
    }

    /// 애플리케이션 설정의 `logging` 섹션에서 생성합니다.
    ///
    /// `LOG_FORMAT` 환경 변수가 설정 파일의 형식보다 우선하며,
    /// 알 수 없는 형식은 pretty로 대체됩니다.
    pub fn from_settings(settings: &LoggingConfig) -> Self {
        let format = std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse().ok())
            .or_else(|| settings.format.parse().ok())
            .unwrap_or_default();

        Self::new(settings.level.clone()).with_format(format)
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let writer = if self.to_stderr {
            BoxMakeWriter::new(std::io::stderr)
        } else {
            BoxMakeWriter::new(std::io::stdout)
        };
        let span_events = if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let base = fmt::layer()
            .with_writer(writer)
            .with_file(self.source_location)
            .with_line_number(self.source_location)
            .with_span_events(span_events);

        match self.format {
            LogFormat::Pretty => base.pretty().boxed(),
            LogFormat::Json => base.json().boxed(),
            LogFormat::Compact => base.compact().boxed(),
        }
    }
}

/// 전역 subscriber를 설치합니다.
///
/// `RUST_LOG`가 있으면 `config.level`보다 우선합니다. 이미 설치되어 있으면 에러.
///
/// ```no_run
/// use etl_core::logging::{init_logging, LogConfig, LogFormat};
///
/// init_logging(LogConfig::new("debug").with_format(LogFormat::Json)).unwrap();
/// ```
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)?,
    };

    tracing_subscriber::registry()
        .with(config.fmt_layer())
        .with(filter)
        .try_init()?;

    tracing::debug!(format = ?config.format, level = %config.level, "Logging initialized");
    Ok(())
}

/// `batch_id` (및 선택적으로 `ticker`) 필드를 가진 info span.
#[macro_export]
macro_rules! batch_span {
    ($name:expr, $batch_id:expr) => {
        tracing::info_span!($name, batch_id = %$batch_id)
    };
    ($name:expr, $batch_id:expr, $ticker:expr) => {
        tracing::info_span!($name, batch_id = %$batch_id, ticker = %$ticker)
    };
}
