//! # ETL Core
//!
//! 마켓 데이터 ETL 파이프라인의 핵심 도메인 모델 및 변환 엔진을 제공합니다.
//!
//! 이 크레이트는 파이프라인 전반에서 사용되는 기본 타입을 제공합니다:
//! - 레코드 스키마 및 행(Row) 타입
//! - 배치 ID 규칙
//! - 변환 엔진 (정규화 + 행 단위 검증)
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod transform;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use transform::{transform, transform_records, transform_with_stats, TransformStats};
