//! ETL CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 종목 데이터 추출 (extract, info, history)
//! - 파일 단위 변환과 적재
//! - 추출 → 변환 → 적재 일괄 실행

pub mod commands;
