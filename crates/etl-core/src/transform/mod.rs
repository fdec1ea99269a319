//! 변환 엔진.
//!
//! 두 단계로 배치를 처리합니다.
//! 1. 정규화 (`normalize`): 중복 제거, 종류별 결측값 채우기, 필수 컬럼이
//!    비어 있는 행 제거, `Date`/`currency`/`Ticker` 표준화
//! 2. 검증 (`validate`): 남은 행마다 순수 함수로 위반 사항 수집
//!
//! 필수 문자열 컬럼(`Date`, `Ticker`)은 채우기 이후 빈 문자열인지로 제거
//! 여부를 판단합니다. 따라서 결측된 `Date`/`Ticker`는 행 제거로 이어지고,
//! 숫자형인 `Close`는 0으로 채워져 이 경로로는 제거되지 않습니다.

pub mod dates;
mod engine;
pub mod normalize;
pub mod validate;

pub use engine::{transform, transform_records, transform_with_stats, TransformStats};
pub use normalize::BatchSchema;
pub use validate::Violation;
