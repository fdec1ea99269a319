//! 파이프라인 도메인 모델.

mod batch;
mod record;

pub use batch::*;
pub use record::*;
