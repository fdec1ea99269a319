//! CLI 명령어 구현 모듈.

pub mod context;
pub mod load;
pub mod run;
pub mod transform;

pub use context::Context;
