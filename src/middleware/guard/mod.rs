//! 가드 미들웨어
//!
//! 조건을 만족하지 않는 요청을 차단합니다.

mod config;
mod middleware;

pub use config::GuardConfig;
pub use middleware::{GuardMiddleware, GUARD_NAME};
