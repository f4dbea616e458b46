//! 에러 가드 미들웨어
//!
//! 하위 핸들러를 그대로 실행합니다. 팩토리를 통해 사용하면 다른 미들웨어 없이도
//! 일관된 `catch` 동작을 얻을 수 있습니다.

use std::sync::Arc;
use super::{BoxedHandler, Middleware, MiddlewareError, Options};

pub const ERROR_GUARD_NAME: &str = "error";

#[derive(Debug, Default, Clone, Copy)]
pub struct ErrorGuard;

impl ErrorGuard {
    pub fn new() -> Self {
        Self
    }
}

impl Middleware for ErrorGuard {
    fn name(&self) -> &str {
        ERROR_GUARD_NAME
    }

    fn wrap(&self, next: BoxedHandler, _options: Arc<Options>) -> Result<BoxedHandler, MiddlewareError> {
        Ok(next)
    }
}
