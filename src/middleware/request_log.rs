//! 요청 로그 미들웨어
//!
//! 요청별 메서드, 경로, 상태 코드, 처리 시간, 지나간 미들웨어를 기록합니다.

use std::sync::Arc;
use std::time::Instant;
use async_trait::async_trait;
use crate::logging::{log_request, RequestLog};
use super::{
    BoxedHandler, Handler, HandlerResult, Middleware, MiddlewareError, Options, RequestContext,
    ResponseContext,
};

pub const REQUEST_LOG_NAME: &str = "log";

#[derive(Debug, Default, Clone, Copy)]
pub struct RequestLogMiddleware;

impl RequestLogMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Middleware for RequestLogMiddleware {
    fn name(&self) -> &str {
        REQUEST_LOG_NAME
    }

    fn wrap(&self, next: BoxedHandler, _options: Arc<Options>) -> Result<BoxedHandler, MiddlewareError> {
        Ok(Arc::new(RequestLogHandler { next }))
    }
}

struct RequestLogHandler {
    next: BoxedHandler,
}

#[async_trait]
impl Handler for RequestLogHandler {
    async fn call(&self, req: &mut RequestContext, res: &mut ResponseContext) -> HandlerResult {
        let start_time = Instant::now();
        let mut log = RequestLog::new(req.request_id());
        log.with_request(req);

        let result = self.next.call(req, res).await;

        log.duration_ms = start_time.elapsed().as_millis() as u64;
        log.middlewares = req.middlewares().to_vec();
        match &result {
            Ok(()) => log.with_response(res.status_code()),
            Err(e) => log.with_error(e),
        }
        log_request(&log);

        result
    }
}
