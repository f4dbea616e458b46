use std::sync::Arc;
use async_trait::async_trait;
use hyper::StatusCode;
use tracing::debug;
use crate::middleware::{
    BoxedHandler, Handler, HandlerResult, Middleware, MiddlewareError, Options, RequestContext,
    ResponseContext,
};
use super::config::GuardConfig;

pub const GUARD_NAME: &str = "guard";

type Predicate = Arc<dyn Fn(&RequestContext) -> bool + Send + Sync>;

/// 가드 미들웨어
///
/// `require_auth`와 등록된 조건을 모두 만족해야 다음 핸들러를 호출합니다.
#[derive(Clone, Default)]
pub struct GuardMiddleware {
    predicate: Option<Predicate>,
}

impl GuardMiddleware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&RequestContext) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }
}

impl Middleware for GuardMiddleware {
    fn name(&self) -> &str {
        GUARD_NAME
    }

    fn wrap(&self, next: BoxedHandler, options: Arc<Options>) -> Result<BoxedHandler, MiddlewareError> {
        let config: GuardConfig = options.parse()?;
        let status = StatusCode::from_u16(config.status)
            .map_err(|e| MiddlewareError::config(GUARD_NAME, e.to_string()))?;

        Ok(Arc::new(GuardHandler {
            next,
            predicate: self.predicate.clone(),
            require_auth: config.require_auth,
            status,
            message: config.message,
        }))
    }
}

struct GuardHandler {
    next: BoxedHandler,
    predicate: Option<Predicate>,
    require_auth: bool,
    status: StatusCode,
    message: String,
}

impl GuardHandler {
    fn allows(&self, req: &RequestContext) -> bool {
        if self.require_auth && !req.is_authenticated() {
            return false;
        }
        self.predicate
            .as_ref()
            .map(|predicate| predicate(req))
            .unwrap_or(true)
    }
}

#[async_trait]
impl Handler for GuardHandler {
    async fn call(&self, req: &mut RequestContext, res: &mut ResponseContext) -> HandlerResult {
        if self.allows(req) {
            return self.next.call(req, res).await;
        }

        debug!(
            request_id = %req.request_id(),
            status = %self.status,
            "Guard rejected request"
        );
        res.status(self.status).send(self.message.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::{handler_fn, UserId};
    use bytes::Bytes;
    use hyper::Request;
    use serde_json::json;

    fn ok_handler() -> BoxedHandler {
        handler_fn(|_req, res| Box::pin(async move {
            res.status(StatusCode::OK).send("ok");
            Ok(())
        }))
    }

    fn request(uid: Option<UserId>) -> RequestContext {
        let mut req = RequestContext::new(Request::builder().uri("/admin").body(Bytes::new()).unwrap());
        req.uid = uid;
        req
    }

    #[tokio::test]
    async fn test_requires_auth_by_default() {
        let handler = GuardMiddleware::new().wrap(ok_handler(), Arc::new(Options::new())).unwrap();

        let mut req = request(None);
        let mut res = ResponseContext::new();
        handler.call(&mut req, &mut res).await.unwrap();
        assert_eq!(res.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(res.body(), &Bytes::from("Forbidden"));

        let mut req = request(Some(UserId::Number(1)));
        let mut res = ResponseContext::new();
        handler.call(&mut req, &mut res).await.unwrap();
        assert_eq!(res.status_code(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_predicate_and_custom_response() {
        let guard = GuardMiddleware::new()
            .with_predicate(|req| req.uid == Some(UserId::Text("admin".to_string())));
        let options = Arc::new(Options::new()
            .with("status", json!(404))
            .with("message", json!("Not Found")));
        let handler = guard.wrap(ok_handler(), options).unwrap();

        let mut req = request(Some(UserId::Text("guest".to_string())));
        let mut res = ResponseContext::new();
        handler.call(&mut req, &mut res).await.unwrap();
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(res.body(), &Bytes::from("Not Found"));

        let mut req = request(Some(UserId::Text("admin".to_string())));
        let mut res = ResponseContext::new();
        handler.call(&mut req, &mut res).await.unwrap();
        assert_eq!(res.status_code(), StatusCode::OK);
    }

    #[test]
    fn test_invalid_status_is_construction_error() {
        let options = Arc::new(Options::new().with("status", json!(1000)));
        let result = GuardMiddleware::new().wrap(ok_handler(), options);
        assert!(matches!(result, Err(MiddlewareError::Config { .. })));

        let options = Arc::new(Options::new().with("require_auth", json!("yes")));
        let result = GuardMiddleware::new().wrap(ok_handler(), options);
        assert!(matches!(result, Err(MiddlewareError::Json(_))));
    }
}
