use std::collections::HashSet;
use std::sync::Arc;
use async_trait::async_trait;
use tracing::debug;
use super::config::CATCH_KEY;
use super::response::handle_error;
use super::{
    BoxedHandler, Handler, HandlerResult, Middleware, MiddlewareError, Options, RequestContext,
    ResponseContext,
};

/// 미들웨어 체인
///
/// 순서가 있는 미들웨어 목록과 최종 핸들러를 하나의 핸들러로 합성합니다.
/// 미들웨어는 위치 순서대로 실행되며 이름은 설정 슬롯 조회와 추적에만 쓰입니다.
/// 체인 밖으로 전파된 에러는 최상단에서 한 번만 처리됩니다.
///
/// 각 위치의 [`Middleware::wrap`]은 구성 시점에 한 번만 호출되고,
/// 요청마다 실행되는 것은 합성된 핸들러뿐입니다.
///
/// `Chain` 자체가 [`Handler`]이므로 다른 체인의 최종 핸들러로 중첩할 수 있습니다.
#[derive(Clone)]
pub struct Chain {
    inner: Arc<ChainInner>,
}

struct ChainInner {
    names: Vec<String>,
    /// 0번 위치부터 시작하는 합성 핸들러
    entry: BoxedHandler,
    options: Arc<Options>,
}

impl Chain {
    /// 체인을 구성합니다.
    ///
    /// 이름이 비어 있거나 예약된 이름(`catch`)이거나 중복된 미들웨어가 있으면
    /// 구성 단계에서 실패합니다. 미들웨어가 설정 슬롯을 거부해도 마찬가지입니다.
    pub fn new(
        middlewares: Vec<Arc<dyn Middleware>>,
        terminal: BoxedHandler,
        options: Options,
    ) -> Result<Self, MiddlewareError> {
        let mut seen = HashSet::new();
        for middleware in &middlewares {
            let name = middleware.name();
            validate_name(name)?;
            if !seen.insert(name.to_string()) {
                return Err(MiddlewareError::DuplicateMiddleware(name.to_string()));
            }
        }

        // 마지막 위치부터 감싸서 `next`가 항상 다음 위치를 가리키도록 함
        let mut entry = terminal;
        for middleware in middlewares.iter().rev() {
            let slot = Arc::new(options.slot(middleware.name()));
            entry = Arc::new(Step {
                name: middleware.name().to_string(),
                handler: middleware.wrap(entry, slot)?,
            });
        }

        let names: Vec<String> = middlewares.iter().map(|m| m.name().to_string()).collect();
        debug!(middlewares = ?names, "미들웨어 체인 구성");

        Ok(Self {
            inner: Arc::new(ChainInner {
                names,
                entry,
                options: Arc::new(options),
            }),
        })
    }

    pub fn len(&self) -> usize {
        self.inner.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.inner.names
    }

    pub fn options(&self) -> &Options {
        &self.inner.options
    }

    pub fn into_handler(self) -> BoxedHandler {
        Arc::new(self)
    }
}

#[async_trait]
impl Handler for Chain {
    async fn call(&self, req: &mut RequestContext, res: &mut ResponseContext) -> HandlerResult {
        match self.inner.entry.call(req, res).await {
            Ok(()) => Ok(()),
            Err(err) => handle_error(req, res, err, self.inner.options.catch()).await,
        }
    }
}

/// 체인의 한 위치. 추적 목록에 이름을 남기고 감싼 핸들러를 실행합니다.
struct Step {
    name: String,
    handler: BoxedHandler,
}

#[async_trait]
impl Handler for Step {
    async fn call(&self, req: &mut RequestContext, res: &mut ResponseContext) -> HandlerResult {
        req.record_middleware(&self.name);
        self.handler.call(req, res).await
    }
}

pub(crate) fn validate_name(name: &str) -> Result<(), MiddlewareError> {
    if name.trim().is_empty() {
        return Err(MiddlewareError::config(name, "미들웨어 이름이 비어 있습니다"));
    }
    if name == CATCH_KEY {
        return Err(MiddlewareError::ReservedName(name.to_string()));
    }
    Ok(())
}

/// 미들웨어 목록과 최종 핸들러를 합성한 핸들러를 반환합니다.
pub fn chain(
    middlewares: Vec<Arc<dyn Middleware>>,
    terminal: BoxedHandler,
    options: Options,
) -> Result<BoxedHandler, MiddlewareError> {
    Chain::new(middlewares, terminal, options).map(Chain::into_handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::{handler_fn, middleware_fn};
    use bytes::Bytes;
    use hyper::{Request, StatusCode};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn pass(name: &str) -> Arc<dyn Middleware> {
        middleware_fn(name, |next, _options| {
            handler_fn(move |req, res| {
                let next = next.clone();
                Box::pin(async move { next.call(req, res).await })
            })
        })
    }

    fn ok_handler() -> BoxedHandler {
        handler_fn(|_req, res| Box::pin(async move {
            res.status(StatusCode::OK).send("ok");
            Ok(())
        }))
    }

    fn request() -> RequestContext {
        RequestContext::new(Request::builder().uri("/").body(Bytes::new()).unwrap())
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = Chain::new(vec![pass("auth"), pass("auth")], ok_handler(), Options::new());
        assert!(matches!(result, Err(MiddlewareError::DuplicateMiddleware(name)) if name == "auth"));
    }

    #[test]
    fn test_reserved_and_empty_names_rejected() {
        let reserved = Chain::new(vec![pass("catch")], ok_handler(), Options::new());
        assert!(matches!(reserved, Err(MiddlewareError::ReservedName(_))));

        let empty = Chain::new(vec![pass("")], ok_handler(), Options::new());
        assert!(matches!(empty, Err(MiddlewareError::Config { .. })));
    }

    #[test]
    fn test_wrap_runs_once_per_position() {
        let wraps = Arc::new(AtomicUsize::new(0));
        let counted = {
            let wraps = wraps.clone();
            middleware_fn("counted", move |next, _options| {
                wraps.fetch_add(1, Ordering::SeqCst);
                next
            })
        };

        let chain = Chain::new(vec![counted, pass("other")], ok_handler(), Options::new()).unwrap();
        assert_eq!(wraps.load(Ordering::SeqCst), 1);
        assert_eq!(chain.names(), ["counted", "other"]);
    }

    #[test]
    fn test_rejected_slot_is_construction_error() {
        struct Strict;

        impl Middleware for Strict {
            fn name(&self) -> &str {
                "strict"
            }

            fn wrap(&self, _next: BoxedHandler, options: Arc<Options>) -> Result<BoxedHandler, MiddlewareError> {
                Err(MiddlewareError::config("strict", format!("{:?}", options)))
            }
        }

        let result = Chain::new(vec![pass("first"), Arc::new(Strict)], ok_handler(), Options::new());
        assert!(matches!(result, Err(MiddlewareError::Config { middleware, .. }) if middleware == "strict"));
    }

    #[tokio::test]
    async fn test_trace_records_order() {
        let chain = Chain::new(
            vec![pass("first"), pass("second"), pass("third")],
            ok_handler(),
            Options::new(),
        )
        .unwrap();
        assert_eq!(chain.len(), 3);

        let mut req = request();
        let mut res = ResponseContext::new();
        chain.call(&mut req, &mut res).await.unwrap();

        assert_eq!(req.middlewares(), ["first", "second", "third"]);
        assert_eq!(res.status_code(), StatusCode::OK);
    }
}
