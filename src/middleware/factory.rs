use std::sync::Arc;
use async_trait::async_trait;
use super::chain::validate_name;
use super::response::handle_error;
use super::{
    BoxedHandler, CatchHandler, Handler, HandlerResult, Middleware, MiddlewareError, Options,
    RequestContext, ResponseContext,
};

/// 단일 미들웨어를 기본 설정과 묶어 재사용 가능한 바인더로 만듭니다.
///
/// 체인 없이 단독으로 사용해도 하위 핸들러의 실패가 이 계층에서 처리되도록
/// 하위 핸들러를 에러 처리 핸들러로 감쌉니다.
#[derive(Clone)]
pub struct MiddlewareFactory {
    middleware: Arc<dyn Middleware>,
    defaults: Options,
}

impl MiddlewareFactory {
    pub fn new(middleware: Arc<dyn Middleware>, defaults: Options) -> Result<Self, MiddlewareError> {
        validate_name(middleware.name())?;
        Ok(Self {
            middleware,
            defaults,
        })
    }

    pub fn name(&self) -> &str {
        self.middleware.name()
    }

    pub fn defaults(&self) -> &Options {
        &self.defaults
    }

    pub fn middleware(&self) -> Arc<dyn Middleware> {
        self.middleware.clone()
    }

    /// 같은 이름의 다른 미들웨어로 교체합니다. 기본 설정은 유지됩니다.
    pub(crate) fn replace_middleware(&mut self, middleware: Arc<dyn Middleware>) {
        debug_assert_eq!(self.middleware.name(), middleware.name());
        self.middleware = middleware;
    }

    /// 하위 핸들러와 호출별 설정으로 새 핸들러를 만듭니다.
    ///
    /// 병합된 설정을 미들웨어가 거부하면 구성 에러를 반환합니다.
    pub fn bind(
        &self,
        handler: BoxedHandler,
        overrides: Option<Options>,
    ) -> Result<BoxedHandler, MiddlewareError> {
        let effective = Arc::new(self.defaults.merge(overrides.as_ref()));
        let guarded: BoxedHandler = Arc::new(GuardedHandler {
            inner: handler,
            catch: effective.catch().cloned(),
        });
        self.middleware.wrap(guarded, effective)
    }
}

/// 실패를 에러 처리 경로로 넘기는 핸들러
struct GuardedHandler {
    inner: BoxedHandler,
    catch: Option<CatchHandler>,
}

#[async_trait]
impl Handler for GuardedHandler {
    async fn call(&self, req: &mut RequestContext, res: &mut ResponseContext) -> HandlerResult {
        match self.inner.call(req, res).await {
            Ok(()) => Ok(()),
            Err(err) => handle_error(req, res, err, self.catch.as_ref()).await,
        }
    }
}
