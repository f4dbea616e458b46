use std::sync::Arc;
use serde_json::json;
use tracing::debug;
use super::auth::{AuthMiddleware, CustomAuthenticator, AUTH_NAME};
use super::error_guard::ErrorGuard;
use super::guard::{GuardMiddleware, GUARD_NAME};
use super::rest::Rest;
use super::{
    chain, BoxedHandler, Middleware, MiddlewareError, MiddlewareFactory, Options, RequestContext,
};

pub const REST_NAME: &str = "rest";

/// 기본 설정을 적용합니다.
fn with_default_options(options: &Options) -> Options {
    Options::new()
        .with(AUTH_NAME, json!({ "strategy": "none" }))
        .with(GUARD_NAME, json!({}))
        .merge(Some(options))
}

/// 내장 미들웨어 모음
///
/// 공통 설정 하나로 `auth`, `guard`, `error` 바인더와 REST 디스패처, 체인을 제공합니다.
///
/// ```
/// use handler_chain::middleware::{handler_fn, MiddlewareManager, Options};
/// use hyper::StatusCode;
/// use serde_json::json;
///
/// let manager = MiddlewareManager::new(
///     Options::new().with("guard", json!({ "require_auth": false })),
/// ).unwrap();
///
/// let handler = manager.error(
///     handler_fn(|_req, res| Box::pin(async move {
///         res.status(StatusCode::OK).send("ok");
///         Ok(())
///     })),
///     None,
/// ).unwrap();
/// ```
#[derive(Clone)]
pub struct MiddlewareManager {
    options: Options,
    auth: MiddlewareFactory,
    guard: MiddlewareFactory,
    error: MiddlewareFactory,
}

impl MiddlewareManager {
    pub fn new(options: Options) -> Result<Self, MiddlewareError> {
        let options = with_default_options(&options);
        Self::build(
            options,
            Arc::new(AuthMiddleware::new()),
            Arc::new(GuardMiddleware::new()),
        )
    }

    fn build(
        options: Options,
        auth: Arc<dyn Middleware>,
        guard: Arc<dyn Middleware>,
    ) -> Result<Self, MiddlewareError> {
        let auth = MiddlewareFactory::new(auth, options.slot(AUTH_NAME))?;
        let guard = MiddlewareFactory::new(guard, options.slot(GUARD_NAME))?;
        let error = MiddlewareFactory::new(Arc::new(ErrorGuard::new()), catch_only(&options))?;

        debug!(options = ?options, "미들웨어 매니저 생성");
        Ok(Self {
            options,
            auth,
            guard,
            error,
        })
    }

    /// `custom` 인증 전략에 사용할 인증기를 등록합니다.
    pub fn with_authenticator(mut self, authenticator: Arc<dyn CustomAuthenticator>) -> Self {
        let auth = AuthMiddleware::new().with_authenticator(authenticator);
        self.auth.replace_middleware(Arc::new(auth));
        self
    }

    /// 가드 조건을 등록합니다.
    pub fn with_guard_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&RequestContext) -> bool + Send + Sync + 'static,
    {
        let guard = GuardMiddleware::new().with_predicate(predicate);
        self.guard.replace_middleware(Arc::new(guard));
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn auth(
        &self,
        handler: BoxedHandler,
        overrides: Option<Options>,
    ) -> Result<BoxedHandler, MiddlewareError> {
        self.auth.bind(handler, overrides)
    }

    pub fn guard(
        &self,
        handler: BoxedHandler,
        overrides: Option<Options>,
    ) -> Result<BoxedHandler, MiddlewareError> {
        self.guard.bind(handler, overrides)
    }

    pub fn error(
        &self,
        handler: BoxedHandler,
        overrides: Option<Options>,
    ) -> Result<BoxedHandler, MiddlewareError> {
        self.error.bind(handler, overrides)
    }

    /// 체인에 넣을 수 있는 인증 미들웨어
    pub fn auth_middleware(&self) -> Arc<dyn Middleware> {
        self.auth.middleware()
    }

    /// 체인에 넣을 수 있는 가드 미들웨어
    pub fn guard_middleware(&self) -> Arc<dyn Middleware> {
        self.guard.middleware()
    }

    /// `rest` 슬롯 설정과 공통 `catch`를 적용한 REST 디스패처를 만듭니다.
    pub fn rest(&self, rest: Rest, overrides: Option<Options>) -> Result<BoxedHandler, MiddlewareError> {
        let mut options = self.options.slot(REST_NAME);
        if let Some(catch) = self.options.catch() {
            options = options.with_catch(catch.clone());
        }
        let options = options.merge(overrides.as_ref());
        Ok(Arc::new(rest.with_options(&options)?))
    }

    /// 공통 설정에 `overrides`를 병합하여 체인을 구성합니다.
    pub fn chain(
        &self,
        middlewares: Vec<Arc<dyn Middleware>>,
        handler: BoxedHandler,
        overrides: Option<Options>,
    ) -> Result<BoxedHandler, MiddlewareError> {
        chain(middlewares, handler, self.options.merge(overrides.as_ref()))
    }

    /// 설정을 병합한 새 매니저를 만듭니다. 등록된 인증기와 가드 조건은 유지됩니다.
    pub fn extend(&self, overrides: Options) -> Result<Self, MiddlewareError> {
        Self::build(
            self.options.merge(Some(&overrides)),
            self.auth.middleware(),
            self.guard.middleware(),
        )
    }
}

fn catch_only(options: &Options) -> Options {
    match options.catch() {
        Some(catch) => Options::new().with_catch(catch.clone()),
        None => Options::new(),
    }
}
