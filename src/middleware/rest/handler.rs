use std::collections::HashMap;
use async_trait::async_trait;
use hyper::Method;
use tracing::debug;
use crate::middleware::response::handle_error;
use crate::middleware::{
    BoxedHandler, CatchHandler, Handler, HandlerResult, MiddlewareError, Options, RequestContext,
    ResponseContext,
};
use super::config::RestConfig;

/// 디스패처가 지원하는 HTTP 메서드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestMethod {
    Get,
    Put,
    Post,
    Patch,
    Delete,
}

impl RestMethod {
    pub fn from_method(method: &Method) -> Option<Self> {
        match method {
            &Method::GET => Some(Self::Get),
            &Method::PUT => Some(Self::Put),
            &Method::POST => Some(Self::Post),
            &Method::PATCH => Some(Self::Patch),
            &Method::DELETE => Some(Self::Delete),
            _ => None,
        }
    }
}

/// 메서드별 핸들러 디스패처
///
/// 자신의 실패(메서드 미지원, 핸들러 실패 포함)는 설정된 `catch` 또는
/// 기본 에러 응답으로 직접 처리합니다.
///
/// ```
/// use handler_chain::middleware::{handler_fn, rest::Rest};
/// use hyper::StatusCode;
///
/// let users = Rest::new()
///     .get(handler_fn(|_req, res| Box::pin(async move {
///         res.status(StatusCode::OK).send("list");
///         Ok(())
///     })))
///     .post(handler_fn(|_req, res| Box::pin(async move {
///         res.status(StatusCode::CREATED).send("created");
///         Ok(())
///     })));
/// ```
#[derive(Clone, Default)]
pub struct Rest {
    handlers: HashMap<RestMethod, BoxedHandler>,
    config: RestConfig,
    catch: Option<CatchHandler>,
}

impl Rest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, method: RestMethod, handler: BoxedHandler) -> Self {
        self.handlers.insert(method, handler);
        self
    }

    pub fn get(self, handler: BoxedHandler) -> Self {
        self.on(RestMethod::Get, handler)
    }

    pub fn put(self, handler: BoxedHandler) -> Self {
        self.on(RestMethod::Put, handler)
    }

    pub fn post(self, handler: BoxedHandler) -> Self {
        self.on(RestMethod::Post, handler)
    }

    pub fn patch(self, handler: BoxedHandler) -> Self {
        self.on(RestMethod::Patch, handler)
    }

    pub fn delete(self, handler: BoxedHandler) -> Self {
        self.on(RestMethod::Delete, handler)
    }

    /// 설정(메시지와 `catch`)을 적용합니다.
    pub fn with_options(mut self, options: &Options) -> Result<Self, MiddlewareError> {
        self.config = options.parse()?;
        self.catch = options.catch().cloned();
        Ok(self)
    }

    pub fn config(&self) -> &RestConfig {
        &self.config
    }

    async fn dispatch(&self, req: &mut RequestContext, res: &mut ResponseContext) -> HandlerResult {
        let method = RestMethod::from_method(req.method()).ok_or_else(|| {
            MiddlewareError::UnsupportedMethod {
                method: req.method().to_string(),
                message: self.config.undefined_method.clone(),
            }
        })?;

        let handler = self.handlers.get(&method).ok_or_else(|| MiddlewareError::NotImplemented {
            method: req.method().to_string(),
            message: self.config.not_implemented.clone(),
        })?;

        debug!(method = ?method, path = %req.path(), "REST 핸들러 실행");
        handler.call(req, res).await
    }
}

#[async_trait]
impl Handler for Rest {
    async fn call(&self, req: &mut RequestContext, res: &mut ResponseContext) -> HandlerResult {
        match self.dispatch(req, res).await {
            Ok(()) => Ok(()),
            Err(err) => handle_error(req, res, err, self.catch.as_ref()).await,
        }
    }
}
