use std::sync::Arc;
use async_trait::async_trait;
use futures_util::future::BoxFuture;
use super::{MiddlewareError, Options, RequestContext, ResponseContext};

/// 핸들러와 미들웨어가 전파하는 에러 값
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type HandlerResult = Result<(), BoxError>;

/// 공유 가능한 핸들러
pub type BoxedHandler = Arc<dyn Handler>;

/// 에러 처리 콜백 (`catch` 슬롯)
pub type CatchHandler = Arc<dyn ErrorHandler>;

/// 요청 처리 단위
///
/// 최종 비즈니스 핸들러이거나 미들웨어가 감싼 핸들러입니다.
/// 내부 상태 없이 요청/응답 컨텍스트만으로 동작해야 합니다.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, req: &mut RequestContext, res: &mut ResponseContext) -> HandlerResult;
}

/// 미들웨어 트레이트
///
/// 하위 핸들러와 설정을 받아 새 핸들러를 만드는 2단계 구조입니다.
pub trait Middleware: Send + Sync {
    /// 미들웨어의 고유 이름을 반환합니다. 설정 슬롯 조회 키로 사용됩니다.
    fn name(&self) -> &str;

    /// `next`를 감싼 핸들러를 생성합니다.
    ///
    /// 체인 또는 팩토리 구성 시점에 한 번 호출됩니다. 설정 해석과 자격증명 로드는
    /// 여기서 끝내야 하며, 잘못된 설정은 구성 에러로 반환합니다.
    /// 반환된 핸들러가 `next`를 호출하지 않으면 체인이 그 자리에서 종료됩니다.
    fn wrap(&self, next: BoxedHandler, options: Arc<Options>) -> Result<BoxedHandler, MiddlewareError>;
}

/// 실패를 응답으로 변환하는 콜백
#[async_trait]
pub trait ErrorHandler: Send + Sync {
    async fn handle(
        &self,
        req: &mut RequestContext,
        res: &mut ResponseContext,
        error: BoxError,
    ) -> HandlerResult;
}

struct FnHandler<F>(F);

#[async_trait]
impl<F> Handler for FnHandler<F>
where
    F: for<'a> Fn(&'a mut RequestContext, &'a mut ResponseContext) -> BoxFuture<'a, HandlerResult>
        + Send
        + Sync
        + 'static,
{
    async fn call(&self, req: &mut RequestContext, res: &mut ResponseContext) -> HandlerResult {
        (self.0)(req, res).await
    }
}

/// 클로저를 핸들러로 변환합니다.
///
/// ```
/// use handler_chain::middleware::handler_fn;
/// use hyper::StatusCode;
///
/// let handler = handler_fn(|_req, res| Box::pin(async move {
///     res.status(StatusCode::OK).send("ok");
///     Ok(())
/// }));
/// ```
pub fn handler_fn<F>(f: F) -> BoxedHandler
where
    F: for<'a> Fn(&'a mut RequestContext, &'a mut ResponseContext) -> BoxFuture<'a, HandlerResult>
        + Send
        + Sync
        + 'static,
{
    Arc::new(FnHandler(f))
}

struct FnErrorHandler<F>(F);

#[async_trait]
impl<F> ErrorHandler for FnErrorHandler<F>
where
    F: for<'a> Fn(&'a mut RequestContext, &'a mut ResponseContext, BoxError) -> BoxFuture<'a, HandlerResult>
        + Send
        + Sync
        + 'static,
{
    async fn handle(
        &self,
        req: &mut RequestContext,
        res: &mut ResponseContext,
        error: BoxError,
    ) -> HandlerResult {
        (self.0)(req, res, error).await
    }
}

/// 클로저를 `catch` 콜백으로 변환합니다.
pub fn catch_fn<F>(f: F) -> CatchHandler
where
    F: for<'a> Fn(&'a mut RequestContext, &'a mut ResponseContext, BoxError) -> BoxFuture<'a, HandlerResult>
        + Send
        + Sync
        + 'static,
{
    Arc::new(FnErrorHandler(f))
}

struct FnMiddleware<F> {
    name: String,
    f: F,
}

impl<F> Middleware for FnMiddleware<F>
where
    F: Fn(BoxedHandler, Arc<Options>) -> BoxedHandler + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn wrap(&self, next: BoxedHandler, options: Arc<Options>) -> Result<BoxedHandler, MiddlewareError> {
        Ok((self.f)(next, options))
    }
}

/// 이름과 클로저로 미들웨어를 생성합니다.
pub fn middleware_fn<F>(name: impl Into<String>, f: F) -> Arc<dyn Middleware>
where
    F: Fn(BoxedHandler, Arc<Options>) -> BoxedHandler + Send + Sync + 'static,
{
    Arc::new(FnMiddleware {
        name: name.into(),
        f,
    })
}
