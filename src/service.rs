//! hyper 요청과 핸들러 사이의 어댑터
//!
//! 리스너는 제공하지 않습니다. `ChainService`를 `hyper::server::conn::http1::Builder`에
//! 넘기거나 `dispatch`를 직접 호출합니다.

use std::future::Future;
use std::pin::Pin;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Body;
use hyper::service::Service;
use hyper::{Request, Response};
use tracing::{debug, error};
use crate::middleware::{BoxError, BoxedHandler, RequestContext, ResponseContext};

/// 요청 body를 수집해 핸들러를 실행하고 응답으로 변환합니다.
///
/// 에러 처리 경로 자체가 실패한 경우에만 에러를 반환합니다.
pub async fn dispatch<B>(
    handler: &BoxedHandler,
    req: Request<B>,
) -> Result<Response<Full<Bytes>>, BoxError>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let mut req = RequestContext::from_request(req)
        .await
        .map_err(Into::<BoxError>::into)?;
    let mut res = ResponseContext::new();

    debug!(
        request_id = %req.request_id(),
        method = %req.method(),
        path = %req.path(),
        "요청 처리 시작"
    );

    if let Err(e) = handler.call(&mut req, &mut res).await {
        error!(
            request_id = %req.request_id(),
            error = %e,
            "에러 처리 실패"
        );
        return Err(e);
    }

    if !res.is_finalized() {
        debug!(request_id = %req.request_id(), "응답 없이 처리 완료");
    }
    Ok(res.into_response())
}

/// 핸들러를 hyper 서비스로 감쌉니다.
#[derive(Clone)]
pub struct ChainService {
    handler: BoxedHandler,
}

impl ChainService {
    pub fn new(handler: BoxedHandler) -> Self {
        Self { handler }
    }
}

impl<B> Service<Request<B>> for ChainService
where
    B: Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    type Response = Response<Full<Bytes>>;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: Request<B>) -> Self::Future {
        let handler = self.handler.clone();
        Box::pin(async move { dispatch(&handler, req).await })
    }
}
