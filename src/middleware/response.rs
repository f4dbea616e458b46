use hyper::StatusCode;
use tracing::error;
use super::{BoxError, CatchHandler, HandlerResult, RequestContext, ResponseContext};

/// 기본 에러 응답 상태 코드
pub const DEFAULT_ERROR_STATUS: StatusCode = StatusCode::INTERNAL_SERVER_ERROR;

/// 기본 에러 응답 메시지 (에러 상세는 노출하지 않음)
pub const DEFAULT_ERROR_MESSAGE: &str = "An unexpected error occurred, please try again.";

/// 요청 처리 실패를 응답으로 변환합니다.
///
/// `catch`가 있으면 원본 에러를 그대로 넘겨 호출하고, 콜백 자체의 실패는
/// 다시 처리하지 않고 반환합니다. 없으면 에러를 로그로 남기고 500 응답을 확정합니다.
pub async fn handle_error(
    req: &mut RequestContext,
    res: &mut ResponseContext,
    err: BoxError,
    catch: Option<&CatchHandler>,
) -> HandlerResult {
    match catch {
        Some(catch) => catch.handle(req, res, err).await,
        None => {
            handle_default_error(req, res, &err);
            Ok(())
        }
    }
}

/// 에러를 로그로 남기고 기본 500 응답을 작성합니다.
pub fn handle_default_error(req: &RequestContext, res: &mut ResponseContext, err: &BoxError) {
    error!(
        request_id = %req.request_id(),
        method = %req.method(),
        path = %req.path(),
        middlewares = ?req.middlewares(),
        error = %err,
        "요청 처리 실패"
    );
    res.status(DEFAULT_ERROR_STATUS).send(DEFAULT_ERROR_MESSAGE);
}
