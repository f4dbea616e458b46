use std::fmt;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Body;
use hyper::header::{self, HeaderName, HeaderValue};
use hyper::{HeaderMap, Method, Request, Response, StatusCode, Uri};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 인증된 사용자 식별자 (숫자 또는 문자열)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(i64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Number(id) => write!(f, "{}", id),
            UserId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        UserId::Number(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        UserId::Text(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        UserId::Text(id)
    }
}

/// 요청 컨텍스트
///
/// 수신된 요청과 상위 미들웨어가 채워 넣는 값들(사용자 식별자, 사용자 객체,
/// TOTP 정보)을 함께 담습니다. 하위 방향으로만 수정됩니다.
#[derive(Debug)]
pub struct RequestContext {
    request: Request<Bytes>,
    request_id: String,
    /// 인증된 사용자 식별자
    pub uid: Option<UserId>,
    /// 인증 미들웨어가 반환한 사용자 객체
    pub user: Option<serde_json::Value>,
    /// 일회용 비밀번호 정보
    pub totp: Option<serde_json::Value>,
    middlewares: Vec<String>,
}

impl RequestContext {
    pub fn new(request: Request<Bytes>) -> Self {
        Self {
            request,
            request_id: Uuid::new_v4().to_string(),
            uid: None,
            user: None,
            totp: None,
            middlewares: Vec::new(),
        }
    }

    /// 임의의 body 타입을 가진 요청에서 body를 모두 수집하여 컨텍스트를 생성합니다.
    pub async fn from_request<B>(req: Request<B>) -> Result<Self, B::Error>
    where
        B: Body,
    {
        let (parts, body) = req.into_parts();
        let bytes = body.collect().await?.to_bytes();
        Ok(Self::new(Request::from_parts(parts, bytes)))
    }

    pub fn request(&self) -> &Request<Bytes> {
        &self.request
    }

    pub fn request_mut(&mut self) -> &mut Request<Bytes> {
        &mut self.request
    }

    pub fn method(&self) -> &Method {
        self.request.method()
    }

    pub fn uri(&self) -> &Uri {
        self.request.uri()
    }

    pub fn path(&self) -> &str {
        self.request.uri().path()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.request.headers()
    }

    /// 헤더 값을 대소문자 구분 없이 조회합니다.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    pub fn body(&self) -> &Bytes {
        self.request.body()
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn is_authenticated(&self) -> bool {
        self.uid.is_some()
    }

    /// 이 요청이 지나간 미들웨어 이름 목록 (실행 순서대로)
    pub fn middlewares(&self) -> &[String] {
        &self.middlewares
    }

    pub(crate) fn record_middleware(&mut self, name: &str) {
        self.middlewares.push(name.to_string());
    }
}

/// 응답 컨텍스트
///
/// 요청당 하나의 미들웨어 또는 최종 핸들러가 응답을 확정합니다.
/// 이미 확정된 응답에 다시 쓰는 것을 막지는 않습니다.
#[derive(Debug)]
pub struct ResponseContext {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    finalized: bool,
}

impl Default for ResponseContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseContext {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            finalized: false,
        }
    }

    pub fn status(&mut self, status: StatusCode) -> &mut Self {
        self.status = status;
        self
    }

    pub fn header(&mut self, name: HeaderName, value: HeaderValue) -> &mut Self {
        self.headers.insert(name, value);
        self
    }

    /// body를 설정하고 응답을 확정합니다.
    pub fn send(&mut self, body: impl Into<Bytes>) {
        self.body = body.into();
        self.finalized = true;
    }

    /// 값을 JSON으로 직렬화하여 응답을 확정합니다.
    pub fn json<T: Serialize>(&mut self, value: &T) -> Result<(), serde_json::Error> {
        let body = serde_json::to_vec(value)?;
        self.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        self.send(body);
        Ok(())
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}
