use std::sync::Arc;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hyper::header::{self, HeaderValue};
use hyper::StatusCode;
use serde_json::json;
use tracing::debug;
use crate::middleware::{
    BoxedHandler, Handler, HandlerResult, Middleware, MiddlewareError, Options, RequestContext,
    ResponseContext, UserId,
};
use super::authenticator::{create_authenticator, Authenticator, CustomAuthenticator};
use super::config::{AuthConfig, AuthStrategy};

pub const AUTH_NAME: &str = "auth";

/// 인증 미들웨어
///
/// 인증에 성공하면 요청 컨텍스트에 `uid`와 `user`를 채우고 다음 핸들러를 호출합니다.
/// 실패하면 401 응답을 작성하고 체인을 종료합니다.
#[derive(Clone, Default)]
pub struct AuthMiddleware {
    custom: Option<Arc<dyn CustomAuthenticator>>,
}

impl AuthMiddleware {
    pub fn new() -> Self {
        Self::default()
    }

    /// `custom` 전략에서 사용할 인증기를 등록합니다.
    pub fn with_authenticator(mut self, authenticator: Arc<dyn CustomAuthenticator>) -> Self {
        self.custom = Some(authenticator);
        self
    }
}

impl Middleware for AuthMiddleware {
    fn name(&self) -> &str {
        AUTH_NAME
    }

    /// 설정을 해석하고 자격증명을 한 번 로드합니다. htpasswd 파일은 여기서만 읽습니다.
    fn wrap(&self, next: BoxedHandler, options: Arc<Options>) -> Result<BoxedHandler, MiddlewareError> {
        let config: AuthConfig = options.parse()?;

        let handler: BoxedHandler = match config.strategy {
            AuthStrategy::None => next,
            AuthStrategy::Basic | AuthStrategy::Htpasswd => {
                let authenticator = create_authenticator(&config)?;
                debug!(strategy = ?config.strategy, realm = %config.realm, "Basic 인증 자격증명 로드");
                Arc::new(BasicAuthHandler {
                    next,
                    authenticator,
                    realm: config.realm,
                    header: config.header,
                })
            }
            AuthStrategy::Custom => {
                let authenticator = self.custom.clone().ok_or_else(|| {
                    MiddlewareError::config(AUTH_NAME, "custom strategy requires an authenticator")
                })?;
                Arc::new(CustomAuthHandler {
                    next,
                    authenticator,
                    header: config.header,
                })
            }
        };
        Ok(handler)
    }
}

struct BasicAuthHandler {
    next: BoxedHandler,
    authenticator: Box<dyn Authenticator>,
    realm: String,
    header: String,
}

impl BasicAuthHandler {
    /// 401 Unauthorized 응답을 작성합니다.
    fn unauthorized(&self, res: &mut ResponseContext) {
        let challenge = HeaderValue::from_str(&format!("Basic realm=\"{}\"", self.realm))
            .unwrap_or_else(|_| HeaderValue::from_static("Basic"));
        res.status(StatusCode::UNAUTHORIZED)
            .header(header::WWW_AUTHENTICATE, challenge)
            .send("Unauthorized");
    }
}

#[async_trait]
impl Handler for BasicAuthHandler {
    async fn call(&self, req: &mut RequestContext, res: &mut ResponseContext) -> HandlerResult {
        let credentials = extract_credentials(req.header(&self.header));

        match credentials {
            Some((username, password)) if self.authenticator.verify_credentials(&username, &password) => {
                req.user = Some(json!({ "username": username }));
                req.uid = Some(UserId::Text(username));
                self.next.call(req, res).await
            }
            Some((username, _)) => {
                debug!(request_id = %req.request_id(), username = %username, "Invalid credentials");
                self.unauthorized(res);
                Ok(())
            }
            None => {
                debug!(request_id = %req.request_id(), "Missing or invalid Authorization header");
                self.unauthorized(res);
                Ok(())
            }
        }
    }
}

struct CustomAuthHandler {
    next: BoxedHandler,
    authenticator: Arc<dyn CustomAuthenticator>,
    header: String,
}

#[async_trait]
impl Handler for CustomAuthHandler {
    async fn call(&self, req: &mut RequestContext, res: &mut ResponseContext) -> HandlerResult {
        let header = req.header(&self.header).map(str::to_string);
        let identity = self
            .authenticator
            .authenticate(header.as_deref(), req)
            .await?;

        match identity {
            Some(identity) => {
                req.uid = Some(identity.uid);
                req.user = identity.user;
                self.next.call(req, res).await
            }
            None => {
                debug!(request_id = %req.request_id(), "Custom authentication rejected");
                res.status(StatusCode::UNAUTHORIZED).send("Unauthorized");
                Ok(())
            }
        }
    }
}

/// Authorization 헤더 값에서 Basic 자격증명을 추출합니다.
fn extract_credentials(value: Option<&str>) -> Option<(String, String)> {
    value
        .and_then(|auth| auth.strip_prefix("Basic "))
        .and_then(|credentials| BASE64.decode(credentials.trim()).ok())
        .and_then(|decoded| String::from_utf8(decoded).ok())
        .and_then(|pair| {
            let (username, password) = pair.split_once(':')?;
            Some((username.to_string(), password.to_string()))
        })
}
