use std::collections::HashMap;
use std::fs;
use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::middleware::{BoxError, MiddlewareError, RequestContext, UserId};
use super::config::{AuthConfig, AuthStrategy};
use super::middleware::AUTH_NAME;

/// Basic 인증을 위한 인증기 트레이트
///
/// # 지원하는 해시 알고리즘
/// - bcrypt ($2a$, $2b$, $2y$ 접두사)
pub trait Authenticator: Send + Sync {
    /// 사용자 자격증명을 검증합니다.
    fn verify_credentials(&self, username: &str, password: &str) -> bool;
    /// 자격증명을 로드합니다.
    fn load_credentials(&mut self) -> Result<(), MiddlewareError>;
}

/// 설정에 직접 지정된 사용자로 인증
pub struct StaticAuthenticator {
    users: HashMap<String, String>,
}

impl StaticAuthenticator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            users: config.users.clone(),
        }
    }
}

impl Authenticator for StaticAuthenticator {
    fn verify_credentials(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .map(|hash| verify_password(password, hash))
            .unwrap_or(false)
    }

    fn load_credentials(&mut self) -> Result<(), MiddlewareError> {
        Ok(()) // 이미 설정에서 로드됨
    }
}

/// .htpasswd 파일 기반 인증기
///
/// # 예시
/// ```text
/// # .htpasswd 파일 형식
/// user1:$2y$05$c4WoMPo3SXsafkva.HHa6uXQZWr7oboPiC2bT/r7q1BB8I2s0BRqC
/// user2:$2b$05$LgzK4lXJzxGHVoJ0KhO1E.eQE9L5.H4TD/w0Nz8cP6b/U.ik2M0FW
/// ```
pub struct HtpasswdAuthenticator {
    path: String,
    users: HashMap<String, String>,
}

impl HtpasswdAuthenticator {
    pub fn new(path: String) -> Self {
        Self {
            path,
            users: HashMap::new(),
        }
    }
}

impl Authenticator for HtpasswdAuthenticator {
    fn verify_credentials(&self, username: &str, password: &str) -> bool {
        if let Some(hash) = self.users.get(username) {
            verify_password(password, hash)
        } else {
            false
        }
    }

    fn load_credentials(&mut self) -> Result<(), MiddlewareError> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            MiddlewareError::config(AUTH_NAME, format!("Failed to read htpasswd file: {}", e))
        })?;

        self.users.clear();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((username, hash)) = line.split_once(':') {
                self.users.insert(username.to_string(), hash.to_string());
            }
        }

        Ok(())
    }
}

/// 비밀번호 검증 함수
fn verify_password(password: &str, hash: &str) -> bool {
    if hash.starts_with("$2") {
        bcrypt::verify(password, hash).unwrap_or(false)
    } else {
        // bcrypt가 아닌 해시는 지원하지 않음
        false
    }
}

/// 인증기 팩토리
pub fn create_authenticator(config: &AuthConfig) -> Result<Box<dyn Authenticator>, MiddlewareError> {
    match config.strategy {
        AuthStrategy::Basic => Ok(Box::new(StaticAuthenticator::new(config))),
        AuthStrategy::Htpasswd => {
            let path = config.htpasswd_path.clone().ok_or_else(|| {
                MiddlewareError::config(AUTH_NAME, "htpasswd_path is required")
            })?;
            let mut authenticator = HtpasswdAuthenticator::new(path);
            authenticator.load_credentials()?;
            Ok(Box::new(authenticator))
        }
        other => Err(MiddlewareError::config(
            AUTH_NAME,
            format!("Unsupported auth source: {:?}", other),
        )),
    }
}

/// 인증 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: UserId,
    #[serde(default)]
    pub user: Option<serde_json::Value>,
}

/// `custom` 전략에서 사용하는 인증기
///
/// 자격증명 헤더 값(없으면 `None`)과 요청을 받아 인증된 사용자를 반환합니다.
/// `None`을 반환하면 401 응답으로 처리됩니다.
#[async_trait]
pub trait CustomAuthenticator: Send + Sync {
    async fn authenticate(
        &self,
        header: Option<&str>,
        req: &RequestContext,
    ) -> Result<Option<Identity>, BoxError>;
}

struct FnAuthenticator<F>(F);

#[async_trait]
impl<F> CustomAuthenticator for FnAuthenticator<F>
where
    F: Fn(Option<&str>, &RequestContext) -> Option<Identity> + Send + Sync + 'static,
{
    async fn authenticate(
        &self,
        header: Option<&str>,
        req: &RequestContext,
    ) -> Result<Option<Identity>, BoxError> {
        Ok((self.0)(header, req))
    }
}

/// 동기 클로저로 `custom` 인증기를 만듭니다.
pub fn custom_auth_fn<F>(f: F) -> Arc<dyn CustomAuthenticator>
where
    F: Fn(Option<&str>, &RequestContext) -> Option<Identity> + Send + Sync + 'static,
{
    Arc::new(FnAuthenticator(f))
}
