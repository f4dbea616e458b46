//! 인증 미들웨어
//!
//! `none`, `basic`, `htpasswd`, `custom` 전략을 지원합니다.

mod authenticator;
mod config;
mod middleware;

pub use authenticator::{
    create_authenticator, custom_auth_fn, Authenticator, CustomAuthenticator, HtpasswdAuthenticator,
    Identity, StaticAuthenticator,
};
pub use config::{AuthConfig, AuthStrategy};
pub use middleware::{AuthMiddleware, AUTH_NAME};
