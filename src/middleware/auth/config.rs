use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// 인증 전략
///
/// # 설정 예시
///
/// ```toml
/// [auth]
/// strategy = "basic"
/// realm = "Restricted Area"
///
/// [auth.users]
/// admin = "$2y$05$..."
/// ```
///
/// ```toml
/// [auth]
/// strategy = "htpasswd"
/// htpasswd_path = "/etc/nginx/.htpasswd"
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthStrategy {
    /// 인증 없이 통과
    #[default]
    None,
    /// 설정에 직접 지정한 사용자 (bcrypt 해시)
    Basic,
    /// .htpasswd 파일
    Htpasswd,
    /// 코드에서 등록한 인증기
    Custom,
}

/// 인증 설정
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AuthConfig {
    #[serde(default)]
    pub strategy: AuthStrategy,

    /// 사용자 이름과 해시된 비밀번호 맵
    #[serde(default)]
    pub users: HashMap<String, String>,

    /// .htpasswd 파일 경로
    #[serde(default)]
    pub htpasswd_path: Option<String>,

    /// 인증 영역 (realm)
    #[serde(default = "default_realm")]
    pub realm: String,

    /// 자격증명을 읽을 헤더 이름
    #[serde(default = "default_header")]
    pub header: String,
}

fn default_realm() -> String {
    "Restricted Area".to_string()
}

fn default_header() -> String {
    "authorization".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            strategy: AuthStrategy::default(),
            users: HashMap::new(),
            htpasswd_path: None,
            realm: default_realm(),
            header: default_header(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::Options;
    use serde_json::json;

    #[test]
    fn test_auth_config_from_options() {
        let options = Options::new().with(
            "auth",
            json!({
                "strategy": "basic",
                "users": { "test": "$2b$04$hash" },
                "realm": "My Realm"
            }),
        );

        let config: AuthConfig = options.slot("auth").parse().unwrap();

        assert_eq!(config.strategy, AuthStrategy::Basic);
        assert_eq!(config.realm, "My Realm");
        assert_eq!(config.header, "authorization");
        assert_eq!(config.users.get("test").unwrap(), "$2b$04$hash");
    }

    #[test]
    fn test_auth_config_defaults() {
        let config: AuthConfig = Options::new().parse().unwrap();
        assert_eq!(config, AuthConfig::default());
        assert_eq!(config.strategy, AuthStrategy::None);
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        let options = Options::new().with("strategy", json!("oauth"));
        assert!(options.parse::<AuthConfig>().is_err());
    }
}
