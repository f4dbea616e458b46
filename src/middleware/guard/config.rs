use serde::{Deserialize, Serialize};

/// 가드 설정
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuardConfig {
    /// 인증된 요청(`uid` 존재)만 허용할지 여부
    #[serde(default = "default_require_auth")]
    pub require_auth: bool,

    /// 차단 시 응답 상태 코드
    #[serde(default = "default_status")]
    pub status: u16,

    /// 차단 시 응답 메시지
    #[serde(default = "default_message")]
    pub message: String,
}

fn default_require_auth() -> bool {
    true
}

fn default_status() -> u16 {
    403
}

fn default_message() -> String {
    "Forbidden".to_string()
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            require_auth: default_require_auth(),
            status: default_status(),
            message: default_message(),
        }
    }
}
