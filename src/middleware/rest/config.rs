use serde::{Deserialize, Serialize};

/// REST 디스패처 설정
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RestConfig {
    /// 지원하지 않는 HTTP 메서드로 요청했을 때의 에러 메시지
    #[serde(default = "default_undefined_method")]
    pub undefined_method: String,

    /// 핸들러가 등록되지 않은 메서드로 요청했을 때의 에러 메시지
    #[serde(default = "default_not_implemented")]
    pub not_implemented: String,
}

fn default_undefined_method() -> String {
    "Request method is not defined".to_string()
}

fn default_not_implemented() -> String {
    "Not Implemented".to_string()
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            undefined_method: default_undefined_method(),
            not_implemented: default_not_implemented(),
        }
    }
}
