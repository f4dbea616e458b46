/// 미들웨어 구성 및 처리 중 발생하는 에러
#[derive(Debug, thiserror::Error)]
pub enum MiddlewareError {
    #[error("미들웨어 {middleware} 설정 오류: {message}")]
    Config {
        middleware: String,
        message: String,
    },

    #[error("예약된 이름은 미들웨어 이름으로 사용할 수 없음: {0}")]
    ReservedName(String),

    #[error("중복된 미들웨어 이름: {0}")]
    DuplicateMiddleware(String),

    #[error("{message} (method: {method})")]
    UnsupportedMethod {
        method: String,
        message: String,
    },

    #[error("{message} (method: {method})")]
    NotImplemented {
        method: String,
        message: String,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl MiddlewareError {
    pub(crate) fn config(middleware: &str, message: impl Into<String>) -> Self {
        Self::Config {
            middleware: middleware.to_string(),
            message: message.into(),
        }
    }
}
