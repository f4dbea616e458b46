use std::path::Path;
use hyper::StatusCode;
use tracing::{error, info, span, warn, Level};
use tracing_subscriber::EnvFilter;
use crate::middleware::{BoxError, RequestContext};
use crate::settings::logging::{LogFormat, LogOutput, LogSettings};

/// 설정에 따라 전역 tracing 구독자를 설치합니다.
pub fn init_logging(settings: &LogSettings) -> Result<(), BoxError> {
    let filter = EnvFilter::from_default_env().add_directive(settings.level.into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    match (&settings.format, &settings.output) {
        (LogFormat::Text, LogOutput::Stdout) => builder.try_init(),
        (LogFormat::Json, LogOutput::Stdout) => builder.json().try_init(),
        (LogFormat::Text, LogOutput::File(path)) => builder
            .with_ansi(false)
            .with_writer(file_appender(path))
            .try_init(),
        (LogFormat::Json, LogOutput::File(path)) => builder
            .json()
            .with_writer(file_appender(path))
            .try_init(),
    }
}

fn file_appender(path: &str) -> tracing_appender::rolling::RollingFileAppender {
    let path = Path::new(path);
    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "handler_chain.log".into());
    tracing_appender::rolling::never(directory, file_name)
}

#[derive(Debug)]
pub struct RequestLog {
    pub request_id: String,
    pub method: String,
    pub path: String,
    pub status_code: u16,
    pub duration_ms: u64,
    pub middlewares: Vec<String>,
    pub error: Option<String>,
}

impl RequestLog {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            method: String::new(),
            path: String::new(),
            status_code: 0,
            duration_ms: 0,
            middlewares: Vec::new(),
            error: None,
        }
    }

    pub fn with_request(&mut self, req: &RequestContext) {
        self.method = req.method().to_string();
        self.path = req.path().to_string();

        info!(
            request_id = %self.request_id,
            method = %self.method,
            path = %self.path,
            "Received request"
        );
    }

    pub fn with_response(&mut self, status: StatusCode) {
        self.status_code = status.as_u16();
    }

    pub fn with_error(&mut self, error: impl std::fmt::Display) {
        let error_msg = error.to_string();
        error!(
            request_id = %self.request_id,
            error = %error_msg,
            "Request error occurred"
        );
        self.error = Some(error_msg);
    }
}

pub fn log_request(log: &RequestLog) {
    let level = if log.error.is_some() {
        Level::ERROR
    } else if log.status_code >= 400 {
        Level::WARN
    } else {
        Level::INFO
    };

    let span = span!(
        Level::INFO,
        "request",
        request_id = %log.request_id,
        method = %log.method,
        path = %log.path,
        status = %log.status_code,
        duration_ms = %log.duration_ms
    );
    let _enter = span.enter();

    match level {
        Level::ERROR => error!(
            middlewares = ?log.middlewares,
            error = ?log.error,
            "Request failed"
        ),
        Level::WARN => warn!(
            middlewares = ?log.middlewares,
            "Request completed with warning"
        ),
        _ => info!(
            middlewares = ?log.middlewares,
            "Request completed successfully"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use hyper::Request;

    #[test]
    fn test_request_log_fields() {
        let req = RequestContext::new(
            Request::builder()
                .method("PATCH")
                .uri("/users/1?x=1")
                .body(Bytes::new())
                .unwrap(),
        );
        let mut log = RequestLog::new(req.request_id());
        log.with_request(&req);
        log.with_response(StatusCode::NO_CONTENT);

        assert_eq!(log.method, "PATCH");
        assert_eq!(log.path, "/users/1");
        assert_eq!(log.status_code, 204);
        assert!(log.error.is_none());

        log.with_error("boom");
        assert_eq!(log.error.as_deref(), Some("boom"));
        log_request(&log);
    }
}
