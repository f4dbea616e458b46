use std::{env, path::Path};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};
use crate::middleware::auth::{AuthConfig, AUTH_NAME};
use crate::middleware::guard::{GuardConfig, GUARD_NAME};
use crate::middleware::manager::REST_NAME;
use crate::middleware::rest::RestConfig;
use crate::middleware::Options;

pub mod logging;
mod error;

pub use logging::LogSettings;
pub use error::SettingsError;

pub type Result<T> = std::result::Result<T, SettingsError>;

pub const CONFIG_FILE_VAR: &str = "CHAIN_CONFIG_FILE";

/// 환경 변수를 읽어 파싱합니다. 값이 없으면 기본값을 사용합니다.
pub fn parse_env_var<T: std::str::FromStr, F: FnOnce() -> T>(name: &str, default: F) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(val) => val.parse().map_err(|e: T::Err| SettingsError::EnvVarInvalid {
            var_name: name.to_string(),
            value: val,
            reason: e.to_string(),
        }),
        Err(env::VarError::NotPresent) => Ok(default()),
        Err(e) => Err(SettingsError::EnvVarInvalid {
            var_name: name.to_string(),
            value: "".to_string(),
            reason: e.to_string(),
        }),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    // 로깅 설정
    #[serde(default)]
    pub logging: LogSettings,

    /// 미들웨어 이름별 설정
    #[serde(default)]
    pub middleware: Map<String, Value>,
}

impl Settings {
    pub async fn load() -> Result<Self> {
        if let Ok(config_path) = env::var(CONFIG_FILE_VAR) {
            Self::from_toml_file(&config_path).await
        } else {
            Self::from_env().await
        }
    }

    pub async fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| SettingsError::FileError {
            path: path.as_ref().to_string_lossy().to_string(),
            error: e,
        })?;

        let settings: Self = toml::from_str(&content)
            .map_err(|e| SettingsError::ParseError { source: e })?;
        settings.validate()?;

        info!(
            path = %path.as_ref().display(),
            middlewares = ?settings.middleware.keys().collect::<Vec<_>>(),
            "설정 파일 로드 완료"
        );
        Ok(settings)
    }

    pub async fn from_env() -> Result<Self> {
        let settings = Self {
            logging: LogSettings::from_env()?,
            middleware: Map::new(),
        };
        debug!(logging = ?settings.logging, "환경 변수 설정 로드 완료");
        Ok(settings)
    }

    /// 내장 미들웨어 슬롯이 올바른 형식인지 검증합니다.
    pub fn validate(&self) -> Result<()> {
        let options = self.options()?;
        if options.get(AUTH_NAME).is_some() {
            options.slot(AUTH_NAME).parse::<AuthConfig>()?;
        }
        if options.get(GUARD_NAME).is_some() {
            options.slot(GUARD_NAME).parse::<GuardConfig>()?;
        }
        if options.get(REST_NAME).is_some() {
            options.slot(REST_NAME).parse::<RestConfig>()?;
        }
        Ok(())
    }

    /// 미들웨어 설정을 `Options`로 변환합니다. `catch`는 코드에서만 지정할 수 있습니다.
    pub fn options(&self) -> Result<Options> {
        Ok(Options::from_json(Value::Object(self.middleware.clone()))?)
    }
}
