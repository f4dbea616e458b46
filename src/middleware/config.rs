use std::fmt;
use std::sync::Arc;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use super::{CatchHandler, MiddlewareError};

/// 에러 처리 콜백을 위해 예약된 설정 키
pub const CATCH_KEY: &str = "catch";

/// 미들웨어 설정 객체
///
/// 예약된 `catch` 슬롯과 미들웨어 이름별 설정 슬롯으로 구성됩니다.
/// 체인 구성 시 한 번 만들어진 뒤에는 변경되지 않습니다.
///
/// # 예시
///
/// ```
/// use handler_chain::middleware::Options;
/// use serde_json::json;
///
/// let base = Options::new()
///     .with("auth", json!({ "strategy": "basic", "realm": "api" }))
///     .with("guard", json!({ "status": 403 }));
/// let overrides = Options::new().with("auth", json!({ "strategy": "none" }));
///
/// let merged = base.merge(Some(&overrides));
/// // 슬롯 단위로 교체되며 필드 단위 병합은 하지 않습니다.
/// assert_eq!(merged.get("auth"), Some(&json!({ "strategy": "none" })));
/// assert_eq!(merged.get("guard"), Some(&json!({ "status": 403 })));
/// ```
#[derive(Clone, Default)]
pub struct Options {
    catch: Option<CatchHandler>,
    values: Map<String, Value>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catch(mut self, catch: CatchHandler) -> Self {
        self.catch = Some(catch);
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn catch(&self) -> Option<&CatchHandler> {
        self.catch.as_ref()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.catch.is_none() && self.values.is_empty()
    }

    /// 얕은 병합: `overrides`의 최상위 키가 같은 키를 통째로 교체합니다.
    pub fn merge(&self, overrides: Option<&Options>) -> Options {
        let mut merged = self.clone();
        if let Some(overrides) = overrides {
            if let Some(catch) = &overrides.catch {
                merged.catch = Some(catch.clone());
            }
            for (key, value) in &overrides.values {
                merged.values.insert(key.clone(), value.clone());
            }
        }
        merged
    }

    /// 미들웨어 이름에 해당하는 설정 슬롯을 꺼냅니다.
    ///
    /// 슬롯이 없거나 객체가 아니면 빈 설정을 반환합니다.
    /// 슬롯에는 `catch`가 포함되지 않습니다.
    pub fn slot(&self, name: &str) -> Options {
        let values = match self.values.get(name) {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };
        Options { catch: None, values }
    }

    /// 설정 값을 타입이 있는 설정 구조체로 변환합니다.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, MiddlewareError> {
        Ok(serde_json::from_value(Value::Object(self.values.clone()))?)
    }

    /// JSON 객체에서 설정을 생성합니다.
    pub fn from_json(value: Value) -> Result<Self, MiddlewareError> {
        match value {
            Value::Object(values) => Self::from_map(values),
            other => Err(MiddlewareError::config(
                "options",
                format!("설정은 객체여야 합니다: {}", other),
            )),
        }
    }

    /// TOML 문서에서 설정을 생성합니다.
    pub fn from_toml(config: &str) -> Result<Self, MiddlewareError> {
        let table: toml::Table = toml::from_str(config)?;
        let value = serde_json::to_value(table)?;
        Self::from_json(value)
    }

    pub(crate) fn from_map(values: Map<String, Value>) -> Result<Self, MiddlewareError> {
        // 콜백은 파일에서 읽을 수 없음
        if values.contains_key(CATCH_KEY) {
            return Err(MiddlewareError::ReservedName(CATCH_KEY.to_string()));
        }
        Ok(Self { catch: None, values })
    }
}

impl PartialEq for Options {
    fn eq(&self, other: &Self) -> bool {
        let same_catch = match (&self.catch, &other.catch) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        same_catch && self.values == other.values
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("catch", &self.catch.as_ref().map(|_| "<catch>"))
            .field("values", &self.values)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::catch_fn;
    use serde::Deserialize;
    use serde_json::json;

    fn catch_handler() -> CatchHandler {
        catch_fn(|_req, _res, _err| Box::pin(async move { Ok(()) }))
    }

    #[test]
    fn test_merge_is_right_biased_and_idempotent() {
        let a = Options::new()
            .with("auth", json!({ "strategy": "basic" }))
            .with("guard", json!({}));
        let b = Options::new().with("auth", json!({ "strategy": "none" }));

        let merged = a.merge(Some(&b));
        assert_eq!(merged.get("auth"), Some(&json!({ "strategy": "none" })));
        assert_eq!(merged.get("guard"), Some(&json!({})));
        assert_eq!(merged.merge(Some(&b)), merged);
    }

    #[test]
    fn test_merge_with_empty_override() {
        let a = Options::new()
            .with_catch(catch_handler())
            .with("x", json!(1));

        assert_eq!(a.merge(Some(&Options::new())), a);
        assert_eq!(a.merge(None), a);
    }

    #[test]
    fn test_merge_replaces_slot_without_deep_merge() {
        let base = Options::new().with("a", json!({ "x": 1, "y": 2 }));
        let overrides = Options::new().with("a", json!({ "x": 2 }));

        let merged = base.merge(Some(&overrides));
        assert_eq!(merged.slot("a").get("x"), Some(&json!(2)));
        assert_eq!(merged.slot("a").get("y"), None);
    }

    #[test]
    fn test_merge_catch() {
        let catch = catch_handler();
        let base = Options::new();
        let overrides = Options::new().with_catch(catch.clone());

        let merged = base.merge(Some(&overrides));
        assert!(Arc::ptr_eq(merged.catch().unwrap(), &catch));

        // 오버라이드에 catch가 없으면 기존 값 유지
        let kept = merged.merge(Some(&Options::new().with("k", json!(true))));
        assert!(Arc::ptr_eq(kept.catch().unwrap(), &catch));
    }

    #[test]
    fn test_slot_non_object_is_empty() {
        let options = Options::new().with("auth", json!("basic"));
        assert!(options.slot("auth").is_empty());
        assert!(options.slot("missing").is_empty());
    }

    #[test]
    fn test_parse_typed_slot() {
        #[derive(Deserialize)]
        struct Sample {
            realm: String,
            #[serde(default)]
            retries: u32,
        }

        let options = Options::new().with("auth", json!({ "realm": "api" }));
        let sample: Sample = options.slot("auth").parse().unwrap();
        assert_eq!(sample.realm, "api");
        assert_eq!(sample.retries, 0);
    }

    #[test]
    fn test_from_toml() {
        let toml_str = r#"
            [auth]
            strategy = "basic"
            realm = "Restricted Area"

            [auth.users]
            admin = "$2b$04$hash"

            [guard]
            status = 403
        "#;

        let options = Options::from_toml(toml_str).unwrap();
        assert_eq!(options.slot("auth").get("strategy"), Some(&json!("basic")));
        assert_eq!(options.slot("guard").get("status"), Some(&json!(403)));
        assert!(options.catch().is_none());
    }

    #[test]
    fn test_from_toml_rejects_catch_key() {
        let result = Options::from_toml("catch = \"handler\"");
        assert!(matches!(result, Err(MiddlewareError::ReservedName(_))));
    }

    #[test]
    fn test_from_json_requires_object() {
        assert!(Options::from_json(json!([1, 2])).is_err());
        assert!(Options::from_json(json!({ "rest": {} })).is_ok());
    }
}
