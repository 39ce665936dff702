//! Body validators.
//!
//! A validator turns raw body bytes into a decoded JSON value. It is called
//! once by the probe and again by a refresh, so it must not have side effects.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub type ValidateBodyFn = Arc<dyn Fn(&[u8]) -> anyhow::Result<Value> + Send + Sync>;

pub fn validator<F>(f: F) -> ValidateBodyFn
where
    F: Fn(&[u8]) -> anyhow::Result<Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Accept any syntactically valid JSON document. Object keys come back
/// sorted, like a generic map would be written.
pub fn any_json() -> ValidateBodyFn {
    validator(|body| {
        let mut value: Value = serde_json::from_slice(body)?;
        value.sort_all_objects();
        Ok(value)
    })
}

/// Decode into `T`, then re-encode, so the fixture holds exactly what `T`
/// understands. Struct fields keep their declaration order.
pub fn json_validator<T>() -> ValidateBodyFn
where
    T: DeserializeOwned + Serialize + 'static,
{
    validator(|body| {
        let decoded: T = serde_json::from_slice(body)?;
        Ok(serde_json::to_value(decoded)?)
    })
}
