//! Errors raised while setting up a zoom service.

use mediazoom_core::ConfigError;
use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum ZoomError {
    #[error("No global window")]
    NoWindow,

    #[error("Window has no document")]
    NoDocument,

    #[error("Document has no body")]
    NoBody,

    #[error("DOM operation failed: {0}")]
    Dom(String),

    #[error("Invalid zoom options: {0}")]
    InvalidOptions(String),
}

impl From<JsValue> for ZoomError {
    fn from(value: JsValue) -> Self {
        ZoomError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<ConfigError> for ZoomError {
    fn from(err: ConfigError) -> Self {
        ZoomError::InvalidOptions(err.to_string())
    }
}

impl From<ZoomError> for JsValue {
    fn from(err: ZoomError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
