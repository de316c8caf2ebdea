//! Failures of the browser shell. Gameplay itself never errors: falls, bad pairings
//! and stray inputs are ordinary state transitions or no-ops.

use wasm_bindgen::JsValue;

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("missing element #{0}")]
    MissingElement(String),
    #[error("2d canvas context unavailable")]
    Canvas2dUnavailable,
    #[error("javascript error: {0}")]
    Js(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl From<JsValue> for GameError {
    fn from(value: JsValue) -> Self {
        GameError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
