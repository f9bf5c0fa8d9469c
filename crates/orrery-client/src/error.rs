use orrery_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no browser window")]
    NoWindow,
    #[error("reading window.{key}: {message}")]
    Js { key: &'static str, message: String },
    #[error("config object: {0}")]
    Decode(#[from] serde_wasm_bindgen::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
