//! Page-supplied configuration.
//!
//! The hosting page may set `window.orreryConfig` to an object overriding
//! any subset of [`OrreryConfig`] before the wasm module starts.

use orrery_core::OrreryConfig;
use wasm_bindgen::JsValue;

use crate::error::ClientError;

pub const CONFIG_KEY: &str = "orreryConfig";

pub fn load_config() -> Result<OrreryConfig, ClientError> {
    let window = web_sys::window().ok_or(ClientError::NoWindow)?;
    let value = js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_KEY)).map_err(|e| {
        ClientError::Js {
            key: CONFIG_KEY,
            message: format!("{e:?}"),
        }
    })?;
    config_from_value(value)
}

/// Missing or `null` means defaults.
pub fn config_from_value(value: JsValue) -> Result<OrreryConfig, ClientError> {
    if value.is_undefined() || value.is_null() {
        return Ok(OrreryConfig::default());
    }
    let config: OrreryConfig = serde_wasm_bindgen::from_value(value)?;
    config.validate()?;
    Ok(config)
}
