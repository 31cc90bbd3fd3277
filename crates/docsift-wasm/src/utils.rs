//! Utility functions for WASM bindings to reduce boilerplate.

use js_sys::Object;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[macro_export]
macro_rules! js_err {
    ($msg:expr) => {
        JsValue::from_str($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        JsValue::from_str(&format!($fmt, $($arg)*))
    };
}

/// Serialize a value into a plain JavaScript object.
pub fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| js_err!("Failed to serialize result: {}", e))
}

/// Ticket numbers cross the boundary as JS numbers.
pub fn ticket_from_js(value: f64) -> Result<u64, JsValue> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        return Err(js_err!("Invalid fetch ticket: {}", value));
    }
    Ok(value as u64)
}

/// Helper for building JavaScript objects.
pub struct JsObjectBuilder {
    obj: Object,
}

impl JsObjectBuilder {
    pub fn new() -> Self {
        Self { obj: Object::new() }
    }

    pub fn set(self, key: &str, value: JsValue) -> Result<Self, JsValue> {
        js_sys::Reflect::set(&self.obj, &JsValue::from_str(key), &value)
            .map_err(|e| js_err!("Failed to set property '{}': {:?}", key, e))?;
        Ok(self)
    }

    pub fn build(self) -> JsValue {
        self.obj.into()
    }
}
