//! WASM bindings for in-browser transformation.
//!
//! This module exposes the export transformation to JavaScript via wasm-bindgen.

use wasm_bindgen::prelude::*;

use crate::document;
use crate::log_sink::FallibleSink;
use crate::settings::Settings;

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Transform a Divi JSON export.
///
/// `settings_json` uses the same keys as the settings form; an empty string
/// means default settings. Every progress line is passed to `log` as a
/// single string argument; an exception thrown by the callback is logged and
/// does not stop the transformation. Returns the pretty-printed transformed
/// export.
#[wasm_bindgen]
pub fn transform_json(input: &str, settings_json: &str, on_log: &js_sys::Function) -> Result<String, JsValue> {
    let settings = if settings_json.trim().is_empty() {
        Settings::default()
    } else {
        Settings::from_json(settings_json).map_err(|e| JsValue::from_str(&e.to_string()))?
    };

    let mut sink = FallibleSink::new(|line: &str| {
        on_log
            .call1(&JsValue::NULL, &JsValue::from_str(line))
            .map(drop)
    });
    document::transform_json(input, &settings, &mut sink).map_err(|e| JsValue::from_str(&e.to_string()))
}
