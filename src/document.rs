//! Divi JSON export documents.
//!
//! An export looks like
//!
//! ```json
//! {
//!   "context": "et_builder",
//!   "data": { "123": "[et_pb_section …]…" },
//!   "presets": { … },
//!   "global_colors": [ … ],
//!   "images": [ … ],
//!   "thumbnails": [ … ]
//! }
//! ```
//!
//! Every string in `data` is run through [`transform_markup`]. Preset,
//! colour and image tables refer to the site the export came from and are
//! cleared so they do not clobber the target site on import.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::log_sink::LogSink;
use crate::settings::Settings;
use crate::transform::transform_markup;

/// Fields cleared to an empty object.
const CLEARED_OBJECTS: &[&str] = &["presets", "global_colors"];
/// Fields cleared to an empty array.
const CLEARED_ARRAYS: &[&str] = &["images", "thumbnails"];

/// Transform all markup fields of an export document.
///
/// The first failing field aborts the whole document.
pub fn transform_document(document: &Value, settings: &Settings, log: &mut dyn LogSink) -> Result<Value> {
    let Value::Object(root) = document else {
        return Err(Error::InvalidDocument("top level is not an object".into()));
    };
    let mut root = root.clone();

    match root.get_mut("data") {
        Some(Value::Object(fields)) => transform_fields(fields, settings, log)?,
        Some(_) => return Err(Error::InvalidDocument("'data' is not an object".into())),
        None => log::warn!("document has no 'data' field"),
    }

    for &name in CLEARED_OBJECTS {
        root.insert(name.to_string(), Value::Object(Map::new()));
    }
    for &name in CLEARED_ARRAYS {
        root.insert(name.to_string(), Value::Array(Vec::new()));
    }
    Ok(Value::Object(root))
}

fn transform_fields(fields: &mut Map<String, Value>, settings: &Settings, log: &mut dyn LogSink) -> Result<()> {
    for (name, value) in fields.iter_mut() {
        let result = match &*value {
            Value::String(markup) => transform_markup(markup, settings, log),
            other => Err(Error::InvalidDocument(format!(
                "expected a markup string, found {}",
                json_kind(other)
            ))),
        };
        match result {
            Ok(markup) => *value = Value::String(markup),
            Err(err) => {
                log.log(&format!("Error processing field '{name}': {err}"));
                return Err(Error::Field {
                    field: name.clone(),
                    source: Box::new(err),
                });
            }
        }
    }
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse, transform and pretty-print an export document.
pub fn transform_json(input: &str, settings: &Settings, log: &mut dyn LogSink) -> Result<String> {
    let document: Value = serde_json::from_str(input)?;
    let transformed = transform_document(&document, settings, log)?;
    Ok(serde_json::to_string_pretty(&transformed)?)
}
