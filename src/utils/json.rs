//! Typed extraction from dynamic JSON metadata.

use serde_json::{Map, Value};

use crate::error::{Result, ValidationError};
use crate::metadata::ObjectMetadata;

/// Fetch a property that must be a JSON object.
pub fn extract_object<'a>(map: &'a Map<String, Value>, name: &str) -> Result<&'a Map<String, Value>> {
    match map.get(name) {
        None => Err(ValidationError::structure(format!(
            "expected a '{}' property",
            name
        ))),
        Some(Value::Object(inner)) => Ok(inner),
        Some(_) => Err(ValidationError::structure(format!(
            "expected '{}' property to be a JSON object",
            name
        ))),
    }
}

/// Fetch a property that must be a JSON string.
pub fn extract_string<'a>(map: &'a Map<String, Value>, name: &str) -> Result<&'a str> {
    match map.get(name) {
        None => Err(ValidationError::structure(format!(
            "expected a '{}' property",
            name
        ))),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(ValidationError::structure(format!(
            "expected '{}' property to be a JSON string",
            name
        ))),
    }
}

/// Fetch the nested metadata object for a given type, i.e., the property of
/// the `OBJECT` file keyed by the type name itself.
pub fn extract_typed_object<'a>(
    metadata: &'a ObjectMetadata,
    type_name: &str,
) -> Result<&'a Map<String, Value>> {
    extract_object(&metadata.other, type_name).map_err(|e| {
        ValidationError::structure(format!(
            "failed to extract '{}' from the object metadata; {}",
            type_name, e
        ))
    })
}

/// Fetch the `<type>.version` string from the object metadata.
pub fn extract_version_for_type(metadata: &ObjectMetadata, type_name: &str) -> Result<String> {
    let inner = || -> Result<String> {
        let obj = extract_object(&metadata.other, type_name)?;
        Ok(extract_string(obj, "version")?.to_string())
    };
    inner().map_err(|e| {
        ValidationError::structure(format!(
            "failed to extract '{}.version' from the object metadata; {}",
            type_name, e
        ))
    })
}

/// Fetch a property that must be a non-negative integer, e.g., a length.
pub fn extract_count(map: &Map<String, Value>, name: &str) -> Result<u64> {
    match map.get(name) {
        None => Err(ValidationError::structure(format!(
            "expected a '{}' property",
            name
        ))),
        Some(Value::Number(num)) => as_count(num, name),
        Some(_) => Err(ValidationError::structure(format!(
            "expected '{}' property to be a JSON number",
            name
        ))),
    }
}

/// Like [`extract_count`] but tolerating an absent property.
pub fn optional_count(map: &Map<String, Value>, name: &str) -> Result<Option<u64>> {
    match map.get(name) {
        None => Ok(None),
        Some(Value::Number(num)) => as_count(num, name).map(Some),
        Some(_) => Err(ValidationError::structure(format!(
            "expected '{}' property to be a JSON number",
            name
        ))),
    }
}

fn as_count(num: &serde_json::Number, name: &str) -> Result<u64> {
    if let Some(x) = num.as_u64() {
        return Ok(x);
    }
    // Writers in some languages emit integral floats, e.g., 5.0.
    if let Some(x) = num.as_f64() {
        if x >= 0.0 && x.fract() == 0.0 && x <= u64::MAX as f64 {
            return Ok(x as u64);
        }
    }
    Err(ValidationError::value(format!(
        "expected '{}' to be a non-negative integer",
        name
    )))
}

/// Fetch an optional boolean property, defaulting to `false`.
pub fn optional_bool(map: &Map<String, Value>, name: &str) -> Result<bool> {
    match map.get(name) {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(ValidationError::structure(format!(
            "expected '{}' property to be a JSON boolean",
            name
        ))),
    }
}

/// Fetch an optional string property.
pub fn optional_string<'a>(map: &'a Map<String, Value>, name: &str) -> Result<Option<&'a str>> {
    match map.get(name) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(ValidationError::structure(format!(
            "expected '{}' property to be a JSON string",
            name
        ))),
    }
}
