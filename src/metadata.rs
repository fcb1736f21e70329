//! Reading of per-directory `OBJECT` metadata files.

use std::path::Path;

use crate::error::{Result, ValidationError};

/// Object metadata, including the declared type and any other fields.
#[derive(Debug, Clone, Default)]
pub struct ObjectMetadata {
    /// Type of the object.
    pub type_name: String,
    /// Other fields, depending on the object type.  The per-type metadata
    /// is conventionally nested under a key equal to the type name.
    pub other: serde_json::Map<String, serde_json::Value>,
}

/// Reformat a parsed JSON document into object metadata.
///
/// The document must be a JSON object with a string `type` property; that
/// property is lifted out and all remaining properties are kept verbatim.
pub fn reformat_object_metadata(raw: serde_json::Value) -> Result<ObjectMetadata> {
    let serde_json::Value::Object(mut map) = raw else {
        return Err(ValidationError::structure("metadata should be a JSON object"));
    };

    let Some(type_value) = map.remove("type") else {
        return Err(ValidationError::structure(
            "metadata should have a 'type' property",
        ));
    };
    let serde_json::Value::String(type_name) = type_value else {
        return Err(ValidationError::structure(
            "metadata should have a 'type' string",
        ));
    };

    Ok(ObjectMetadata {
        type_name,
        other: map,
    })
}

/// Read the `OBJECT` file inside a directory to determine the object type.
pub fn read_object_metadata(path: &Path) -> Result<ObjectMetadata> {
    read_inner(path).map_err(|e| {
        ValidationError::structure(format!(
            "failed to read the OBJECT file at '{}'; {}",
            path.display(),
            e
        ))
    })
}

fn read_inner(path: &Path) -> Result<ObjectMetadata> {
    let contents = std::fs::read(path.join("OBJECT"))?;
    let raw: serde_json::Value = serde_json::from_slice(&contents)?;
    reformat_object_metadata(raw)
}
