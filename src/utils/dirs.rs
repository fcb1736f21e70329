//! Directory-level helpers shared by container validators.

use std::collections::HashSet;
use std::path::Path;

use crate::dispatch;
use crate::error::{Result, ValidationError};
use crate::metadata::read_object_metadata;
use crate::options::Options;

/// Number of entries (files and subdirectories) directly inside a directory.
pub fn count_directory_entries(path: &Path) -> Result<usize> {
    let mut count = 0;
    for entry in std::fs::read_dir(path)? {
        entry?;
        count += 1;
    }
    Ok(count)
}

/// Read a `names.json` file holding an array of unique, non-empty strings.
/// Returns the names in order.
pub fn read_names_json(dir: &Path) -> Result<Vec<String>> {
    read_names_inner(dir).map_err(|e| {
        ValidationError::structure(format!(
            "invalid '{}/names.json' file; {}",
            dir.display(),
            e
        ))
    })
}

fn read_names_inner(dir: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read(dir.join("names.json"))?;
    let parsed: serde_json::Value = serde_json::from_slice(&contents)?;
    let serde_json::Value::Array(values) = parsed else {
        return Err(ValidationError::structure("expected an array".to_string()));
    };

    let mut names = Vec::with_capacity(values.len());
    let mut present = HashSet::with_capacity(values.len());
    for value in values {
        let serde_json::Value::String(name) = value else {
            return Err(ValidationError::structure(
                "expected an array of strings".to_string(),
            ));
        };
        if name.is_empty() {
            return Err(ValidationError::value(
                "name should not be an empty string".to_string(),
            ));
        }
        if !present.insert(name.clone()) {
            return Err(ValidationError::value(format!(
                "detected duplicated name '{}'",
                name
            )));
        }
        names.push(name);
    }

    Ok(names)
}

/// Validate an optional sibling directory that must satisfy the
/// `DATA_FRAME` interface with the given height, e.g., `element_annotations`.
pub fn validate_annotation_data_frame(path: &Path, expected: u64, options: &Options) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }

    let metadata = read_object_metadata(path)?;
    if !dispatch::satisfies_interface(&metadata.type_name, "DATA_FRAME", options) {
        return Err(ValidationError::dispatch(
            "expected an object that satisfies the 'DATA_FRAME' interface".to_string(),
        ));
    }
    dispatch::validate_with_metadata(path, &metadata, options)?;

    if dispatch::height_with_metadata(path, &metadata, options)? != expected {
        return Err(ValidationError::value("unexpected number of rows".to_string()));
    }
    Ok(())
}

/// Validate an optional sibling directory that must satisfy the
/// `SIMPLE_LIST` interface, e.g., `other_annotations`.
pub fn validate_annotation_list(path: &Path, options: &Options) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }

    let metadata = read_object_metadata(path)?;
    if !dispatch::satisfies_interface(&metadata.type_name, "SIMPLE_LIST", options) {
        return Err(ValidationError::dispatch(
            "expected an object that satisfies the 'SIMPLE_LIST' interface".to_string(),
        ));
    }
    dispatch::validate_with_metadata(path, &metadata, options)
}
