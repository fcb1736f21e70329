//! Validation for simple lists.

use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::list_contents;
use crate::metadata::ObjectMetadata;
use crate::options::Options;
use crate::utils::hdf5 as h5;
use crate::utils::json;
use crate::utils::version::check_major_version_1;

fn list_format(metadata: &ObjectMetadata) -> Result<String> {
    let obj = json::extract_typed_object(metadata, "simple_list")?;
    let vstring = json::extract_string(obj, "version")?;
    check_major_version_1(vstring)?;

    let format = json::optional_string(obj, "format")?.unwrap_or("hdf5");
    match format {
        "hdf5" | "json.gz" => Ok(format.to_string()),
        _ => Err(ValidationError::value(format!(
            "unknown 'simple_list.format' value '{}'",
            format
        ))),
    }
}

/// Enumerate `other_contents`, checking that the children index contiguously
/// from zero, and validate each as an object.
fn validate_other_contents(path: &Path, options: &Options) -> Result<u64> {
    let other_dir = path.join("other_contents");
    if !other_dir.exists() {
        return Ok(0);
    }
    if !other_dir.is_dir() {
        return Err(ValidationError::structure(
            "expected 'other_contents' to be a directory".to_string(),
        ));
    }

    let mut indices = Vec::new();
    for entry in std::fs::read_dir(&other_dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        let index: u64 = name.parse().map_err(|_| {
            ValidationError::structure(format!(
                "unexpected entry 'other_contents/{}'",
                name
            ))
        })?;
        indices.push(index);
    }

    indices.sort_unstable();
    let num_external = indices.len() as u64;
    if indices.iter().enumerate().any(|(i, &x)| i as u64 != x) {
        return Err(ValidationError::structure(
            "expected consecutive indices for entries of 'other_contents'".to_string(),
        ));
    }

    for index in 0..num_external {
        let child = other_dir.join(index.to_string());
        crate::dispatch::validate(&child, options).map_err(|e| {
            e.nested(format!(
                "failed to validate external list object at 'other_contents/{}'",
                index
            ))
        })?;
    }

    Ok(num_external)
}

fn resolved_length(path: &Path, format: &str, num_external: u64, options: &Options) -> Result<u64> {
    match format {
        "json.gz" => {
            let payload = path.join("list_contents.json.gz");
            if !payload.exists() {
                return Err(ValidationError::structure(
                    "expected a 'list_contents.json.gz' file".to_string(),
                ));
            }
            list_contents::json::validate_file(&payload, num_external)
        }
        _ => {
            let handle = h5::open_file(&path.join("list_contents.h5"))?;
            let ghandle = h5::open_group(&handle, "simple_list")?;
            list_contents::hdf5::validate(&ghandle, num_external, options)
        }
    }
}

pub fn validate(path: &Path, metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    let format = list_format(metadata)?;
    let num_external = validate_other_contents(path, options)?;
    let length = resolved_length(path, &format, num_external, options)?;

    let obj = json::extract_typed_object(metadata, "simple_list")?;
    if let Some(expected) = json::optional_count(obj, "length")? {
        if expected != length {
            return Err(ValidationError::value(format!(
                "length of the list ({}) does not match the 'simple_list.length' property ({})",
                length, expected
            )));
        }
    }

    Ok(())
}

pub fn height(path: &Path, metadata: &ObjectMetadata, options: &Options) -> Result<u64> {
    match list_format(metadata)?.as_str() {
        "json.gz" => {
            let reader = crate::utils::files::open_gzip(&path.join("list_contents.json.gz"))?;
            let parsed: serde_json::Value = serde_json::from_reader(reader)?;
            let serde_json::Value::Object(top) = &parsed else {
                return Err(ValidationError::structure(
                    "expected the list payload to be a JSON object".to_string(),
                ));
            };
            match top.get("values") {
                Some(serde_json::Value::Array(values)) => Ok(values.len() as u64),
                _ => Err(ValidationError::structure(
                    "expected a 'values' property".to_string(),
                )),
            }
        }
        _ => {
            let handle = h5::open_file(&path.join("list_contents.h5"))?;
            let ghandle = h5::open_group(&handle, "simple_list")?;
            list_contents::hdf5::list_length(&ghandle)
        }
    }
}
