//! Public dispatch functions for validation, height and dimensions.

use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::metadata::{read_object_metadata, ObjectMetadata};
use crate::options::Options;
use crate::registry;

/// Validate an object in a subdirectory, using its `OBJECT` file to
/// determine the type.
///
/// Any lower-level error is wrapped with the object's type and path so that
/// failures deep inside nested objects report their full provenance.
pub fn validate(path: &Path, options: &Options) -> Result<()> {
    let metadata = read_object_metadata(path)?;
    validate_with_metadata(path, &metadata, options)
}

/// Validate an object in a subdirectory, based on already-read metadata.
pub fn validate_with_metadata(
    path: &Path,
    metadata: &ObjectMetadata,
    options: &Options,
) -> Result<()> {
    if !path.is_dir() {
        return Err(ValidationError::structure(format!(
            "expected '{}' to be a directory",
            path.display()
        )));
    }

    tracing::trace!(
        "validating a '{}' object at {:?}",
        metadata.type_name,
        path
    );

    if let Some(custom) = options.custom.validate.get(&metadata.type_name) {
        return custom(path, metadata, options)
            .map_err(|e| e.with_context(&metadata.type_name, path));
    }

    match registry::default_validate_registry().get(metadata.type_name.as_str()) {
        Some(function) => {
            function(path, metadata, options).map_err(|e| e.with_context(&metadata.type_name, path))
        }
        None => Err(ValidationError::dispatch(format!(
            "no registered 'validate' function for object type '{}' at '{}'",
            metadata.type_name,
            path.display()
        ))),
    }
}

/// Get the height of an object in a subdirectory, using its `OBJECT` file to
/// determine the type.
///
/// The height is the object's extent when it is stored in a vertical
/// container, e.g., a column of a `data_frame`.  For 1-dimensional objects
/// this is the length; for higher-dimensional objects it is the extent of
/// the first dimension.
pub fn height(path: &Path, options: &Options) -> Result<u64> {
    let metadata = read_object_metadata(path)?;
    height_with_metadata(path, &metadata, options)
}

/// Get the height of an object, based on already-read metadata.
pub fn height_with_metadata(
    path: &Path,
    metadata: &ObjectMetadata,
    options: &Options,
) -> Result<u64> {
    if let Some(custom) = options.custom.height.get(&metadata.type_name) {
        return custom(path, metadata, options);
    }

    match registry::default_height_registry().get(metadata.type_name.as_str()) {
        Some(function) => function(path, metadata, options),
        None => Err(ValidationError::dispatch(format!(
            "no registered 'height' function for object type '{}' at '{}'",
            metadata.type_name,
            path.display()
        ))),
    }
}

/// Get the dimensions of a multi-dimensional object in a subdirectory,
/// using its `OBJECT` file to determine the type.
pub fn dimensions(path: &Path, options: &Options) -> Result<Vec<u64>> {
    let metadata = read_object_metadata(path)?;
    dimensions_with_metadata(path, &metadata, options)
}

/// Get the dimensions of an object, based on already-read metadata.
pub fn dimensions_with_metadata(
    path: &Path,
    metadata: &ObjectMetadata,
    options: &Options,
) -> Result<Vec<u64>> {
    if let Some(custom) = options.custom.dimensions.get(&metadata.type_name) {
        return custom(path, metadata, options);
    }

    match registry::default_dimensions_registry().get(metadata.type_name.as_str()) {
        Some(function) => function(path, metadata, options),
        None => Err(ValidationError::dispatch(format!(
            "no registered 'dimensions' function for object type '{}' at '{}'",
            metadata.type_name,
            path.display()
        ))),
    }
}

/// Check whether an object type is derived from a base type, resolving the
/// derivation tables transitively over both the default and any
/// user-supplied entries.  A type is considered derived from itself.
pub fn derived_from(type_name: &str, base: &str, options: &Options) -> bool {
    if type_name == base {
        return true;
    }

    let defaults = registry::default_derived_from();
    let mut stack = vec![base.to_string()];
    let mut seen = std::collections::HashSet::new();

    while let Some(current) = stack.pop() {
        if !seen.insert(current.clone()) {
            continue;
        }
        let mut children: Vec<&str> = Vec::new();
        if let Some(set) = defaults.get(current.as_str()) {
            children.extend(set.iter().copied());
        }
        if let Some(set) = options.custom.derived_from.get(current.as_str()) {
            children.extend(set.iter().map(|x| x.as_str()));
        }
        for child in children {
            if child == type_name {
                return true;
            }
            stack.push(child.to_string());
        }
    }

    false
}

/// Check whether an object type satisfies an interface, either directly or
/// by derivation from a type that does.
pub fn satisfies_interface(type_name: &str, interface: &str, options: &Options) -> bool {
    let mut members: Vec<&str> = Vec::new();
    if let Some(set) = registry::default_satisfies_interface().get(interface) {
        members.extend(set.iter().copied());
    }
    if let Some(set) = options.custom.satisfies_interface.get(interface) {
        members.extend(set.iter().map(|x| x.as_str()));
    }

    members
        .iter()
        .any(|member| derived_from(type_name, member, options))
}
