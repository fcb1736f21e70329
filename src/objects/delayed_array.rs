//! Validation for delayed arrays.

use std::cell::Cell;
use std::path::Path;

use crate::delayed::{self, ArrayDetails, ArrayKind, GraphValidator};
use crate::error::{Result, ValidationError};
use crate::metadata::{read_object_metadata, ObjectMetadata};
use crate::options::Options;
use crate::utils::dirs;
use crate::utils::hdf5 as h5;
use crate::utils::json;
use crate::utils::version::check_major_version_1;

/// Leaf node type for seeds stored as sibling objects of the graph.
const SEED_ARRAY_TYPE: &str = "custom bioshelf seed array";

fn element_kind_of_seed(seed_path: &Path, type_name: &str, options: &Options) -> Result<Option<ArrayKind>> {
    let (file, group) = if crate::dispatch::derived_from(type_name, "dense_array", options) {
        ("array.h5", "dense_array")
    } else if crate::dispatch::derived_from(type_name, "compressed_sparse_matrix", options) {
        ("matrix.h5", "compressed_sparse_matrix")
    } else {
        return Ok(None);
    };

    let handle = h5::open_file(&seed_path.join(file))?;
    let ghandle = h5::open_group(&handle, group)?;
    let tstring = h5::load_scalar_string_attr(&ghandle, "type")?;
    let kind = tstring
        .parse()
        .map_err(|_| ValidationError::value(format!("unknown array type '{}'", tstring)))?;
    Ok(Some(kind))
}

fn validate_seed_reference(
    ghandle: &hdf5::Group,
    path: &Path,
    options: &Options,
    max_index: &Cell<u64>,
) -> Result<ArrayDetails> {
    let details = delayed::custom_array_details(ghandle)?;

    let ihandle = h5::open_dataset(ghandle, "index")?;
    h5::check_integer_fits(&ihandle, 64, false, "index")?;
    let index = ihandle.read_scalar::<u64>()?;

    let seed_path = path.join("seeds").join(index.to_string());
    let seed_meta = read_object_metadata(&seed_path)?;
    crate::dispatch::validate_with_metadata(&seed_path, &seed_meta, options)?;

    let seed_dims = crate::dispatch::dimensions_with_metadata(&seed_path, &seed_meta, options)?;
    if seed_dims.len() != details.dimensions.len() {
        return Err(ValidationError::value(format!(
            "dimensionality of 'seeds/{}' is not consistent with 'dimensions'",
            index
        )));
    }
    if seed_dims != details.dimensions {
        return Err(ValidationError::value(format!(
            "dimension extents of 'seeds/{}' are not consistent with 'dimensions'",
            index
        )));
    }

    if let Some(kind) = element_kind_of_seed(&seed_path, &seed_meta.type_name, options)? {
        if kind != details.kind {
            return Err(ValidationError::value(format!(
                "type of 'seeds/{}' is not consistent with 'type'",
                index
            )));
        }
    }

    if index + 1 > max_index.get() {
        max_index.set(index + 1);
    }
    Ok(details)
}

pub fn validate(path: &Path, metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    let vstring = json::extract_version_for_type(metadata, "delayed_array")?;
    check_major_version_1(&vstring)?;

    let max_index = Cell::new(0u64);
    let mut walker = GraphValidator::new(options);
    walker.array_validators.insert(
        SEED_ARRAY_TYPE.to_string(),
        Box::new(|ghandle| validate_seed_reference(ghandle, path, options, &max_index)),
    );
    walker.validate_file(&path.join("array.h5"), "delayed_array")?;

    let num_seeds = dirs::count_directory_entries(&path.join("seeds"))? as u64;
    if max_index.get() != num_seeds {
        return Err(ValidationError::value(
            "number of objects in 'seeds' is not consistent with the number of 'index' \
             references in 'array.h5'"
                .to_string(),
        ));
    }

    Ok(())
}

pub fn height(path: &Path, _metadata: &ObjectMetadata, options: &Options) -> Result<u64> {
    let walker = GraphValidator::new(options);
    let details = walker.validate_file(&path.join("array.h5"), "delayed_array")?;
    Ok(details.dimensions[0])
}

pub fn dimensions(path: &Path, _metadata: &ObjectMetadata, options: &Options) -> Result<Vec<u64>> {
    let walker = GraphValidator::new(options);
    let details = walker.validate_file(&path.join("array.h5"), "delayed_array")?;
    Ok(details.dimensions)
}
