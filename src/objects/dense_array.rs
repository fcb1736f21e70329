//! Validation for dense arrays.

use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::metadata::ObjectMetadata;
use crate::options::Options;
use crate::utils::hdf5 as h5;
use crate::utils::version::check_major_version_1;

fn raw_dimensions(dhandle: &hdf5::Dataset) -> Vec<u64> {
    dhandle.shape().iter().map(|&d| d as u64).collect()
}

fn is_transposed(ghandle: &hdf5::Group) -> Result<bool> {
    if !h5::attr_exists(ghandle, "transposed")? {
        return Ok(false);
    }
    let attr = ghandle.attr("transposed")?;
    if attr.ndim() != 0 {
        return Err(ValidationError::structure(
            "expected 'transposed' attribute to be a scalar".to_string(),
        ));
    }
    if !h5::fits_integer(&h5::descriptor(&attr)?, 32, true) {
        return Err(ValidationError::structure(
            "expected 'transposed' attribute to have a datatype that fits in a 32-bit signed \
             integer"
                .to_string(),
        ));
    }
    Ok(attr.read_scalar::<i32>()? != 0)
}

pub fn validate(path: &Path, _metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    let handle = h5::open_file(&path.join("array.h5"))?;
    let ghandle = h5::open_group(&handle, "dense_array")?;

    let vstring = h5::load_scalar_string_attr(&ghandle, "version")?;
    check_major_version_1(&vstring)?;

    let dhandle = h5::open_dataset(&ghandle, "data")?;
    if dhandle.ndim() == 0 {
        return Err(ValidationError::structure(
            "expected 'data' to have at least one dimension".to_string(),
        ));
    }

    is_transposed(&ghandle)?;
    let dims = raw_dimensions(&dhandle);

    let atype = h5::load_scalar_string_attr(&ghandle, "type")?;
    match atype.as_str() {
        "integer" | "boolean" => {
            if !h5::fits_integer(&h5::descriptor(&dhandle)?, 32, true) {
                return Err(ValidationError::structure(
                    "expected a datatype for 'data' that fits in a 32-bit signed integer"
                        .to_string(),
                ));
            }
            h5::check_numeric_placeholder(&dhandle)?;
        }
        "number" => {
            h5::check_float64(&dhandle, "data")?;
            h5::check_numeric_placeholder(&dhandle)?;
        }
        "string" => {
            h5::check_string_type(&dhandle, "data")?;
            h5::load_string_placeholder(&dhandle)?;
            // Every cell must hold a loadable, valid string; scan the whole
            // dataset in bounded blocks.
            h5::scan_string_blocks_nd(&dhandle, options, |_| Ok(()))?;
        }
        _ => {
            return Err(ValidationError::value(format!(
                "unsupported type '{}'",
                atype
            )));
        }
    }

    if ghandle.link_exists("names") {
        h5::validate_dimnames(&ghandle, "names", &dims, options)
            .map_err(|e| e.nested("failed to validate dimnames for 'dense_array'"))?;
    }

    Ok(())
}

pub fn height(path: &Path, _metadata: &ObjectMetadata, _options: &Options) -> Result<u64> {
    let handle = h5::open_file(&path.join("array.h5"))?;
    let ghandle = h5::open_group(&handle, "dense_array")?;
    let dhandle = h5::open_dataset(&ghandle, "data")?;
    let dims = raw_dimensions(&dhandle);

    // The transposed flag selects which end of the extents is the height.
    let picked = if is_transposed(&ghandle)? {
        dims.last()
    } else {
        dims.first()
    };
    picked.copied().ok_or_else(|| {
        ValidationError::structure("expected 'data' to have at least one dimension".to_string())
    })
}

pub fn dimensions(path: &Path, _metadata: &ObjectMetadata, _options: &Options) -> Result<Vec<u64>> {
    let handle = h5::open_file(&path.join("array.h5"))?;
    let ghandle = h5::open_group(&handle, "dense_array")?;
    let dhandle = h5::open_dataset(&ghandle, "data")?;
    Ok(raw_dimensions(&dhandle))
}
