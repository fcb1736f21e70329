//! Validation for compressed sparse matrices.

use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::metadata::ObjectMetadata;
use crate::options::Options;
use crate::utils::hdf5 as h5;
use crate::utils::version::check_major_version_1;

fn load_shape(ghandle: &hdf5::Group) -> Result<(u64, u64)> {
    let shandle = h5::open_dataset(ghandle, "shape")?;
    h5::check_integer_fits(&shandle, 64, false, "shape")?;
    if h5::get_1d_length(&shandle, "shape")? != 2 {
        return Err(ValidationError::structure(
            "expected the 'shape' dataset to be of length 2".to_string(),
        ));
    }
    let shape = shandle.read_1d::<u64>()?;
    Ok((shape[0], shape[1]))
}

pub fn validate(path: &Path, _metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    let handle = h5::open_file(&path.join("matrix.h5"))?;
    let ghandle = h5::open_group(&handle, "compressed_sparse_matrix")?;

    let vstring = h5::load_scalar_string_attr(&ghandle, "version")?;
    check_major_version_1(&vstring)?;

    let (num_rows, num_cols) = load_shape(&ghandle)?;

    let layout = h5::load_scalar_string_attr(&ghandle, "layout")?;
    let (primary, secondary) = match layout.as_str() {
        "CSC" => (num_cols, num_rows),
        "CSR" => (num_rows, num_cols),
        _ => {
            return Err(ValidationError::value(format!(
                "unknown layout '{}'",
                layout
            )));
        }
    };

    let dhandle = h5::open_dataset(&ghandle, "data")?;
    let num_nonzero = h5::get_1d_length(&dhandle, "data")?;

    let mtype = h5::load_scalar_string_attr(&ghandle, "type")?;
    match mtype.as_str() {
        "integer" | "boolean" => {
            if !h5::fits_integer(&h5::descriptor(&dhandle)?, 32, true) {
                return Err(ValidationError::structure(
                    "expected a datatype for 'data' that fits in a 32-bit signed integer"
                        .to_string(),
                ));
            }
        }
        "number" => h5::check_float64(&dhandle, "data")?,
        _ => {
            return Err(ValidationError::value(format!(
                "unsupported type '{}'",
                mtype
            )));
        }
    }
    h5::check_numeric_placeholder(&dhandle)?;

    // Offsets are materialized; their length is fixed by the primary
    // dimension, not the number of non-zero elements.
    let iphandle = h5::open_dataset(&ghandle, "indptr")?;
    h5::check_integer_fits(&iphandle, 64, false, "indptr")?;
    if h5::get_1d_length(&iphandle, "indptr")? != primary + 1 {
        return Err(ValidationError::structure(
            "'indptr' should have length equal to the primary dimension plus 1".to_string(),
        ));
    }
    let indptrs = iphandle.read_raw::<u64>()?;
    if indptrs[0] != 0 {
        return Err(ValidationError::value(
            "first entry of 'indptr' should be zero".to_string(),
        ));
    }
    if *indptrs.last().unwrap_or(&0) != num_nonzero {
        return Err(ValidationError::value(
            "last entry of 'indptr' should equal the number of non-zero elements".to_string(),
        ));
    }
    if indptrs.windows(2).any(|w| w[1] < w[0]) {
        return Err(ValidationError::value(
            "'indptr' should be sorted in increasing order".to_string(),
        ));
    }

    let ixhandle = h5::open_dataset(&ghandle, "indices")?;
    h5::check_integer_fits(&ixhandle, 64, false, "indices")?;
    if h5::get_1d_length(&ixhandle, "indices")? != num_nonzero {
        return Err(ValidationError::structure(
            "'data' and 'indices' should have the same length".to_string(),
        ));
    }

    // Stream over the indices, tracking the current primary slice; the
    // pointer also advances over empty slices landing on block boundaries.
    let mut which_ptr: usize = 0;
    let mut last_index: u64 = 0;
    let mut limit = indptrs[0];
    h5::scan_numeric_blocks::<u64, _>(&ixhandle, num_nonzero, options, |start, block| {
        let mut position = start;
        for &index in block {
            if index >= secondary {
                return Err(ValidationError::value(
                    "out-of-range index in 'indices'".to_string(),
                ));
            }

            if position == limit {
                // No need to count elements per slice here; indptr's final
                // entry is already known to equal the number of non-zeros.
                while position == limit {
                    which_ptr += 1;
                    limit = indptrs[which_ptr];
                }
            } else if last_index >= index {
                return Err(ValidationError::value(
                    "indices in 'indices' should be strictly increasing".to_string(),
                ));
            }

            last_index = index;
            position += 1;
        }
        Ok(())
    })?;

    if ghandle.link_exists("names") {
        h5::validate_dimnames(&ghandle, "names", &[num_rows, num_cols], options)
            .map_err(|e| e.nested("failed to validate dimnames for 'compressed_sparse_matrix'"))?;
    }

    Ok(())
}

pub fn height(path: &Path, _metadata: &ObjectMetadata, _options: &Options) -> Result<u64> {
    let handle = h5::open_file(&path.join("matrix.h5"))?;
    let ghandle = h5::open_group(&handle, "compressed_sparse_matrix")?;
    Ok(load_shape(&ghandle)?.0)
}

pub fn dimensions(path: &Path, _metadata: &ObjectMetadata, _options: &Options) -> Result<Vec<u64>> {
    let handle = h5::open_file(&path.join("matrix.h5"))?;
    let ghandle = h5::open_group(&handle, "compressed_sparse_matrix")?;
    let (num_rows, num_cols) = load_shape(&ghandle)?;
    Ok(vec![num_rows, num_cols])
}
