//! Shared validation for bumpy arrays.
//!
//! A bumpy array is an N-dimensional arrangement of variable-length
//! partitions, stored as a concatenated child plus a `lengths` vector.  In
//! the dense mode there is one partition per array element in row-major
//! order; in the sparse mode per-dimension `indices` datasets give the
//! coordinate of each partition.

use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::objects::compressed_list::{self, ChildRule};
use crate::options::Options;
use crate::utils::dirs;
use crate::utils::hdf5 as h5;
use crate::utils::version::check_major_version_1;

fn load_dimensions(ghandle: &hdf5::Group) -> Result<Vec<u64>> {
    let dhandle = h5::open_dataset(ghandle, "dimensions")?;
    h5::check_integer_fits(&dhandle, 64, false, "dimensions")?;
    h5::get_1d_length(&dhandle, "dimensions")?;
    Ok(dhandle.read_raw::<u64>()?)
}

fn validate_sparse_indices(
    ghandle: &hdf5::Group,
    dimensions: &[u64],
    num_partitions: u64,
    options: &Options,
) -> Result<()> {
    let ihandle = h5::open_group(ghandle, "indices")?;

    let mut handles = Vec::with_capacity(dimensions.len());
    for (d, &extent) in dimensions.iter().enumerate() {
        let dname = d.to_string();
        let dhandle = h5::open_dataset(&ihandle, &dname)?;
        h5::check_integer_fits(&dhandle, 64, false, &format!("indices/{}", dname))?;
        if h5::get_1d_length(&dhandle, &dname)? != num_partitions {
            return Err(ValidationError::structure(format!(
                "expected 'indices/{}' to have the same length as 'lengths'",
                dname
            )));
        }
        handles.push((dhandle, extent, dname));
    }

    // Coordinates must be sorted in strictly increasing row-major order,
    // which also guarantees that no two partitions share a coordinate.
    let step = options.hdf5_buffer_size.max(1) as u64;
    let mut previous: Option<Vec<u64>> = None;
    let mut start = 0;
    while start < num_partitions {
        let end = (start + step).min(num_partitions);
        let mut columns = Vec::with_capacity(handles.len());
        for (dhandle, extent, dname) in &handles {
            let block =
                dhandle.read_slice_1d::<u64, _>(ndarray::s![start as usize..end as usize])?;
            if block.iter().any(|&x| x >= *extent) {
                return Err(ValidationError::value(format!(
                    "entries of 'indices/{}' should be less than the corresponding dimension \
                     extent",
                    dname
                )));
            }
            columns.push(block);
        }

        for i in 0..(end - start) as usize {
            let coordinate: Vec<u64> = columns.iter().map(|column| column[i]).collect();
            if let Some(previous) = &previous {
                if *previous >= coordinate {
                    return Err(ValidationError::value(
                        "partition coordinates should be unique and sorted".to_string(),
                    ));
                }
            }
            previous = Some(coordinate);
        }

        start = end;
    }

    Ok(())
}

pub(crate) fn validate_directory(
    path: &Path,
    group_name: &str,
    rule: ChildRule,
    options: &Options,
) -> Result<()> {
    let handle = h5::open_file(&path.join("partitions.h5"))?;
    let ghandle = h5::open_group(&handle, group_name)?;

    let vstring = h5::load_scalar_string_attr(&ghandle, "version")?;
    check_major_version_1(&vstring)?;

    let dimensions = load_dimensions(&ghandle)?;

    let catdir = path.join("concatenated");
    compressed_list::check_child(&catdir, &rule, options)?;
    let concatenated_height = crate::dispatch::height(&catdir, options)?;
    let num_partitions = compressed_list::validate_lengths(&ghandle, concatenated_height, options)?;

    if ghandle.link_exists("indices") {
        validate_sparse_indices(&ghandle, &dimensions, num_partitions, options)?;
    } else {
        let product = dimensions
            .iter()
            .try_fold(1u64, |acc, &d| acc.checked_mul(d))
            .ok_or_else(|| {
                ValidationError::value(
                    "product of 'dimensions' overflows a 64-bit integer".to_string(),
                )
            })?;
        if num_partitions != product {
            return Err(ValidationError::value(
                "length of 'lengths' should equal the product of 'dimensions'".to_string(),
            ));
        }
    }

    if ghandle.link_exists("names") {
        h5::validate_dimnames(&ghandle, "names", &dimensions, options)
            .map_err(|e| e.nested(format!("failed to validate dimnames for '{}'", group_name)))?;
    }

    dirs::validate_annotation_data_frame(&path.join("element_annotations"), num_partitions, options)
        .map_err(|e| e.nested("failed to validate 'element_annotations'"))?;
    dirs::validate_annotation_list(&path.join("other_annotations"), options)
        .map_err(|e| e.nested("failed to validate 'other_annotations'"))?;

    Ok(())
}

pub(crate) fn height(path: &Path, group_name: &str) -> Result<u64> {
    Ok(dimensions(path, group_name)?[0])
}

pub(crate) fn dimensions(path: &Path, group_name: &str) -> Result<Vec<u64>> {
    let handle = h5::open_file(&path.join("partitions.h5"))?;
    let ghandle = h5::open_group(&handle, group_name)?;
    let dims = load_dimensions(&ghandle)?;
    if dims.is_empty() {
        return Err(ValidationError::structure(
            "expected 'dimensions' to be non-empty".to_string(),
        ));
    }
    Ok(dims)
}
