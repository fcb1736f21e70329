//! Shared validation for compressed lists.
//!
//! A compressed list stores the concatenation of all its partitions as a
//! single child object in `concatenated/`, plus a `lengths` vector that
//! slices the child back into partitions.

use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::metadata::read_object_metadata;
use crate::options::Options;
use crate::utils::dirs;
use crate::utils::hdf5 as h5;
use crate::utils::version::check_major_version_1;

/// Constraint on the type of the concatenated child.
pub(crate) enum ChildRule {
    /// The child's type name must match exactly.
    Exact(&'static str),
    /// The child's type must satisfy an interface.
    Interface(&'static str),
}

pub(crate) fn check_child(
    catdir: &Path,
    rule: &ChildRule,
    options: &Options,
) -> Result<()> {
    let metadata = read_object_metadata(catdir)?;
    match rule {
        ChildRule::Exact(expected) => {
            if metadata.type_name != *expected {
                return Err(ValidationError::dispatch(format!(
                    "'concatenated' should contain a '{}' object",
                    expected
                )));
            }
        }
        ChildRule::Interface(interface) => {
            if !crate::dispatch::satisfies_interface(&metadata.type_name, interface, options) {
                return Err(ValidationError::dispatch(format!(
                    "'concatenated' should satisfy the '{}' interface",
                    interface
                )));
            }
        }
    }
    crate::dispatch::validate_with_metadata(catdir, &metadata, options)
        .map_err(|e| e.nested("failed to validate the 'concatenated' object"))
}

/// Validate the `lengths` dataset against the height of the concatenated
/// child; returns the number of partitions.
pub(crate) fn validate_lengths(
    ghandle: &hdf5::Group,
    concatenated_height: u64,
    options: &Options,
) -> Result<u64> {
    let lhandle = h5::open_dataset(ghandle, "lengths")?;
    h5::check_integer_fits(&lhandle, 64, false, "lengths")?;
    let num_partitions = h5::get_1d_length(&lhandle, "lengths")?;

    let mut total: u64 = 0;
    h5::scan_numeric_blocks::<u64, _>(&lhandle, num_partitions, options, |_, block| {
        for &x in block {
            total = total.checked_add(x).ok_or_else(|| {
                ValidationError::value("sum of 'lengths' overflows a 64-bit integer".to_string())
            })?;
        }
        Ok(())
    })?;

    if total != concatenated_height {
        return Err(ValidationError::value(format!(
            "sum of 'lengths' ({}) does not equal the height of the concatenated object ({})",
            total, concatenated_height
        )));
    }

    Ok(num_partitions)
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

    let catdir = path.join("concatenated");
    check_child(&catdir, &rule, options)?;
    let concatenated_height = crate::dispatch::height(&catdir, options)?;

    let num_partitions = validate_lengths(&ghandle, concatenated_height, options)?;
    h5::validate_names(&ghandle, "names", num_partitions, options)?;

    dirs::validate_annotation_data_frame(&path.join("element_annotations"), num_partitions, options)
        .map_err(|e| e.nested("failed to validate 'element_annotations'"))?;
    dirs::validate_annotation_list(&path.join("other_annotations"), options)
        .map_err(|e| e.nested("failed to validate 'other_annotations'"))?;

    Ok(())
}

pub(crate) fn height(path: &Path, group_name: &str) -> Result<u64> {
    let handle = h5::open_file(&path.join("partitions.h5"))?;
    let ghandle = h5::open_group(&handle, group_name)?;
    let lhandle = h5::open_dataset(&ghandle, "lengths")?;
    h5::get_1d_length(&lhandle, "lengths")
}
