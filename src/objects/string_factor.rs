//! Validation for string factors.

use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::metadata::ObjectMetadata;
use crate::options::Options;
use crate::utils::hdf5 as h5;
use crate::utils::version::check_major_version_1;

pub fn validate(path: &Path, _metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    let handle = h5::open_file(&path.join("contents.h5"))?;
    let ghandle = h5::open_group(&handle, "string_factor")?;

    let vstring = h5::load_scalar_string_attr(&ghandle, "version")?;
    check_major_version_1(&vstring)?;

    h5::check_ordered_attribute(&ghandle)?;

    let num_levels = h5::validate_factor_levels(&ghandle, "levels", options)?;
    let num_codes = h5::validate_factor_codes(&ghandle, "codes", num_levels, options, true)?;

    if ghandle.link_exists("names") {
        let nhandle = h5::open_dataset(&ghandle, "names")?;
        h5::check_string_type(&nhandle, "names")?;
        let nlen = h5::get_1d_length(&nhandle, "names")?;
        if num_codes != nlen {
            return Err(ValidationError::structure(
                "'names' and 'codes' should have the same length".to_string(),
            ));
        }
        h5::validate_1d_string_dataset(&nhandle, nlen, options)?;
    }

    Ok(())
}

pub fn height(path: &Path, _metadata: &ObjectMetadata, _options: &Options) -> Result<u64> {
    let handle = h5::open_file(&path.join("contents.h5"))?;
    let ghandle = h5::open_group(&handle, "string_factor")?;
    let dhandle = h5::open_dataset(&ghandle, "codes")?;
    h5::get_1d_length(&dhandle, "codes")
}
