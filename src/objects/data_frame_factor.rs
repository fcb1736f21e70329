//! Validation for data frame factors.

use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::metadata::{read_object_metadata, ObjectMetadata};
use crate::options::Options;
use crate::utils::dirs;
use crate::utils::hdf5 as h5;
use crate::utils::version::check_major_version_1;

pub fn validate(path: &Path, metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    let handle = h5::open_file(&path.join("contents.h5"))?;
    let ghandle = h5::open_group(&handle, "data_frame_factor")?;

    let vstring = h5::load_scalar_string_attr(&ghandle, "version")?;
    check_major_version_1(&vstring)?;

    let lpath = path.join("levels");
    let lmeta = read_object_metadata(&lpath)?;
    if !crate::dispatch::satisfies_interface(&lmeta.type_name, "DATA_FRAME", options) {
        return Err(ValidationError::dispatch(
            "'levels' should satisfy the 'DATA_FRAME' interface".to_string(),
        ));
    }
    crate::dispatch::validate_with_metadata(&lpath, &lmeta, options)
        .map_err(|e| e.nested("failed to validate 'levels'"))?;
    let num_levels = crate::dispatch::height_with_metadata(&lpath, &lmeta, options)?;

    if let Some(any_duplicated) = &options.data_frame_factor_any_duplicated {
        let duplicated = any_duplicated(&lpath, metadata, options)
            .map_err(ValidationError::Propagated)?;
        if duplicated {
            return Err(ValidationError::value(
                "'levels' should not contain duplicated rows".to_string(),
            ));
        }
    }

    let num_codes = h5::validate_factor_codes(&ghandle, "codes", num_levels, options, true)?;

    if ghandle.link_exists("names") {
        let nhandle = h5::open_dataset(&ghandle, "names")?;
        h5::check_string_type(&nhandle, "names")?;
        if h5::get_1d_length(&nhandle, "names")? != num_codes {
            return Err(ValidationError::structure(
                "'names' and 'codes' should have the same length".to_string(),
            ));
        }
        h5::validate_1d_string_dataset(&nhandle, num_codes, options)?;
    }

    dirs::validate_annotation_data_frame(&path.join("element_annotations"), num_codes, options)
        .map_err(|e| e.nested("failed to validate 'element_annotations'"))?;
    dirs::validate_annotation_list(&path.join("other_annotations"), options)
        .map_err(|e| e.nested("failed to validate 'other_annotations'"))?;

    Ok(())
}

pub fn height(path: &Path, _metadata: &ObjectMetadata, _options: &Options) -> Result<u64> {
    let handle = h5::open_file(&path.join("contents.h5"))?;
    let ghandle = h5::open_group(&handle, "data_frame_factor")?;
    let dhandle = h5::open_dataset(&ghandle, "codes")?;
    h5::get_1d_length(&dhandle, "codes")
}
