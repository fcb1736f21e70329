//! Validation for bumpy data frame arrays.

use std::path::Path;

use crate::error::Result;
use crate::metadata::ObjectMetadata;
use crate::objects::bumpy_array;
use crate::objects::compressed_list::ChildRule;
use crate::options::Options;

pub fn validate(path: &Path, _metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    bumpy_array::validate_directory(
        path,
        "bumpy_data_frame_array",
        ChildRule::Interface("DATA_FRAME"),
        options,
    )
}

pub fn height(path: &Path, _metadata: &ObjectMetadata, _options: &Options) -> Result<u64> {
    bumpy_array::height(path, "bumpy_data_frame_array")
}

pub fn dimensions(path: &Path, _metadata: &ObjectMetadata, _options: &Options) -> Result<Vec<u64>> {
    bumpy_array::dimensions(path, "bumpy_data_frame_array")
}
