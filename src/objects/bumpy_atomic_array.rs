//! Validation for bumpy atomic arrays.

use std::path::Path;

use crate::error::Result;
use crate::metadata::ObjectMetadata;
use crate::objects::bumpy_array;
use crate::objects::compressed_list::ChildRule;
use crate::options::Options;

pub fn validate(path: &Path, _metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    bumpy_array::validate_directory(
        path,
        "bumpy_atomic_array",
        ChildRule::Exact("atomic_vector"),
        options,
    )
}

pub fn height(path: &Path, _metadata: &ObjectMetadata, _options: &Options) -> Result<u64> {
    bumpy_array::height(path, "bumpy_atomic_array")
}

pub fn dimensions(path: &Path, _metadata: &ObjectMetadata, _options: &Options) -> Result<Vec<u64>> {
    bumpy_array::dimensions(path, "bumpy_atomic_array")
}
