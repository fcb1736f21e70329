//! Validation for genomic ranges lists.

use std::path::Path;

use crate::error::Result;
use crate::metadata::ObjectMetadata;
use crate::objects::compressed_list::{self, ChildRule};
use crate::options::Options;

pub fn validate(path: &Path, _metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    compressed_list::validate_directory(
        path,
        "genomic_ranges_list",
        ChildRule::Exact("genomic_ranges"),
        options,
    )
}

pub fn height(path: &Path, _metadata: &ObjectMetadata, _options: &Options) -> Result<u64> {
    compressed_list::height(path, "genomic_ranges_list")
}
