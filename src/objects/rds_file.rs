//! Validation for RDS files.

use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::metadata::ObjectMetadata;
use crate::options::Options;
use crate::utils::files;
use crate::utils::json;
use crate::utils::version::check_major_version_1;

pub fn validate(path: &Path, metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    let vstring = json::extract_version_for_type(metadata, "rds_file")?;
    check_major_version_1(&vstring)?;

    // Serialized R objects in the XDR format start with "X\n" once
    // decompressed.
    let ipath = path.join("file.rds");
    files::check_gzip_signature(&ipath, b"X\n", "RDS")?;

    if let Some(strict_check) = &options.rds_file_strict_check {
        strict_check(path, metadata, options).map_err(ValidationError::Propagated)?;
    }
    Ok(())
}
