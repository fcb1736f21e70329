//! Validation for GMT files.

use std::io::Read;
use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::metadata::ObjectMetadata;
use crate::options::Options;
use crate::utils::files;
use crate::utils::json;
use crate::utils::version::check_major_version_1;

pub fn validate(path: &Path, metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    let vstring = json::extract_version_for_type(metadata, "gmt_file")?;
    check_major_version_1(&vstring)?;

    // No magic number for GMT, so we only check that the payload is a
    // readable gzip stream.
    let ipath = path.join("file.gmt.gz");
    let mut reader = files::open_gzip(&ipath)?;
    let mut buffer = [0u8; 1];
    reader.read(&mut buffer).map_err(|e| {
        ValidationError::value(format!(
            "failed to read '{}' as a gzip file; {}",
            ipath.display(),
            e
        ))
    })?;

    if let Some(strict_check) = &options.gmt_file_strict_check {
        strict_check(path, metadata, options).map_err(ValidationError::Propagated)?;
    }
    Ok(())
}
