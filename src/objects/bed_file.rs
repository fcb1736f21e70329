//! Validation for BED files.

use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::metadata::ObjectMetadata;
use crate::options::Options;
use crate::utils::files;
use crate::utils::json;
use crate::utils::version::check_major_version_1;

pub fn validate(path: &Path, metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    let obj = json::extract_typed_object(metadata, "bed_file")?;
    let vstring = json::extract_string(obj, "version")?;
    check_major_version_1(vstring)?;

    let indexed = json::optional_bool(obj, "indexed")?;
    if indexed {
        let ipath = path.join("file.bed.bgz");
        files::check_signature(&ipath, &[0x1f, 0x8b], "gzip")?;

        let tbi = path.join("file.bed.bgz.tbi");
        if !tbi.exists() {
            return Err(ValidationError::structure(
                "missing tabix index file".to_string(),
            ));
        }
        files::check_bgzf_signature(&tbi, b"TBI\x01", "TBI index")?;
    } else {
        let ipath = path.join("file.bed.gz");
        files::check_signature(&ipath, &[0x1f, 0x8b], "gzip")?;
    }

    if let Some(strict_check) = &options.bed_file_strict_check {
        strict_check(path, metadata, options).map_err(ValidationError::Propagated)?;
    }
    Ok(())
}
