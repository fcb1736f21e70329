//! Validation for FASTQ files.

use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::metadata::ObjectMetadata;
use crate::options::Options;
use crate::utils::files;
use crate::utils::json;
use crate::utils::version::check_major_version_1;

pub fn validate(path: &Path, metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    let obj = json::extract_typed_object(metadata, "fastq_file")?;
    let vstring = json::extract_string(obj, "version")?;
    check_major_version_1(vstring)?;

    if let Some(offset) = json::optional_count(obj, "quality_offset")? {
        if offset != 33 && offset != 64 {
            return Err(ValidationError::value(
                "'fastq_file.quality_offset' property should be either 33 or 64".to_string(),
            ));
        }
    }

    let indexed = json::optional_bool(obj, "indexed")?;
    let ipath = if indexed {
        path.join("file.fastq.bgz")
    } else {
        path.join("file.fastq.gz")
    };
    files::check_gzip_signature(&ipath, b"@", "FASTQ")?;

    if indexed {
        let fai = path.join("file.fastq.bgz.fai");
        if !fai.exists() {
            return Err(ValidationError::structure(
                "missing FASTQ index file".to_string(),
            ));
        }
        let gzi = path.join("file.fastq.bgz.gzi");
        if !gzi.exists() {
            return Err(ValidationError::structure(
                "missing BGZF index file".to_string(),
            ));
        }
    }

    if let Some(strict_check) = &options.fastq_file_strict_check {
        strict_check(path, metadata, options, indexed).map_err(ValidationError::Propagated)?;
    }
    Ok(())
}
