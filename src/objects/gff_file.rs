//! Validation for GFF files.

use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::metadata::ObjectMetadata;
use crate::options::Options;
use crate::utils::files;
use crate::utils::json;
use crate::utils::version::check_major_version_1;

pub fn validate(path: &Path, metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    let obj = json::extract_typed_object(metadata, "gff_file")?;
    let vstring = json::extract_string(obj, "version")?;
    check_major_version_1(vstring)?;

    let format = json::extract_string(obj, "format")?;
    let indexed = json::optional_bool(obj, "indexed")?;

    let suffix = if indexed { "bgz" } else { "gz" };
    let ipath = match format {
        "GFF2" => path.join(format!("file.gff2.{}", suffix)),
        "GFF3" => path.join(format!("file.gff3.{}", suffix)),
        _ => {
            return Err(ValidationError::value(format!(
                "unknown 'gff_file.format' value '{}'",
                format
            )));
        }
    };

    if format == "GFF3" {
        files::check_gzip_signature(&ipath, b"##gff-version 3", "GFF3")?;
    } else {
        files::check_signature(&ipath, &[0x1f, 0x8b], "gzip")?;
    }

    if indexed {
        let tbi = path.join(format!("file.{}.{}.tbi", format.to_lowercase(), suffix));
        if !tbi.exists() {
            return Err(ValidationError::structure(
                "missing tabix index file".to_string(),
            ));
        }
        files::check_bgzf_signature(&tbi, b"TBI\x01", "TBI index")?;
    }

    if let Some(strict_check) = &options.gff_file_strict_check {
        strict_check(path, metadata, options).map_err(ValidationError::Propagated)?;
    }
    Ok(())
}
