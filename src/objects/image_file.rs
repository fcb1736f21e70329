//! Validation for standard image files.

use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::metadata::ObjectMetadata;
use crate::options::Options;
use crate::utils::files;
use crate::utils::json;
use crate::utils::version::check_major_version_1;

pub fn validate(path: &Path, metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    let obj = json::extract_typed_object(metadata, "image_file")?;
    let vstring = json::extract_string(obj, "version")?;
    check_major_version_1(vstring)?;

    let format = json::extract_string(obj, "format")?;
    match format {
        "PNG" => {
            // Magic number from the PNG specification.
            files::check_signature(
                &path.join("file.png"),
                &[137, 80, 78, 71, 13, 10, 26, 10],
                "PNG",
            )?;
        }
        "TIFF" => {
            let ipath = path.join("file.tif");
            let observed = files::extract_signature(&ipath, 4)?;
            if observed != [0x49, 0x49, 0x2A, 0x00] && observed != [0x4D, 0x4D, 0x00, 0x2A] {
                return Err(ValidationError::value(format!(
                    "incorrect TIFF file signature for '{}'",
                    ipath.display()
                )));
            }
        }
        "JPEG" => {
            // Common prefix of the JPEG-related magic numbers.
            files::check_signature(&path.join("file.jpg"), &[0xFF, 0xD8], "JPEG")?;
        }
        "GIF" => {
            // Common prefix of the GIF87a and GIF89a magic numbers.
            files::check_signature(&path.join("file.gif"), &[0x47, 0x49, 0x46, 0x38], "GIF")?;
        }
        "WEBP" => {
            let ipath = path.join("file.webp");
            let observed = files::extract_signature(&ipath, 12)?;
            if observed[0..4] != *b"RIFF" || observed[8..12] != *b"WEBP" {
                return Err(ValidationError::value(format!(
                    "incorrect WEBP file signature for '{}'",
                    ipath.display()
                )));
            }
        }
        _ => {
            return Err(ValidationError::value(format!(
                "unsupported format '{}'",
                format
            )));
        }
    }

    if let Some(strict_check) = &options.image_file_strict_check {
        strict_check(path, metadata, options).map_err(ValidationError::Propagated)?;
    }
    Ok(())
}
