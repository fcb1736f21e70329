//! Validation for bigBed files.

use std::path::Path;

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::{Result, ValidationError};
use crate::metadata::ObjectMetadata;
use crate::options::Options;
use crate::utils::files;
use crate::utils::json;
use crate::utils::version::check_major_version_1;

/// Magic number from the UCSC bigBed specification.
const MAGIC: u32 = 0x8789F2EB;

pub fn validate(path: &Path, metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    let vstring = json::extract_version_for_type(metadata, "bigbed_file")?;
    check_major_version_1(&vstring)?;

    let ipath = path.join("file.bb");
    let observed = files::extract_signature(&ipath, 4)?;
    if LittleEndian::read_u32(&observed) != MAGIC && BigEndian::read_u32(&observed) != MAGIC {
        return Err(ValidationError::value(format!(
            "incorrect bigBed file signature for '{}'",
            ipath.display()
        )));
    }

    if let Some(strict_check) = &options.bigbed_file_strict_check {
        strict_check(path, metadata, options).map_err(ValidationError::Propagated)?;
    }
    Ok(())
}
