//! Validation for BAM files.

use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::metadata::ObjectMetadata;
use crate::options::Options;
use crate::utils::files;
use crate::utils::json;
use crate::utils::version::check_major_version_1;

pub fn validate(path: &Path, metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    let vstring = json::extract_version_for_type(metadata, "bam_file")?;
    check_major_version_1(&vstring)?;

    // Magic number from https://samtools.github.io/hts-specs/SAMv1.pdf;
    // the container itself is a BGZF stream.
    let ipath = path.join("file.bam");
    files::check_bgzf_signature(&ipath, b"BAM\x01", "BAM")?;

    // BAI indices are uncompressed, CSI indices are BGZF-compressed.
    let bai = path.join("file.bam.bai");
    if bai.exists() {
        files::check_signature(&bai, b"BAI\x01", "BAI index")?;
    }
    let csi = path.join("file.bam.csi");
    if csi.exists() {
        files::check_bgzf_signature(&csi, b"CSI\x01", "CSI index")?;
    }

    if let Some(strict_check) = &options.bam_file_strict_check {
        strict_check(path, metadata, options).map_err(ValidationError::Propagated)?;
    }
    Ok(())
}
