//! Validation for BCF files.

use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::metadata::ObjectMetadata;
use crate::options::Options;
use crate::utils::files;
use crate::utils::json;
use crate::utils::version::check_major_version_1;

pub fn validate(path: &Path, metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    let vstring = json::extract_version_for_type(metadata, "bcf_file")?;
    check_major_version_1(&vstring)?;

    // Magic number from https://samtools.github.io/hts-specs/BCFv2_qref.pdf
    let ipath = path.join("file.bcf");
    files::check_bgzf_signature(&ipath, b"BCF\x02\x01", "BCF")?;

    let csi = path.join("file.bcf.csi");
    if csi.exists() {
        files::check_bgzf_signature(&csi, b"CSI\x01", "CSI index")?;
    }

    if let Some(strict_check) = &options.bcf_file_strict_check {
        strict_check(path, metadata, options).map_err(ValidationError::Propagated)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use crate::test_utils::*;

    #[test]
    fn signature() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("bcf");
        init_object_dir(&dir, "bcf_file", "1.0");
        write_bgzf(&dir.join("file.bcf"), b"BCF\x02\x01header");
        test_validate(&dir).unwrap();

        write_bgzf(&dir.join("file.bcf"), b"BCF\x01\x01header");
        expect_validation_error(&dir, "incorrect BCF file signature");
    }
}
