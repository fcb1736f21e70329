//! Validation for FASTA files.

use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::metadata::ObjectMetadata;
use crate::options::Options;
use crate::utils::files;
use crate::utils::json;
use crate::utils::version::check_major_version_1;

pub fn validate(path: &Path, metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    let obj = json::extract_typed_object(metadata, "fasta_file")?;
    let vstring = json::extract_string(obj, "version")?;
    check_major_version_1(vstring)?;

    let seqtype = json::extract_string(obj, "sequence_type")?;
    if !matches!(seqtype, "DNA" | "RNA" | "AA" | "custom") {
        return Err(ValidationError::value(format!(
            "invalid string '{}' for the 'fasta_file.sequence_type' property",
            seqtype
        )));
    }

    let indexed = json::optional_bool(obj, "indexed")?;
    let ipath = if indexed {
        path.join("file.fasta.bgz")
    } else {
        path.join("file.fasta.gz")
    };
    files::check_gzip_signature(&ipath, b">", "FASTA")?;

    if indexed {
        let fai = path.join("file.fasta.bgz.fai");
        if !fai.exists() {
            return Err(ValidationError::structure(
                "missing FASTA index file".to_string(),
            ));
        }
        let gzi = path.join("file.fasta.bgz.gzi");
        if !gzi.exists() {
            return Err(ValidationError::structure(
                "missing BGZF index file".to_string(),
            ));
        }
    }

    if let Some(strict_check) = &options.fasta_file_strict_check {
        strict_check(path, metadata, options, indexed).map_err(ValidationError::Propagated)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use crate::test_utils::*;

    fn object_json(indexed: bool) -> serde_json::Value {
        serde_json::json!({
            "type": "fasta_file",
            "fasta_file": { "version": "1.0", "sequence_type": "DNA", "indexed": indexed }
        })
    }

    #[test]
    fn plain() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("fasta");
        write_object_file_in_new_dir(&dir, object_json(false));
        write_gz(&dir.join("file.fasta.gz"), b">seq1\nACGT\n");
        test_validate(&dir).unwrap();

        write_gz(&dir.join("file.fasta.gz"), b"@seq1\nACGT\n");
        expect_validation_error(&dir, "incorrect FASTA file signature");
    }

    #[test]
    fn indexed_requires_fai_and_gzi() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("fasta");
        write_object_file_in_new_dir(&dir, object_json(true));
        write_bgzf(&dir.join("file.fasta.bgz"), b">seq1\nACGT\n");
        expect_validation_error(&dir, "missing FASTA index file");

        std::fs::write(dir.join("file.fasta.bgz.fai"), "seq1\t4\t6\t4\t5\n").unwrap();
        expect_validation_error(&dir, "missing BGZF index file");

        std::fs::write(dir.join("file.fasta.bgz.gzi"), [0u8; 8]).unwrap();
        test_validate(&dir).unwrap();
    }
}
