//! Validation for VCF experiments.

use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::metadata::{read_object_metadata, ObjectMetadata};
use crate::objects::{ranged_summarized_experiment, summarized_experiment};
use crate::options::Options;
use crate::utils::hdf5 as h5;
use crate::utils::json;
use crate::utils::version::check_major_version_1;

fn sequence_type_of(metadata: &ObjectMetadata) -> Result<String> {
    let obj = json::extract_typed_object(metadata, "sequence_string_set")?;
    Ok(json::extract_string(obj, "sequence_type")?.to_string())
}

fn validate_reference_allele(
    allele_dir: &Path,
    num_rows: u64,
    options: &Options,
) -> Result<()> {
    let ref_dir = allele_dir.join("reference");
    let ref_meta = read_object_metadata(&ref_dir)?;
    if ref_meta.type_name != "sequence_string_set" {
        return Err(ValidationError::dispatch(
            "'alleles/reference' should contain a 'sequence_string_set' object".to_string(),
        ));
    }

    crate::dispatch::validate_with_metadata(&ref_dir, &ref_meta, options)
        .map_err(|e| e.nested("failed to validate 'alleles/reference'"))?;

    if sequence_type_of(&ref_meta)? != "DNA" {
        return Err(ValidationError::value(
            "'alleles/reference' should contain DNA sequences".to_string(),
        ));
    }

    if crate::dispatch::height_with_metadata(&ref_dir, &ref_meta, options)? != num_rows {
        return Err(ValidationError::value(
            "'alleles/reference' should have length equal to the number of rows".to_string(),
        ));
    }

    Ok(())
}

fn validate_alternative_allele(
    allele_dir: &Path,
    expanded: bool,
    structural: bool,
    num_rows: u64,
    options: &Options,
) -> Result<()> {
    let alt_dir = allele_dir.join("alternative");
    let alt_meta = read_object_metadata(&alt_dir)?;

    // The alternative representation depends on whether multiple alleles
    // per variant were expanded into separate rows, and on whether the
    // alleles are structural (arbitrary strings) or plain sequences.
    let expected_type = match (expanded, structural) {
        (true, true) => "atomic_vector",
        (true, false) => "sequence_string_set",
        (false, true) => "atomic_vector_list",
        (false, false) => "sequence_string_set_list",
    };
    if alt_meta.type_name != expected_type {
        return Err(ValidationError::dispatch(format!(
            "'alleles/alternative' should contain a '{}' object",
            expected_type
        )));
    }

    crate::dispatch::validate_with_metadata(&alt_dir, &alt_meta, options)
        .map_err(|e| e.nested("failed to validate 'alleles/alternative'"))?;

    if crate::dispatch::height_with_metadata(&alt_dir, &alt_meta, options)? != num_rows {
        return Err(ValidationError::value(
            "'alleles/alternative' should have length equal to the number of rows".to_string(),
        ));
    }

    if structural {
        let contents_path = if expanded {
            alt_dir.join("contents.h5")
        } else {
            alt_dir.join("concatenated").join("contents.h5")
        };
        let handle = h5::open_file(&contents_path)?;
        let ghandle = h5::open_group(&handle, "atomic_vector")?;
        if h5::load_scalar_string_attr(&ghandle, "type")? != "string" {
            return Err(ValidationError::value(
                "expected alternative alleles to be stored as strings".to_string(),
            ));
        }
    } else {
        let seq_meta = if expanded {
            alt_meta
        } else {
            read_object_metadata(&alt_dir.join("concatenated"))?
        };
        if sequence_type_of(&seq_meta)? != "DNA" {
            return Err(ValidationError::value(
                "'alleles/alternative' should contain DNA sequences".to_string(),
            ));
        }
    }

    Ok(())
}

pub fn validate(path: &Path, metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    ranged_summarized_experiment::validate(path, metadata, options)?;
    let (num_rows, _) = summarized_experiment::metadata_dimensions(metadata)?;

    let obj = json::extract_typed_object(metadata, "vcf_experiment")?;
    let vstring = json::extract_string(obj, "version")?;
    check_major_version_1(vstring)?;
    let expanded = json::optional_bool(obj, "expanded")?;
    let structural = json::optional_bool(obj, "structural")?;

    // Unlike the generic RSE, the row ranges are mandatory and must be a
    // plain genomic_ranges.
    let rr_meta = read_object_metadata(&path.join("row_ranges"))?;
    if rr_meta.type_name != "genomic_ranges" {
        return Err(ValidationError::dispatch(
            "'row_ranges' should contain a 'genomic_ranges' object".to_string(),
        ));
    }

    let allele_dir = path.join("alleles");
    validate_reference_allele(&allele_dir, num_rows, options)?;
    validate_alternative_allele(&allele_dir, expanded, structural, num_rows, options)?;

    // Per-variant fixed fields (positions, qualities, filters, info).
    let vhandle = h5::open_file(&path.join("variants.h5"))?;
    let ghandle = h5::open_group(&vhandle, "vcf_experiment")?;
    if ghandle.link_exists("fixed") {
        h5::open_group(&ghandle, "fixed")?;
    }

    Ok(())
}

pub fn height(path: &Path, metadata: &ObjectMetadata, options: &Options) -> Result<u64> {
    summarized_experiment::height(path, metadata, options)
}

pub fn dimensions(path: &Path, metadata: &ObjectMetadata, options: &Options) -> Result<Vec<u64>> {
    summarized_experiment::dimensions(path, metadata, options)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::test_utils::*;

    #[test]
    fn expanded_sequences() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("vcf");
        mock_vcf_experiment(&dir, 3, 2, true, false);

        test_validate(&dir).unwrap();
        assert_eq!(test_height(&dir).unwrap(), 3);
        assert_eq!(test_dimensions(&dir).unwrap(), vec![3, 2]);
    }

    #[test]
    fn expanded_structural() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("vcf");
        mock_vcf_experiment(&dir, 3, 2, true, true);
        test_validate(&dir).unwrap();
    }

    #[test]
    fn alternative_type_mismatch() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("vcf");
        mock_vcf_experiment(&dir, 3, 2, true, false);

        // Declaring structural alleles while storing sequences is an error.
        let mut meta = crate::read_object_metadata(&dir).unwrap();
        meta.other.get_mut("vcf_experiment").unwrap()["structural"] = serde_json::json!(true);
        rewrite_object_file(&dir, &meta);
        expect_validation_error(
            &dir,
            "'alleles/alternative' should contain a 'atomic_vector' object",
        );
    }

    #[test]
    fn reference_must_be_dna() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("vcf");
        mock_vcf_experiment(&dir, 3, 2, true, false);
        mock_sequence_string_set_fasta(
            &dir.join("alleles").join("reference"),
            3,
            "AA",
            ">0\nMK\n>1\nMK\n>2\nMK\n",
        );
        expect_validation_error(&dir, "'alleles/reference' should contain DNA sequences");
    }

    #[test]
    fn reference_length_mismatch() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("vcf");
        mock_vcf_experiment(&dir, 3, 2, true, false);
        mock_sequence_string_set_fasta(
            &dir.join("alleles").join("reference"),
            2,
            "DNA",
            ">0\nAC\n>1\nGT\n",
        );
        expect_validation_error(
            &dir,
            "'alleles/reference' should have length equal to the number of rows",
        );
    }
}
