//! Validation for ranged summarized experiments.

use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::metadata::{read_object_metadata, ObjectMetadata};
use crate::objects::summarized_experiment;
use crate::options::Options;

pub fn validate(path: &Path, metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    summarized_experiment::validate(path, metadata, options)?;
    let (num_rows, _) = summarized_experiment::metadata_dimensions(metadata)?;

    // Absence of row ranges is permitted; they are implicitly empty.
    let rr_path = path.join("row_ranges");
    if !rr_path.exists() {
        return Ok(());
    }

    let rr_meta = read_object_metadata(&rr_path)?;
    if rr_meta.type_name != "genomic_ranges" && rr_meta.type_name != "genomic_ranges_list" {
        return Err(ValidationError::dispatch(
            "'row_ranges' should contain a 'genomic_ranges' or 'genomic_ranges_list' object"
                .to_string(),
        ));
    }

    crate::dispatch::validate_with_metadata(&rr_path, &rr_meta, options)
        .map_err(|e| e.nested("failed to validate 'row_ranges'"))?;

    if crate::dispatch::height_with_metadata(&rr_path, &rr_meta, options)? != num_rows {
        return Err(ValidationError::value(
            "'row_ranges' should have length equal to the number of rows".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::test_utils::*;

    #[test]
    fn without_row_ranges() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("rse");
        mock_ranged_summarized_experiment(&dir, &MockExperiment::new(5, 4).assays(1), false);

        test_validate(&dir).unwrap();
        assert_eq!(test_height(&dir).unwrap(), 5);
        assert_eq!(test_dimensions(&dir).unwrap(), vec![5, 4]);
    }

    #[test]
    fn with_row_ranges() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("rse");
        mock_ranged_summarized_experiment(&dir, &MockExperiment::new(3, 4).assays(1), true);
        test_validate(&dir).unwrap();
    }

    #[test]
    fn row_ranges_length_mismatch() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("rse");
        mock_ranged_summarized_experiment(&dir, &MockExperiment::new(3, 4).assays(1), true);
        mock_genomic_ranges(
            &dir.join("row_ranges"),
            &[0, 0],
            &[1, 2],
            &[5, 5],
            &[0, 0],
            &[100],
            &[0],
        );
        expect_validation_error(
            &dir,
            "'row_ranges' should have length equal to the number of rows",
        );
    }

    #[test]
    fn row_ranges_wrong_type() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("rse");
        mock_ranged_summarized_experiment(&dir, &MockExperiment::new(3, 4).assays(1), false);
        mock_atomic_vector(&dir.join("row_ranges"), 3);
        expect_validation_error(&dir, "'row_ranges' should contain a 'genomic_ranges'");
    }
}
