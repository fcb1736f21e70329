//! Validation for summarized experiments.

use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::metadata::ObjectMetadata;
use crate::options::Options;
use crate::utils::dirs;
use crate::utils::json;
use crate::utils::version::check_major_version_1;

/// Extract the `(nrow, ncol)` pair declared in the object metadata.  This is
/// shared by all object types derived from the summarized experiment, as
/// they all keep their dimensions under the `summarized_experiment` key.
pub(crate) fn metadata_dimensions(metadata: &ObjectMetadata) -> Result<(u64, u64)> {
    let obj = json::extract_typed_object(metadata, "summarized_experiment")?;
    let vstring = json::extract_string(obj, "version")?;
    check_major_version_1(vstring)?;

    let Some(serde_json::Value::Array(dims)) = obj.get("dimensions") else {
        return Err(ValidationError::structure(
            "expected a 'summarized_experiment.dimensions' array".to_string(),
        ));
    };
    if dims.len() != 2 {
        return Err(ValidationError::value(
            "'summarized_experiment.dimensions' should contain exactly two entries".to_string(),
        ));
    }

    let mut parsed = [0u64; 2];
    for (i, value) in dims.iter().enumerate() {
        parsed[i] = value
            .as_u64()
            .or_else(|| {
                value.as_f64().and_then(|x| {
                    (x >= 0.0 && x.fract() == 0.0).then_some(x as u64)
                })
            })
            .ok_or_else(|| {
                ValidationError::value(
                    "'summarized_experiment.dimensions' should contain non-negative integers"
                        .to_string(),
                )
            })?;
    }

    Ok((parsed[0], parsed[1]))
}

pub fn validate(path: &Path, metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    let (num_rows, num_cols) = metadata_dimensions(metadata)?;

    let assay_dir = path.join("assays");
    let names = dirs::read_names_json(&assay_dir)?;

    for (i, _name) in names.iter().enumerate() {
        let assay_path = assay_dir.join(i.to_string());
        crate::dispatch::validate(&assay_path, options)
            .map_err(|e| e.nested(format!("failed to validate 'assays/{}'", i)))?;

        let dims = crate::dispatch::dimensions(&assay_path, options)?;
        if dims.len() < 2 {
            return Err(ValidationError::value(format!(
                "object in 'assays/{}' should have at least two dimensions",
                i
            )));
        }
        if dims[0] != num_rows {
            return Err(ValidationError::value(format!(
                "object in 'assays/{}' should have the same number of rows as its parent",
                i
            )));
        }
        if dims[1] != num_cols {
            return Err(ValidationError::value(format!(
                "object in 'assays/{}' should have the same number of columns as its parent",
                i
            )));
        }
    }

    // The directory should contain the names.json file plus one
    // subdirectory per named assay, nothing else.
    if dirs::count_directory_entries(&assay_dir)? != names.len() + 1 {
        return Err(ValidationError::structure(
            "more objects than expected inside the 'assays' subdirectory".to_string(),
        ));
    }

    dirs::validate_annotation_data_frame(&path.join("row_data"), num_rows, options)
        .map_err(|e| e.nested("failed to validate 'row_data'"))?;
    dirs::validate_annotation_data_frame(&path.join("column_data"), num_cols, options)
        .map_err(|e| e.nested("failed to validate 'column_data'"))?;
    dirs::validate_annotation_list(&path.join("other_data"), options)
        .map_err(|e| e.nested("failed to validate 'other_data'"))?;

    Ok(())
}

pub fn height(_path: &Path, metadata: &ObjectMetadata, _options: &Options) -> Result<u64> {
    Ok(metadata_dimensions(metadata)?.0)
}

pub fn dimensions(_path: &Path, metadata: &ObjectMetadata, _options: &Options) -> Result<Vec<u64>> {
    let (num_rows, num_cols) = metadata_dimensions(metadata)?;
    Ok(vec![num_rows, num_cols])
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::test_utils::*;

    #[test]
    fn basic() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("se");
        mock_summarized_experiment(&dir, &MockExperiment::new(20, 15).assays(2));

        test_validate(&dir).unwrap();
        assert_eq!(test_height(&dir).unwrap(), 20);
        assert_eq!(test_dimensions(&dir).unwrap(), vec![20, 15]);
    }

    #[test]
    fn with_annotations() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("se");
        mock_summarized_experiment(
            &dir,
            &MockExperiment::new(10, 5)
                .assays(1)
                .row_data()
                .column_data()
                .other_data(),
        );
        test_validate(&dir).unwrap();
    }

    #[test]
    fn assay_shape_mismatch() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("se");
        mock_summarized_experiment(&dir, &MockExperiment::new(20, 15).assays(1));
        mock_dense_array(&dir.join("assays").join("0"), ArrayType::Integer, &[19, 15]);
        expect_validation_error(
            &dir,
            "object in 'assays/0' should have the same number of rows",
        );
    }

    #[test]
    fn extra_assay_directory() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("se");
        mock_summarized_experiment(&dir, &MockExperiment::new(4, 3).assays(1));
        mock_dense_array(&dir.join("assays").join("1"), ArrayType::Integer, &[4, 3]);
        expect_validation_error(&dir, "more objects than expected inside the 'assays'");
    }

    #[test]
    fn duplicated_assay_names() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("se");
        mock_summarized_experiment(&dir, &MockExperiment::new(4, 3).assays(2));
        std::fs::write(
            dir.join("assays").join("names.json"),
            r#"["counts", "counts"]"#,
        )
        .unwrap();
        expect_validation_error(&dir, "detected duplicated name 'counts'");
    }

    #[test]
    fn row_data_height() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("se");
        mock_summarized_experiment(&dir, &MockExperiment::new(4, 3).assays(1));
        mock_data_frame(&dir.join("row_data"), 5, &[MockColumn::Integer("x")]);
        expect_validation_error(&dir, "failed to validate 'row_data'");
    }
}
