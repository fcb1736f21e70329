//! Validation for multi-sample datasets.

use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::metadata::{read_object_metadata, ObjectMetadata};
use crate::options::Options;
use crate::utils::dirs;
use crate::utils::hdf5 as h5;
use crate::utils::json;
use crate::utils::version::check_major_version_1;

pub fn validate(path: &Path, metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    let vstring = json::extract_version_for_type(metadata, "multi_sample_dataset")?;
    check_major_version_1(&vstring)?;

    let sd_path = path.join("sample_data");
    let sd_meta = read_object_metadata(&sd_path)?;
    if !crate::dispatch::satisfies_interface(&sd_meta.type_name, "DATA_FRAME", options) {
        return Err(ValidationError::dispatch(
            "'sample_data' should satisfy the 'DATA_FRAME' interface".to_string(),
        ));
    }
    crate::dispatch::validate_with_metadata(&sd_path, &sd_meta, options)
        .map_err(|e| e.nested("failed to validate 'sample_data'"))?;
    let num_samples = crate::dispatch::height_with_metadata(&sd_path, &sd_meta, options)?;

    let exp_dir = path.join("experiments");
    let mut num_columns = Vec::new();
    if exp_dir.exists() {
        let names = dirs::read_names_json(&exp_dir)?;

        for i in 0..names.len() {
            let exp_path = exp_dir.join(i.to_string());
            let exp_meta = read_object_metadata(&exp_path)?;
            if !crate::dispatch::satisfies_interface(
                &exp_meta.type_name,
                "SUMMARIZED_EXPERIMENT",
                options,
            ) {
                return Err(ValidationError::dispatch(format!(
                    "object in 'experiments/{}' should satisfy the 'SUMMARIZED_EXPERIMENT' \
                     interface",
                    i
                )));
            }

            crate::dispatch::validate_with_metadata(&exp_path, &exp_meta, options)
                .map_err(|e| e.nested(format!("failed to validate 'experiments/{}'", i)))?;

            let dims = crate::dispatch::dimensions_with_metadata(&exp_path, &exp_meta, options)?;
            num_columns.push(dims[1]);
        }

        if dirs::count_directory_entries(&exp_dir)? != names.len() + 1 {
            return Err(ValidationError::structure(
                "more objects than expected inside the 'experiments' subdirectory".to_string(),
            ));
        }
    }

    // One sample mapping per experiment, no more and no fewer.
    let handle = h5::open_file(&path.join("sample_map.h5"))?;
    let ghandle = h5::open_group(&handle, "multi_sample_dataset")?;
    for (e, &num_cols) in num_columns.iter().enumerate() {
        let dataset = e.to_string();
        let mhandle = h5::open_dataset(&ghandle, &dataset)?;
        h5::check_integer_fits(&mhandle, 64, false, &dataset)?;
        if h5::get_1d_length(&mhandle, &dataset)? != num_cols {
            return Err(ValidationError::structure(format!(
                "length of the sample mapping for experiment {} should equal its number of \
                 columns",
                e
            )));
        }
        h5::scan_numeric_blocks::<u64, _>(&mhandle, num_cols, options, |_, block| {
            if block.iter().any(|&x| x >= num_samples) {
                return Err(ValidationError::value(
                    "sample indices should be less than the number of samples".to_string(),
                ));
            }
            Ok(())
        })?;
    }
    if ghandle.member_names()?.len() != num_columns.len() {
        return Err(ValidationError::structure(
            "expected exactly one sample mapping per experiment".to_string(),
        ));
    }

    dirs::validate_annotation_list(&path.join("other_data"), options)
        .map_err(|e| e.nested("failed to validate 'other_data'"))?;

    Ok(())
}

#[cfg(test)]
mod test {
    use crate::test_utils::*;

    #[test]
    fn basic() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("msd");
        mock_multi_sample_dataset(&dir, 3, &[(4, 5), (4, 2)]);
        test_validate(&dir).unwrap();
    }

    #[test]
    fn sample_map_length_mismatch() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("msd");
        mock_multi_sample_dataset(&dir, 3, &[(4, 5)]);
        {
            let handle = hdf5::File::open_rw(dir.join("sample_map.h5")).unwrap();
            let ghandle = handle.group("multi_sample_dataset").unwrap();
            ghandle.unlink("0").unwrap();
            write_u64_dataset(&ghandle, "0", &[0, 1, 2]);
        }
        expect_validation_error(&dir, "length of the sample mapping for experiment 0");
    }

    #[test]
    fn sample_index_out_of_range() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("msd");
        mock_multi_sample_dataset(&dir, 2, &[(4, 3)]);
        {
            let handle = hdf5::File::open_rw(dir.join("sample_map.h5")).unwrap();
            let ghandle = handle.group("multi_sample_dataset").unwrap();
            ghandle.unlink("0").unwrap();
            write_u64_dataset(&ghandle, "0", &[0, 1, 2]);
        }
        expect_validation_error(
            &dir,
            "sample indices should be less than the number of samples",
        );
    }

    #[test]
    fn extra_sample_map_dataset() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("msd");
        mock_multi_sample_dataset(&dir, 2, &[(4, 3)]);
        {
            let handle = hdf5::File::open_rw(dir.join("sample_map.h5")).unwrap();
            let ghandle = handle.group("multi_sample_dataset").unwrap();
            write_u64_dataset(&ghandle, "1", &[0]);
        }
        expect_validation_error(&dir, "exactly one sample mapping per experiment");
    }

    #[test]
    fn experiment_interface() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join("msd");
        mock_multi_sample_dataset(&dir, 2, &[(4, 3)]);
        mock_atomic_vector(&dir.join("experiments").join("0"), 3);
        expect_validation_error(&dir, "should satisfy the 'SUMMARIZED_EXPERIMENT' interface");
    }
}
