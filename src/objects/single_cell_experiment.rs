//! Validation for single cell experiments.

use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::metadata::{read_object_metadata, ObjectMetadata};
use crate::objects::{ranged_summarized_experiment, summarized_experiment};
use crate::options::Options;
use crate::utils::dirs;
use crate::utils::json;
use crate::utils::version::check_major_version_1;

pub fn validate(path: &Path, metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    ranged_summarized_experiment::validate(path, metadata, options)?;
    let (_, num_cols) = summarized_experiment::metadata_dimensions(metadata)?;

    if let Some(serde_json::Value::Object(obj)) = metadata.other.get("single_cell_experiment") {
        if let Some(vstring) = json::optional_string(obj, "version")? {
            check_major_version_1(vstring)?;
        }
    }

    let rd_dir = path.join("reduced_dimensions");
    if rd_dir.exists() {
        let names = dirs::read_names_json(&rd_dir)?;

        for i in 0..names.len() {
            let rd_path = rd_dir.join(i.to_string());
            crate::dispatch::validate(&rd_path, options)
                .map_err(|e| e.nested(format!("failed to validate 'reduced_dimensions/{}'", i)))?;

            let dims = crate::dispatch::dimensions(&rd_path, options)?;
            if dims.is_empty() {
                return Err(ValidationError::value(format!(
                    "object in 'reduced_dimensions/{}' should have at least one dimension",
                    i
                )));
            }
            if dims[0] != num_cols {
                return Err(ValidationError::value(format!(
                    "object in 'reduced_dimensions/{}' should have the same number of rows as \
                     the columns of its parent",
                    i
                )));
            }
        }

        if dirs::count_directory_entries(&rd_dir)? != names.len() + 1 {
            return Err(ValidationError::structure(
                "more objects than expected inside the 'reduced_dimensions' subdirectory"
                    .to_string(),
            ));
        }
    }

    let ae_dir = path.join("alternative_experiments");
    if ae_dir.exists() {
        let names = dirs::read_names_json(&ae_dir)?;

        for i in 0..names.len() {
            let ae_path = ae_dir.join(i.to_string());
            let ae_meta = read_object_metadata(&ae_path)?;
            if !crate::dispatch::satisfies_interface(
                &ae_meta.type_name,
                "SUMMARIZED_EXPERIMENT",
                options,
            ) {
                return Err(ValidationError::dispatch(format!(
                    "object in 'alternative_experiments/{}' should satisfy the \
                     'SUMMARIZED_EXPERIMENT' interface",
                    i
                )));
            }

            crate::dispatch::validate_with_metadata(&ae_path, &ae_meta, options).map_err(|e| {
                e.nested(format!(
                    "failed to validate 'alternative_experiments/{}'",
                    i
                ))
            })?;

            let dims = crate::dispatch::dimensions_with_metadata(&ae_path, &ae_meta, options)?;
            if dims.len() < 2 || dims[1] != num_cols {
                return Err(ValidationError::value(format!(
                    "object in 'alternative_experiments/{}' should have the same number of \
                     columns as its parent",
                    i
                )));
            }
        }

        if dirs::count_directory_entries(&ae_dir)? != names.len() + 1 {
            return Err(ValidationError::structure(
                "more objects than expected inside the 'alternative_experiments' subdirectory"
                    .to_string(),
            ));
        }
    }

    Ok(())
}
