//! Validation for data frames.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::metadata::ObjectMetadata;
use crate::objects::atomic_vector::validate_string_format;
use crate::options::Options;
use crate::utils::hdf5 as h5;
use crate::utils::version::check_major_version_1;

fn load_row_count(ghandle: &hdf5::Group) -> Result<u64> {
    if !h5::attr_exists(ghandle, "row-count")? {
        return Err(ValidationError::structure(
            "expected a 'row-count' attribute".to_string(),
        ));
    }
    let attr = ghandle.attr("row-count")?;
    if attr.ndim() != 0 {
        return Err(ValidationError::structure(
            "expected 'row-count' attribute to be a scalar".to_string(),
        ));
    }
    let td = h5::descriptor(&attr)?;
    if !h5::fits_integer(&td, 64, false) {
        return Err(ValidationError::structure(
            "expected a datatype for 'row-count' that fits in a 64-bit unsigned integer"
                .to_string(),
        ));
    }
    Ok(attr.read_scalar::<u64>()?)
}

fn validate_column_names(ghandle: &hdf5::Group, options: &Options) -> Result<u64> {
    let cnhandle = h5::open_dataset(ghandle, "column_names")?;
    h5::check_string_type(&cnhandle, "column_names")?;
    let num_columns = h5::get_1d_length(&cnhandle, "column_names")?;

    let mut present = HashSet::with_capacity(num_columns as usize);
    h5::scan_string_blocks(&cnhandle, num_columns, options, |_, block| {
        for name in block {
            if name.is_empty() {
                return Err(ValidationError::value(
                    "column names should not be empty".to_string(),
                ));
            }
            if !present.insert(name.clone()) {
                return Err(ValidationError::value(format!(
                    "duplicated column name '{}'",
                    name
                )));
            }
        }
        Ok(())
    })?;

    Ok(num_columns)
}

fn validate_factor_column(
    fhandle: &hdf5::Group,
    column: &str,
    num_rows: u64,
    options: &Options,
) -> Result<()> {
    h5::check_ordered_attribute(fhandle)?;
    let num_levels = h5::validate_factor_levels(fhandle, "levels", options)?;
    let num_codes = h5::validate_factor_codes(fhandle, "codes", num_levels, options, true)?;
    if num_codes != num_rows {
        return Err(ValidationError::structure(format!(
            "expected column {} to have length equal to the number of rows",
            column
        )));
    }
    Ok(())
}

fn validate_typed_column(
    xhandle: &hdf5::Dataset,
    column: &str,
    num_rows: u64,
    options: &Options,
) -> Result<()> {
    if h5::get_1d_length(xhandle, column)? != num_rows {
        return Err(ValidationError::structure(format!(
            "expected column {} to have length equal to the number of rows",
            column
        )));
    }

    let ctype = h5::load_scalar_string_attr(xhandle, "type")?;
    match ctype.as_str() {
        "integer" | "boolean" => {
            if !h5::fits_integer(&h5::descriptor(xhandle)?, 32, true) {
                return Err(ValidationError::structure(format!(
                    "expected a datatype for column {} that fits in a 32-bit signed integer",
                    column
                )));
            }
            h5::check_numeric_placeholder(xhandle)?;
        }
        "number" => {
            h5::check_float64(xhandle, column)?;
            h5::check_numeric_placeholder(xhandle)?;
        }
        "string" => {
            h5::check_string_type(xhandle, column)?;
            let placeholder = h5::load_string_placeholder(xhandle)?;
            let format = h5::load_optional_scalar_string_attr(xhandle, "format")?
                .unwrap_or_else(|| "none".to_string());
            validate_string_format(xhandle, num_rows, &format, placeholder.as_deref(), options)?;
        }
        _ => {
            return Err(ValidationError::value(format!(
                "unknown type '{}' for column {}",
                ctype, column
            )));
        }
    }

    Ok(())
}

pub fn validate(path: &Path, _metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    let handle = h5::open_file(&path.join("basic_columns.h5"))?;
    let ghandle = h5::open_group(&handle, "data_frame")?;

    let vstring = h5::load_scalar_string_attr(&ghandle, "version")?;
    check_major_version_1(&vstring)?;

    let num_rows = load_row_count(&ghandle)?;
    let num_columns = validate_column_names(&ghandle, options)?;

    if ghandle.link_exists("row_names") {
        let rnhandle = h5::open_dataset(&ghandle, "row_names")?;
        h5::check_string_type(&rnhandle, "row_names")?;
        if h5::get_1d_length(&rnhandle, "row_names")? != num_rows {
            return Err(ValidationError::structure(
                "expected 'row_names' to have length equal to the number of rows".to_string(),
            ));
        }
        h5::validate_1d_string_dataset(&rnhandle, num_rows, options)?;
    }

    let dhandle = h5::open_group(&ghandle, "data")?;

    let mut found = 0;
    for c in 0..num_columns {
        let column = c.to_string();
        if dhandle.link_exists(&column) {
            if let Ok(fhandle) = dhandle.group(&column) {
                let ftype = h5::load_scalar_string_attr(&fhandle, "type")?;
                if ftype != "factor" {
                    return Err(ValidationError::value(format!(
                        "expected 'type' attribute of column {} to be 'factor'",
                        column
                    )));
                }
                validate_factor_column(&fhandle, &column, num_rows, options)?;
            } else {
                let xhandle = h5::open_dataset(&dhandle, &column)?;
                validate_typed_column(&xhandle, &column, num_rows, options)?;
            }
            found += 1;
        } else {
            // Columns absent from 'data' live as objects in their own right.
            let other_dir = path.join("other_columns").join(&column);
            crate::dispatch::validate(&other_dir, options)
                .map_err(|e| e.nested(format!("failed to validate column {}", column)))?;
            if crate::dispatch::height(&other_dir, options)? != num_rows {
                return Err(ValidationError::value(format!(
                    "expected column {} to have height equal to the number of rows",
                    column
                )));
            }
        }
    }

    if found != dhandle.member_names()?.len() {
        return Err(ValidationError::structure(
            "more objects present in the 'data' group than expected".to_string(),
        ));
    }

    Ok(())
}

pub fn height(path: &Path, _metadata: &ObjectMetadata, _options: &Options) -> Result<u64> {
    let handle = h5::open_file(&path.join("basic_columns.h5"))?;
    let ghandle = h5::open_group(&handle, "data_frame")?;
    load_row_count(&ghandle)
}

pub fn dimensions(path: &Path, _metadata: &ObjectMetadata, _options: &Options) -> Result<Vec<u64>> {
    let handle = h5::open_file(&path.join("basic_columns.h5"))?;
    let ghandle = h5::open_group(&handle, "data_frame")?;
    let num_rows = load_row_count(&ghandle)?;
    let cnhandle = h5::open_dataset(&ghandle, "column_names")?;
    let num_columns = h5::get_1d_length(&cnhandle, "column_names")?;
    Ok(vec![num_rows, num_columns])
}
