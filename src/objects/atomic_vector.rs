//! Validation for atomic vectors.

use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::metadata::ObjectMetadata;
use crate::options::Options;
use crate::utils::hdf5 as h5;
use crate::utils::strings;
use crate::utils::version::check_major_version_1;

/// Validate the string payload of an atomic vector or data frame column
/// against its declared format, skipping placeholder matches.
pub(crate) fn validate_string_format(
    dataset: &hdf5::Dataset,
    len: u64,
    format: &str,
    placeholder: Option<&str>,
    options: &Options,
) -> Result<()> {
    match format {
        "date" => h5::scan_string_blocks(dataset, len, options, |_, block| {
            for x in block {
                if placeholder == Some(x.as_str()) {
                    continue;
                }
                if !strings::is_date(x) {
                    return Err(ValidationError::value(format!(
                        "expected a date-formatted string (got '{}')",
                        x
                    )));
                }
            }
            Ok(())
        }),
        "date-time" => h5::scan_string_blocks(dataset, len, options, |_, block| {
            for x in block {
                if placeholder == Some(x.as_str()) {
                    continue;
                }
                if !strings::is_rfc3339(x) {
                    return Err(ValidationError::value(format!(
                        "expected a date/time-formatted string (got '{}')",
                        x
                    )));
                }
            }
            Ok(())
        }),
        "none" => h5::validate_1d_string_dataset(dataset, len, options),
        _ => Err(ValidationError::value(format!(
            "unsupported format '{}'",
            format
        ))),
    }
}

pub fn validate(path: &Path, _metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    let handle = h5::open_file(&path.join("contents.h5"))?;
    let ghandle = h5::open_group(&handle, "atomic_vector")?;

    let vstring = h5::load_scalar_string_attr(&ghandle, "version")?;
    check_major_version_1(&vstring)?;

    let dhandle = h5::open_dataset(&ghandle, "values")?;
    let vlen = h5::get_1d_length(&dhandle, "values")?;
    let vtype = h5::load_scalar_string_attr(&ghandle, "type")?;

    match vtype.as_str() {
        "string" => {
            h5::check_string_type(&dhandle, "values")?;
            let placeholder = h5::load_string_placeholder(&dhandle)?;
            let format = h5::load_optional_scalar_string_attr(&ghandle, "format")?
                .unwrap_or_else(|| "none".to_string());
            validate_string_format(&dhandle, vlen, &format, placeholder.as_deref(), options)?;
        }
        "integer" | "boolean" => {
            if !h5::fits_integer(&h5::descriptor(&dhandle)?, 32, true) {
                return Err(ValidationError::structure(
                    "expected a datatype for 'values' that fits in a 32-bit signed integer"
                        .to_string(),
                ));
            }
            h5::check_numeric_placeholder(&dhandle)?;
        }
        "number" => {
            h5::check_float64(&dhandle, "values")?;
            h5::check_numeric_placeholder(&dhandle)?;
        }
        _ => {
            return Err(ValidationError::value(format!(
                "unsupported type '{}'",
                vtype
            )));
        }
    }

    if ghandle.link_exists("names") {
        let nhandle = h5::open_dataset(&ghandle, "names")?;
        h5::check_string_type(&nhandle, "names")?;
        let nlen = h5::get_1d_length(&nhandle, "names")?;
        if vlen != nlen {
            return Err(ValidationError::structure(
                "'names' and 'values' should have the same length".to_string(),
            ));
        }
        h5::validate_1d_string_dataset(&nhandle, nlen, options)?;
    }

    Ok(())
}

pub fn height(path: &Path, _metadata: &ObjectMetadata, _options: &Options) -> Result<u64> {
    let handle = h5::open_file(&path.join("contents.h5"))?;
    let ghandle = h5::open_group(&handle, "atomic_vector")?;
    let dhandle = h5::open_dataset(&ghandle, "values")?;
    h5::get_1d_length(&dhandle, "values")
}
