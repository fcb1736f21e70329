//! HDF5 representation of serialized lists.

use std::collections::HashSet;

use crate::error::{Result, ValidationError};
use crate::objects::atomic_vector::validate_string_format;
use crate::options::Options;
use crate::utils::hdf5 as h5;
use crate::utils::version::check_major_version_1;

struct Walker<'a> {
    externals: HashSet<u64>,
    num_external: u64,
    options: &'a Options,
}

/// Validate a list stored as a HDF5 group hierarchy.  Returns the length of
/// the top-level list.
pub fn validate(ghandle: &hdf5::Group, num_external: u64, options: &Options) -> Result<u64> {
    if let Some(vstring) = h5::load_optional_scalar_string_attr(ghandle, "version")? {
        check_major_version_1(&vstring)?;
    }

    let mut walker = Walker {
        externals: HashSet::new(),
        num_external,
        options,
    };

    if node_kind(ghandle)? != "list" {
        return Err(ValidationError::structure(
            "expected the top-level node to be a list".to_string(),
        ));
    }
    let length = walker.walk_list(ghandle)?;

    if walker.externals.len() as u64 != num_external {
        return Err(ValidationError::value(format!(
            "fewer 'external' references than subdirectories (got {}, expected {})",
            walker.externals.len(),
            num_external
        )));
    }

    Ok(length)
}

/// Length of the top-level list, without validating the rest of the tree.
pub fn list_length(ghandle: &hdf5::Group) -> Result<u64> {
    let dhandle = h5::open_group(ghandle, "data")?;
    Ok(dhandle.member_names()?.len() as u64)
}

fn node_kind(ghandle: &hdf5::Group) -> Result<String> {
    h5::load_scalar_string_attr(ghandle, "object")
}

impl Walker<'_> {
    fn walk_list(&mut self, ghandle: &hdf5::Group) -> Result<u64> {
        let dhandle = h5::open_group(ghandle, "data")?;
        let length = dhandle.member_names()?.len() as u64;

        for i in 0..length {
            let child = h5::open_group(&dhandle, &i.to_string())
                .map_err(|e| e.nested(format!("failed to walk list element {}", i)))?;
            self.walk(&child)
                .map_err(|e| e.nested(format!("failed to walk list element {}", i)))?;
        }

        h5::validate_names(ghandle, "names", length, self.options)?;
        Ok(length)
    }

    fn walk(&mut self, ghandle: &hdf5::Group) -> Result<()> {
        match node_kind(ghandle)?.as_str() {
            "list" => {
                self.walk_list(ghandle)?;
            }
            "nothing" => {}
            "external" => {
                let ihandle = h5::open_dataset(ghandle, "index")?;
                h5::check_integer_fits(&ihandle, 64, false, "index")?;
                let index = ihandle.read_scalar::<u64>()?;
                if index >= self.num_external {
                    return Err(ValidationError::value(format!(
                        "external index {} is out of range",
                        index
                    )));
                }
                if !self.externals.insert(index) {
                    return Err(ValidationError::value(format!(
                        "external index {} is referenced more than once",
                        index
                    )));
                }
            }
            "vector" => self.walk_vector(ghandle)?,
            other => {
                return Err(ValidationError::value(format!(
                    "unknown node type '{}'",
                    other
                )));
            }
        }
        Ok(())
    }

    fn walk_vector(&mut self, ghandle: &hdf5::Group) -> Result<()> {
        let vtype = h5::load_scalar_string_attr(ghandle, "type")?;

        let length = match vtype.as_str() {
            "integer" | "boolean" => {
                let dhandle = h5::open_dataset(ghandle, "data")?;
                if !h5::fits_integer(&h5::descriptor(&dhandle)?, 32, true) {
                    return Err(ValidationError::structure(
                        "expected a datatype for 'data' that fits in a 32-bit signed integer"
                            .to_string(),
                    ));
                }
                h5::check_numeric_placeholder(&dhandle)?;
                h5::get_1d_length(&dhandle, "data")?
            }
            "number" => {
                let dhandle = h5::open_dataset(ghandle, "data")?;
                h5::check_float64(&dhandle, "data")?;
                h5::check_numeric_placeholder(&dhandle)?;
                h5::get_1d_length(&dhandle, "data")?
            }
            "string" => {
                let dhandle = h5::open_dataset(ghandle, "data")?;
                h5::check_string_type(&dhandle, "data")?;
                let len = h5::get_1d_length(&dhandle, "data")?;
                let placeholder = h5::load_string_placeholder(&dhandle)?;
                let format = h5::load_optional_scalar_string_attr(ghandle, "format")?
                    .unwrap_or_else(|| "none".to_string());
                validate_string_format(&dhandle, len, &format, placeholder.as_deref(), self.options)?;
                len
            }
            "factor" => {
                h5::check_ordered_attribute(ghandle)?;
                let num_levels = h5::validate_factor_levels(ghandle, "levels", self.options)?;
                h5::validate_factor_codes(ghandle, "data", num_levels, self.options, true)?
            }
            other => {
                return Err(ValidationError::value(format!(
                    "unknown vector type '{}'",
                    other
                )));
            }
        };

        h5::validate_names(ghandle, "names", length, self.options)?;
        Ok(())
    }
}
