//! Walker for delayed-operation graphs.
//!
//! A delayed array payload is a tree of HDF5 groups, each tagged with a
//! `delayed_type` of either `operation` (with a nested `seed`) or `array`
//! (a leaf).  Leaf handling is pluggable through a registry keyed by the
//! `delayed_array` type string, so applications can attach their own seed
//! semantics; unregistered leaves fall back to the generic custom-array
//! layout of a `dimensions` dataset plus a `type` attribute.

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{Result, ValidationError};
use crate::options::Options;
use crate::utils::hdf5 as h5;

/// Element type of a delayed array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
pub enum ArrayKind {
    #[strum(serialize = "boolean")]
    Boolean,
    #[strum(serialize = "integer")]
    Integer,
    #[strum(serialize = "number")]
    Number,
    #[strum(serialize = "string")]
    String,
}

/// Details reported by a leaf validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayDetails {
    pub kind: ArrayKind,
    pub dimensions: Vec<u64>,
}

/// User-registered validator for a delayed array leaf.
pub type ArrayValidateFn = Arc<dyn Fn(&hdf5::Group) -> Result<ArrayDetails> + Send + Sync>;

/// Options for the delayed-operation sub-validator.
#[derive(Clone, Default)]
pub struct DelayedOptions {
    /// Extra leaf validators, keyed by the `delayed_array` type string.
    pub array_validators: IndexMap<String, ArrayValidateFn>,
}

impl std::fmt::Debug for DelayedOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelayedOptions")
            .field(
                "array_validators",
                &self.array_validators.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Parse the generic custom-array layout: a `dimensions` dataset plus a
/// scalar `type` attribute.
pub fn custom_array_details(ghandle: &hdf5::Group) -> Result<ArrayDetails> {
    let dhandle = h5::open_dataset(ghandle, "dimensions")?;
    h5::check_integer_fits(&dhandle, 64, false, "dimensions")?;
    let len = h5::get_1d_length(&dhandle, "dimensions")?;
    if len == 0 {
        return Err(ValidationError::structure(
            "expected 'dimensions' to be non-empty".to_string(),
        ));
    }
    let dimensions = dhandle.read_raw::<u64>()?;

    let tstring = h5::load_scalar_string_attr(ghandle, "type")?;
    let kind: ArrayKind = tstring
        .parse()
        .map_err(|_| ValidationError::value(format!("unknown array type '{}'", tstring)))?;

    Ok(ArrayDetails { kind, dimensions })
}

/// Per-call walker over a delayed-operation graph.
pub(crate) struct GraphValidator<'a> {
    pub array_validators: IndexMap<String, Box<dyn Fn(&hdf5::Group) -> Result<ArrayDetails> + 'a>>,
    pub options: &'a Options,
}

impl<'a> GraphValidator<'a> {
    /// Build a walker carrying the user-registered leaf validators.
    pub fn new(options: &'a Options) -> Self {
        let mut array_validators: IndexMap<
            String,
            Box<dyn Fn(&hdf5::Group) -> Result<ArrayDetails> + 'a>,
        > = IndexMap::new();
        for (key, function) in &options.delayed_array.array_validators {
            let function = function.clone();
            array_validators.insert(key.clone(), Box::new(move |g| function(g)));
        }
        Self {
            array_validators,
            options,
        }
    }

    pub fn validate_file(&self, path: &Path, group_name: &str) -> Result<ArrayDetails> {
        let handle = h5::open_file(path)?;
        let ghandle = h5::open_group(&handle, group_name)?;
        self.walk(&ghandle)
    }

    fn walk(&self, ghandle: &hdf5::Group) -> Result<ArrayDetails> {
        match h5::load_scalar_string_attr(ghandle, "delayed_type")?.as_str() {
            "array" => self.walk_array(ghandle),
            "operation" => self.walk_operation(ghandle),
            other => Err(ValidationError::value(format!(
                "unknown 'delayed_type' value '{}'",
                other
            ))),
        }
    }

    fn walk_array(&self, ghandle: &hdf5::Group) -> Result<ArrayDetails> {
        let atype = h5::load_scalar_string_attr(ghandle, "delayed_array")?;
        if let Some(function) = self.array_validators.get(&atype) {
            return function(ghandle);
        }
        custom_array_details(ghandle)
            .map_err(|e| e.nested(format!("failed to validate array of type '{}'", atype)))
    }

    fn walk_operation(&self, ghandle: &hdf5::Group) -> Result<ArrayDetails> {
        let operation = h5::load_scalar_string_attr(ghandle, "delayed_operation")?;
        let seed = h5::open_group(ghandle, "seed")?;
        let details = self
            .walk(&seed)
            .map_err(|e| e.nested(format!("failed to validate seed of '{}'", operation)))?;

        match operation.as_str() {
            "transpose" => self.apply_transpose(ghandle, details),
            "subset" => self.apply_subset(ghandle, details),
            "dimnames" => self.apply_dimnames(ghandle, details),
            other => Err(ValidationError::value(format!(
                "unknown 'delayed_operation' value '{}'",
                other
            ))),
        }
    }

    fn apply_transpose(&self, ghandle: &hdf5::Group, details: ArrayDetails) -> Result<ArrayDetails> {
        let phandle = h5::open_dataset(ghandle, "permutation")?;
        h5::check_integer_fits(&phandle, 64, false, "permutation")?;
        let ndim = details.dimensions.len() as u64;
        if h5::get_1d_length(&phandle, "permutation")? != ndim {
            return Err(ValidationError::structure(
                "'permutation' should have length equal to the dimensionality of the seed"
                    .to_string(),
            ));
        }

        let permutation = phandle.read_raw::<u64>()?;
        let mut seen = vec![false; ndim as usize];
        let mut dimensions = Vec::with_capacity(ndim as usize);
        for &p in &permutation {
            if p >= ndim || seen[p as usize] {
                return Err(ValidationError::value(
                    "'permutation' should be a permutation of the seed's dimensions".to_string(),
                ));
            }
            seen[p as usize] = true;
            dimensions.push(details.dimensions[p as usize]);
        }

        Ok(ArrayDetails {
            kind: details.kind,
            dimensions,
        })
    }

    fn apply_subset(&self, ghandle: &hdf5::Group, details: ArrayDetails) -> Result<ArrayDetails> {
        let ihandle = h5::open_group(ghandle, "index")?;
        let mut dimensions = details.dimensions.clone();

        for (d, extent) in details.dimensions.iter().enumerate() {
            let dname = d.to_string();
            if !ihandle.link_exists(&dname) {
                continue;
            }
            let dhandle = h5::open_dataset(&ihandle, &dname)?;
            h5::check_integer_fits(&dhandle, 64, false, &format!("index/{}", dname))?;
            let len = h5::get_1d_length(&dhandle, &dname)?;
            h5::scan_numeric_blocks::<u64, _>(&dhandle, len, self.options, |_, block| {
                if block.iter().any(|&x| x >= *extent) {
                    return Err(ValidationError::value(format!(
                        "entries of 'index/{}' should be less than the seed's dimension extent",
                        dname
                    )));
                }
                Ok(())
            })?;
            dimensions[d] = len;
        }

        Ok(ArrayDetails {
            kind: details.kind,
            dimensions,
        })
    }

    fn apply_dimnames(&self, ghandle: &hdf5::Group, details: ArrayDetails) -> Result<ArrayDetails> {
        h5::validate_dimnames(ghandle, "dimnames", &details.dimensions, self.options)
            .map_err(|e| e.nested("failed to validate 'dimnames'"))?;
        Ok(details)
    }
}
