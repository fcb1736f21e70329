//! Validation of hierarchical on-disk object stores for bioinformatics.
//!
//! An object is a directory with an `OBJECT` metadata file declaring its
//! type, plus type-specific payload files (HDF5, gzip/bgzip text, JSON,
//! binary).  The crate answers three questions per directory: is it a valid
//! object of its declared type ([`validate`]), what is its leading extent
//! ([`height`]), and what is its full extent vector ([`dimensions`])?
//!
//! Containers recurse: validating a `summarized_experiment` validates all of
//! its assays, annotations and nested experiments.  Applications can
//! register custom object types and per-format strict checks through
//! [`Options`].

pub mod delayed;
pub mod dispatch;
pub mod error;
pub mod list_contents;
pub mod metadata;
pub mod objects;
pub mod options;
pub mod registry;
pub mod utils;

#[cfg(test)]
pub mod test_utils;

pub use dispatch::{
    derived_from, dimensions, dimensions_with_metadata, height, height_with_metadata,
    satisfies_interface, validate, validate_with_metadata,
};
pub use error::{Result, ValidationError};
pub use metadata::{read_object_metadata, ObjectMetadata};
pub use options::Options;
pub use registry::CustomRegistry;

/// The version of the `bioshelf` crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
