//! Error type for object store validation.

use std::path::Path;

/// Result type used throughout this crate.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Failure raised while validating an on-disk object.
///
/// The variants encode the failure category rather than the object type;
/// provenance is carried by nested [`ValidationError::Context`] layers that
/// each enclosing validator wraps around the inner cause.
#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    /// A required file, group, dataset or attribute is missing or has the
    /// wrong shape or datatype class.
    #[error("{0}")]
    Structure(String),

    /// Data is present and well-shaped but violates an invariant.
    #[error("{0}")]
    Value(String),

    /// A version string could not be parsed or has an unsupported major
    /// version.
    #[error("{0}")]
    Version(String),

    /// No registered function for an object type, or a declared type does
    /// not satisfy a required interface.
    #[error("{0}")]
    Dispatch(String),

    /// Error propagated from the HDF5 library.
    #[error("{0}")]
    Hdf5(#[from] hdf5::Error),

    /// Error propagated from the JSON parser.
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// Error propagated from the operating system.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Error propagated from an application-supplied strict-check callback.
    #[error("{0}")]
    Propagated(anyhow::Error),

    /// Provenance wrapper applied by each enclosing validator.
    #[error("failed to validate '{type_name}' object at '{path}'; {source}")]
    Context {
        /// Declared type of the object that failed.
        type_name: String,
        /// Path to the directory representing the object.
        path: String,
        /// The inner cause.
        #[source]
        source: Box<ValidationError>,
    },

    /// Provenance wrapper for a named component of an object, e.g., a
    /// sibling annotation directory.
    #[error("{label}; {source}")]
    Nested {
        /// Description of the failing component.
        label: String,
        /// The inner cause.
        #[source]
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    pub fn structure(msg: impl Into<String>) -> Self {
        ValidationError::Structure(msg.into())
    }

    pub fn value(msg: impl Into<String>) -> Self {
        ValidationError::Value(msg.into())
    }

    pub fn version(msg: impl Into<String>) -> Self {
        ValidationError::Version(msg.into())
    }

    pub fn dispatch(msg: impl Into<String>) -> Self {
        ValidationError::Dispatch(msg.into())
    }

    /// Wrap this error with the type and path of the enclosing object.
    pub fn with_context(self, type_name: &str, path: &Path) -> Self {
        ValidationError::Context {
            type_name: type_name.to_string(),
            path: path.display().to_string(),
            source: Box::new(self),
        }
    }

    /// Wrap this error with a description of the failing component.
    pub fn nested(self, label: impl Into<String>) -> Self {
        ValidationError::Nested {
            label: label.into(),
            source: Box::new(self),
        }
    }

    /// The innermost failure, unwrapping all provenance layers.
    pub fn root_cause(&self) -> &ValidationError {
        let mut current = self;
        loop {
            match current {
                ValidationError::Context { source, .. }
                | ValidationError::Nested { source, .. } => current = source,
                _ => return current,
            }
        }
    }
}

impl From<anyhow::Error> for ValidationError {
    fn from(e: anyhow::Error) -> Self {
        ValidationError::Propagated(e)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::ValidationError;

    #[test]
    fn context_chain() {
        let inner = ValidationError::value("expected factor codes to be non-negative");
        let mid = inner.with_context("string_factor", std::path::Path::new("x/column_data"));
        let outer = mid.with_context("data_frame", std::path::Path::new("x"));
        assert_eq!(
            outer.to_string(),
            "failed to validate 'data_frame' object at 'x'; \
             failed to validate 'string_factor' object at 'x/column_data'; \
             expected factor codes to be non-negative"
        );
        assert!(matches!(outer.root_cause(), ValidationError::Value(_)));
    }
}
