//! Validation of serialized R-style lists.
//!
//! This implements the "list serialization" contract used by `simple_list`
//! payloads, in both its gzipped-JSON and HDF5 representations.  A list is a
//! tree of typed nodes; leaf vectors carry the same datatype envelopes as
//! atomic vectors, and `external` nodes reference objects stored as
//! subdirectories next to the payload.

pub mod hdf5;
pub mod json;
