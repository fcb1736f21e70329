//! Shared probes over HDF5 payload files.
//!
//! All dataset scans are block-bounded by `Options::hdf5_buffer_size`; no
//! helper materializes a dataset proportional to its full length, with the
//! sole exception of `indptr`-style offset vectors whose length is fixed by
//! the primary dimension.

use std::collections::HashSet;

use hdf5::types::{FloatSize, IntSize, TypeDescriptor, VarLenUnicode};
use ndarray::s;

use crate::error::{Result, ValidationError};
use crate::options::Options;

/// Name of the attribute holding the in-band missing value sentinel.
pub const MISSING_PLACEHOLDER: &str = "missing-value-placeholder";

/// Open a HDF5 file for reading.
pub fn open_file(path: &std::path::Path) -> Result<hdf5::File> {
    hdf5::File::open(path).map_err(|e| {
        ValidationError::structure(format!(
            "failed to open the HDF5 file at '{}'; {}",
            path.display(),
            e
        ))
    })
}

/// Open a group that must exist under `parent`.
pub fn open_group(parent: &hdf5::Group, name: &str) -> Result<hdf5::Group> {
    if !parent.link_exists(name) {
        return Err(ValidationError::structure(format!(
            "expected a '{}' group",
            name
        )));
    }
    parent
        .group(name)
        .map_err(|_| ValidationError::structure(format!("expected '{}' to be a group", name)))
}

/// Open a dataset that must exist under `parent`.
pub fn open_dataset(parent: &hdf5::Group, name: &str) -> Result<hdf5::Dataset> {
    if !parent.link_exists(name) {
        return Err(ValidationError::structure(format!(
            "expected a '{}' dataset",
            name
        )));
    }
    parent
        .dataset(name)
        .map_err(|_| ValidationError::structure(format!("expected '{}' to be a dataset", name)))
}

/// Check whether an attribute is present on a dataset or group.
pub fn attr_exists(location: &hdf5::Location, name: &str) -> Result<bool> {
    Ok(location.attr_names()?.iter().any(|n| n == name))
}

/// Load an attribute that must be a scalar string.
pub fn load_scalar_string_attr(location: &hdf5::Location, name: &str) -> Result<String> {
    if !attr_exists(location, name)? {
        return Err(ValidationError::structure(format!(
            "expected a '{}' attribute",
            name
        )));
    }
    let attr = location.attr(name)?;
    if attr.ndim() != 0 {
        return Err(ValidationError::structure(format!(
            "expected '{}' attribute to be a scalar",
            name
        )));
    }
    let value: VarLenUnicode = attr.read_scalar().map_err(|_| {
        ValidationError::structure(format!("expected '{}' attribute to be a string", name))
    })?;
    Ok(value.to_string())
}

/// Load a scalar string attribute if it is present.
pub fn load_optional_scalar_string_attr(
    location: &hdf5::Location,
    name: &str,
) -> Result<Option<String>> {
    if attr_exists(location, name)? {
        load_scalar_string_attr(location, name).map(Some)
    } else {
        Ok(None)
    }
}

/// Length of a dataset that must be 1-dimensional.
pub fn get_1d_length(dataset: &hdf5::Dataset, name: &str) -> Result<u64> {
    let shape = dataset.shape();
    if shape.len() != 1 {
        return Err(ValidationError::structure(format!(
            "expected '{}' to be a 1-dimensional dataset",
            name
        )));
    }
    Ok(shape[0] as u64)
}

/// Datatype descriptor of a dataset or attribute.
pub fn descriptor(container: &hdf5::Container) -> Result<TypeDescriptor> {
    Ok(container.dtype()?.to_descriptor()?)
}

/// Coarse datatype classes used for placeholder compatibility checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataClass {
    Integer,
    Float,
    String,
}

/// Coarse class of a datatype descriptor, if it has one.
pub fn data_class(td: &TypeDescriptor) -> Option<DataClass> {
    match td {
        TypeDescriptor::Integer(_) | TypeDescriptor::Unsigned(_) | TypeDescriptor::Boolean => {
            Some(DataClass::Integer)
        }
        TypeDescriptor::Float(_) => Some(DataClass::Float),
        TypeDescriptor::FixedAscii(_)
        | TypeDescriptor::FixedUnicode(_)
        | TypeDescriptor::VarLenAscii
        | TypeDescriptor::VarLenUnicode => Some(DataClass::String),
        _ => None,
    }
}

fn int_bits(size: &IntSize) -> u32 {
    match size {
        IntSize::U1 => 8,
        IntSize::U2 => 16,
        IntSize::U4 => 32,
        IntSize::U8 => 64,
    }
}

/// Whether a stored datatype fits losslessly into a `bits`-wide integer of
/// the requested signedness.
pub fn fits_integer(td: &TypeDescriptor, bits: u32, signed: bool) -> bool {
    match td {
        TypeDescriptor::Boolean => true,
        TypeDescriptor::Integer(size) => signed && int_bits(size) <= bits,
        TypeDescriptor::Unsigned(size) => {
            if signed {
                // Unsigned types need a spare sign bit to round-trip.
                int_bits(size) < bits
            } else {
                int_bits(size) <= bits
            }
        }
        _ => false,
    }
}

/// Whether a stored datatype fits losslessly into a 64-bit float; integers
/// up to 32 bits are representable in the mantissa.
pub fn fits_float64(td: &TypeDescriptor) -> bool {
    match td {
        TypeDescriptor::Float(FloatSize::U4) | TypeDescriptor::Float(FloatSize::U8) => true,
        TypeDescriptor::Integer(size) | TypeDescriptor::Unsigned(size) => int_bits(size) <= 32,
        TypeDescriptor::Boolean => true,
        _ => false,
    }
}

/// Fail unless the container's datatype fits the requested integer envelope.
pub fn check_integer_fits(
    container: &hdf5::Container,
    bits: u32,
    signed: bool,
    what: &str,
) -> Result<()> {
    let td = descriptor(container)?;
    if !fits_integer(&td, bits, signed) {
        return Err(ValidationError::structure(format!(
            "expected a datatype for '{}' that fits in a {}-bit {} integer",
            what,
            bits,
            if signed { "signed" } else { "unsigned" }
        )));
    }
    Ok(())
}

/// Fail unless the container's datatype fits in a 64-bit float.
pub fn check_float64(container: &hdf5::Container, what: &str) -> Result<()> {
    let td = descriptor(container)?;
    if !fits_float64(&td) {
        return Err(ValidationError::structure(format!(
            "expected a datatype for '{}' that fits in a 64-bit float",
            what
        )));
    }
    Ok(())
}

/// Whether the container holds strings.
pub fn is_string_type(container: &hdf5::Container) -> Result<bool> {
    Ok(data_class(&descriptor(container)?) == Some(DataClass::String))
}

/// Fail unless the container holds strings.
pub fn check_string_type(container: &hdf5::Container, what: &str) -> Result<()> {
    if !is_string_type(container)? {
        return Err(ValidationError::structure(format!(
            "expected a string datatype for '{}'",
            what
        )));
    }
    Ok(())
}

fn placeholder_attr(dataset: &hdf5::Dataset) -> Result<Option<hdf5::Attribute>> {
    if !attr_exists(dataset, MISSING_PLACEHOLDER)? {
        return Ok(None);
    }
    let attr = dataset.attr(MISSING_PLACEHOLDER)?;
    if attr.ndim() != 0 {
        return Err(ValidationError::structure(format!(
            "expected '{}' attribute to be a scalar",
            MISSING_PLACEHOLDER
        )));
    }
    let dataset_class = data_class(&descriptor(dataset)?);
    let attr_class = data_class(&descriptor(&attr)?);
    if dataset_class != attr_class {
        return Err(ValidationError::structure(format!(
            "expected '{}' attribute to have the same datatype class as its dataset",
            MISSING_PLACEHOLDER
        )));
    }
    Ok(Some(attr))
}

/// Load a numeric missing-value placeholder, checking its shape and class.
pub fn load_numeric_placeholder<T: hdf5::H5Type>(dataset: &hdf5::Dataset) -> Result<Option<T>> {
    match placeholder_attr(dataset)? {
        None => Ok(None),
        Some(attr) => Ok(Some(attr.read_scalar::<T>()?)),
    }
}

/// Load a string missing-value placeholder, checking its shape and class.
pub fn load_string_placeholder(dataset: &hdf5::Dataset) -> Result<Option<String>> {
    match placeholder_attr(dataset)? {
        None => Ok(None),
        Some(attr) => {
            let value: VarLenUnicode = attr.read_scalar()?;
            Ok(Some(value.to_string()))
        }
    }
}

/// Check a numeric missing-value placeholder without loading its value.
pub fn check_numeric_placeholder(dataset: &hdf5::Dataset) -> Result<()> {
    placeholder_attr(dataset).map(|_| ())
}

/// Iterate over a 1-dimensional numeric dataset in bounded blocks.
pub fn scan_numeric_blocks<T, F>(
    dataset: &hdf5::Dataset,
    len: u64,
    options: &Options,
    mut visit: F,
) -> Result<()>
where
    T: hdf5::H5Type + Clone,
    F: FnMut(u64, &[T]) -> Result<()>,
{
    let step = options.hdf5_buffer_size.max(1) as u64;
    let mut start = 0;
    while start < len {
        let end = (start + step).min(len);
        let block = dataset.read_slice_1d::<T, _>(s![start as usize..end as usize])?;
        visit(start, &block.to_vec())?;
        start = end;
    }
    Ok(())
}

/// Iterate over a 1-dimensional string dataset in bounded blocks.
pub fn scan_string_blocks<F>(
    dataset: &hdf5::Dataset,
    len: u64,
    options: &Options,
    mut visit: F,
) -> Result<()>
where
    F: FnMut(u64, &[String]) -> Result<()>,
{
    let step = options.hdf5_buffer_size.max(1) as u64;
    let mut start = 0;
    while start < len {
        let end = (start + step).min(len);
        let block = dataset.read_slice_1d::<VarLenUnicode, _>(s![start as usize..end as usize])?;
        let strings: Vec<String> = block.iter().map(|x| x.to_string()).collect();
        visit(start, &strings)?;
        start = end;
    }
    Ok(())
}

/// Iterate over an N-dimensional string dataset in blocks of whole
/// hyperplanes along the slowest-changing dimension, keeping each block
/// within the configured buffer size where possible.
pub fn scan_string_blocks_nd<F>(dataset: &hdf5::Dataset, options: &Options, mut visit: F) -> Result<()>
where
    F: FnMut(&[String]) -> Result<()>,
{
    let shape = dataset.shape();
    if shape.is_empty() || shape.iter().any(|&d| d == 0) {
        return Ok(());
    }

    let inner: usize = shape[1..].iter().product();
    let rows_per_block = (options.hdf5_buffer_size.max(1) / inner.max(1)).max(1);

    let mut start = 0;
    while start < shape[0] {
        let end = (start + rows_per_block).min(shape[0]);

        let mut elems: Vec<ndarray::SliceInfoElem> = vec![ndarray::SliceInfoElem::Slice {
            start: start as isize,
            end: Some(end as isize),
            step: 1,
        }];
        elems.extend(shape[1..].iter().map(|_| ndarray::SliceInfoElem::Slice {
            start: 0,
            end: None,
            step: 1,
        }));
        let info =
            ndarray::SliceInfo::<_, ndarray::IxDyn, ndarray::IxDyn>::try_from(elems)
                .map_err(|e| ValidationError::structure(format!("invalid slice; {}", e)))?;

        let block = dataset.read_slice::<VarLenUnicode, _, ndarray::IxDyn>(info)?;
        let strings: Vec<String> = block.iter().map(|x| x.to_string()).collect();
        visit(&strings)?;

        start = end;
    }

    Ok(())
}

/// Stream through a string dataset, checking that every element is loadable
/// as a valid string.
pub fn validate_1d_string_dataset(
    dataset: &hdf5::Dataset,
    len: u64,
    options: &Options,
) -> Result<()> {
    scan_string_blocks(dataset, len, options, |_, _| Ok(()))
}

/// Read an entire 1-dimensional string dataset; only for datasets whose
/// length is already bounded by a parent invariant (e.g., column names).
pub fn read_string_vec(dataset: &hdf5::Dataset, len: u64, options: &Options) -> Result<Vec<String>> {
    let mut collected = Vec::with_capacity(len as usize);
    scan_string_blocks(dataset, len, options, |_, block| {
        collected.extend_from_slice(block);
        Ok(())
    })?;
    Ok(collected)
}

/// Validate an optional `names`-style string dataset against the length of
/// its parent object.
pub fn validate_names(
    group: &hdf5::Group,
    name: &str,
    expected: u64,
    options: &Options,
) -> Result<()> {
    if !group.link_exists(name) {
        return Ok(());
    }
    let nhandle = open_dataset(group, name)?;
    check_string_type(&nhandle, name)?;
    let nlen = get_1d_length(&nhandle, name)?;
    if nlen != expected {
        return Err(ValidationError::structure(format!(
            "'{}' should have the same length as the parent object (got {}, expected {})",
            name, nlen, expected
        )));
    }
    validate_1d_string_dataset(&nhandle, nlen, options)
}

/// Validate factor levels: a 1-dimensional string dataset without duplicates.
/// Returns the number of levels.
pub fn validate_factor_levels(
    group: &hdf5::Group,
    name: &str,
    options: &Options,
) -> Result<u64> {
    let lhandle = open_dataset(group, name)?;
    check_string_type(&lhandle, name)?;
    let len = get_1d_length(&lhandle, name)?;

    let mut present = HashSet::with_capacity(len as usize);
    scan_string_blocks(&lhandle, len, options, |_, block| {
        for x in block {
            if !present.insert(x.clone()) {
                return Err(ValidationError::value(format!(
                    "'{}' contains duplicated factor level '{}'",
                    name, x
                )));
            }
        }
        Ok(())
    })?;

    Ok(len)
}

/// Validate factor codes against the number of levels.  Returns the number
/// of codes.
pub fn validate_factor_codes(
    group: &hdf5::Group,
    name: &str,
    num_levels: u64,
    options: &Options,
    allow_missing: bool,
) -> Result<u64> {
    let chandle = open_dataset(group, name)?;
    check_integer_fits(&chandle, 32, true, name)?;

    let placeholder = if allow_missing {
        load_numeric_placeholder::<i32>(&chandle)?
    } else {
        None
    };

    let len = get_1d_length(&chandle, name)?;
    scan_numeric_blocks::<i32, _>(&chandle, len, options, |_, block| {
        for &x in block {
            if placeholder == Some(x) {
                continue;
            }
            if x < 0 {
                return Err(ValidationError::value(
                    "expected factor codes to be non-negative".to_string(),
                ));
            }
            if (x as u64) >= num_levels {
                return Err(ValidationError::value(
                    "expected factor codes to be less than the number of levels".to_string(),
                ));
            }
        }
        Ok(())
    })?;

    Ok(len)
}

/// Check the optional `ordered` attribute attached to factor-like groups.
pub fn check_ordered_attribute(location: &hdf5::Location) -> Result<()> {
    if !attr_exists(location, "ordered")? {
        return Ok(());
    }
    let attr = location.attr("ordered")?;
    if attr.ndim() != 0 {
        return Err(ValidationError::structure(
            "expected 'ordered' attribute to be a scalar".to_string(),
        ));
    }
    let td = descriptor(&attr)?;
    if !fits_integer(&td, 32, true) {
        return Err(ValidationError::structure(
            "expected 'ordered' attribute to have a datatype that fits in a 32-bit signed integer"
                .to_string(),
        ));
    }
    Ok(())
}


/// Validate a dimnames-style group: for each dimension `d`, an optional
/// string dataset named `d` whose length equals the extent of that
/// dimension.
pub fn validate_dimnames(
    parent: &hdf5::Group,
    name: &str,
    dimensions: &[u64],
    options: &Options,
) -> Result<()> {
    let nhandle = parent
        .group(name)
        .map_err(|_| ValidationError::structure(format!("expected '{}' to be a group", name)))?;

    for (d, &extent) in dimensions.iter().enumerate() {
        let dname = d.to_string();
        if !nhandle.link_exists(&dname) {
            continue;
        }

        let dhandle = nhandle.dataset(&dname).map_err(|_| {
            ValidationError::structure(format!("expected '{}/{}' to be a dataset", name, dname))
        })?;
        let len = get_1d_length(&dhandle, &dname)?;
        if len != extent {
            return Err(ValidationError::structure(format!(
                "expected '{}/{}' to have the same length as the extent of the corresponding \
                 dimension (got {}, expected {})",
                name, dname, len, extent
            )));
        }
        if !is_string_type(&dhandle)? {
            return Err(ValidationError::structure(format!(
                "expected '{}/{}' to have a string datatype class",
                name, dname
            )));
        }
        validate_1d_string_dataset(&dhandle, len, options)?;
    }

    Ok(())
}
