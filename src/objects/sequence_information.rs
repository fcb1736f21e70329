//! Validation for reference sequence information.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::metadata::ObjectMetadata;
use crate::options::Options;
use crate::utils::hdf5 as h5;
use crate::utils::version::check_major_version_1;

/// Per-sequence limits extracted for range checks in `genomic_ranges`.
pub(crate) struct SequenceLimits {
    /// Known (non-missing) length for each sequence, if any.
    pub seqlen: Vec<u64>,
    /// Whether ranges on this sequence are restricted to `[1, seqlen]`,
    /// i.e., the length is known and the sequence is not circular.  A
    /// missing circular flag counts as non-circular.
    pub restricted: Vec<bool>,
}

pub fn validate(path: &Path, _metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    let handle = h5::open_file(&path.join("info.h5"))?;
    let ghandle = h5::open_group(&handle, "sequence_information")?;

    let vstring = h5::load_scalar_string_attr(&ghandle, "version")?;
    check_major_version_1(&vstring)?;

    let nhandle = h5::open_dataset(&ghandle, "name")?;
    h5::check_string_type(&nhandle, "name")?;
    let num_sequences = h5::get_1d_length(&nhandle, "name")?;

    let mut present = HashSet::with_capacity(num_sequences as usize);
    h5::scan_string_blocks(&nhandle, num_sequences, options, |_, block| {
        for x in block {
            if !present.insert(x.clone()) {
                return Err(ValidationError::value(format!(
                    "duplicated sequence name '{}'",
                    x
                )));
            }
        }
        Ok(())
    })?;

    let lhandle = h5::open_dataset(&ghandle, "length")?;
    h5::check_integer_fits(&lhandle, 32, false, "length")?;
    if h5::get_1d_length(&lhandle, "length")? != num_sequences {
        return Err(ValidationError::structure(
            "'length' should have the same length as 'name'".to_string(),
        ));
    }
    h5::check_numeric_placeholder(&lhandle)?;

    let chandle = h5::open_dataset(&ghandle, "circular")?;
    h5::check_integer_fits(&chandle, 32, true, "circular")?;
    if h5::get_1d_length(&chandle, "circular")? != num_sequences {
        return Err(ValidationError::structure(
            "'circular' should have the same length as 'name'".to_string(),
        ));
    }
    h5::check_numeric_placeholder(&chandle)?;

    let genome = h5::open_dataset(&ghandle, "genome")?;
    h5::check_string_type(&genome, "genome")?;
    if h5::get_1d_length(&genome, "genome")? != num_sequences {
        return Err(ValidationError::structure(
            "'genome' should have the same length as 'name'".to_string(),
        ));
    }
    h5::load_string_placeholder(&genome)?;
    h5::validate_1d_string_dataset(&genome, num_sequences, options)?;

    Ok(())
}

pub fn height(path: &Path, _metadata: &ObjectMetadata, _options: &Options) -> Result<u64> {
    let handle = h5::open_file(&path.join("info.h5"))?;
    let ghandle = h5::open_group(&handle, "sequence_information")?;
    let nhandle = h5::open_dataset(&ghandle, "name")?;
    h5::get_1d_length(&nhandle, "name")
}

/// Extract the per-sequence length limits used by `genomic_ranges`.  The
/// directory is assumed to have already passed [`validate`].
pub(crate) fn read_sequence_limits(path: &Path, options: &Options) -> Result<SequenceLimits> {
    let handle = h5::open_file(&path.join("info.h5"))?;
    let ghandle = h5::open_group(&handle, "sequence_information")?;

    let lhandle = h5::open_dataset(&ghandle, "length")?;
    let num_sequences = h5::get_1d_length(&lhandle, "length")?;
    let length_placeholder = h5::load_numeric_placeholder::<u64>(&lhandle)?;

    let chandle = h5::open_dataset(&ghandle, "circular")?;
    let circular_placeholder = h5::load_numeric_placeholder::<i64>(&chandle)?;

    let mut seqlen = Vec::with_capacity(num_sequences as usize);
    h5::scan_numeric_blocks::<u64, _>(&lhandle, num_sequences, options, |_, block| {
        seqlen.extend_from_slice(block);
        Ok(())
    })?;

    let mut restricted = Vec::with_capacity(num_sequences as usize);
    let mut index = 0;
    h5::scan_numeric_blocks::<i64, _>(&chandle, num_sequences, options, |_, block| {
        for &circ in block {
            let length_known = length_placeholder != Some(seqlen[index]);
            let circular = circular_placeholder != Some(circ) && circ != 0;
            restricted.push(length_known && !circular);
            index += 1;
        }
        Ok(())
    })?;

    Ok(SequenceLimits { seqlen, restricted })
}
