//! Validation for genomic ranges.

use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::metadata::{read_object_metadata, ObjectMetadata};
use crate::objects::sequence_information;
use crate::options::Options;
use crate::utils::dirs;
use crate::utils::hdf5 as h5;
use crate::utils::version::check_major_version_1;

pub fn validate(path: &Path, _metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    // The range checks depend on the sequence universe, so the sibling
    // sequence information is validated first.
    let sidir = path.join("sequence_information");
    let simeta = read_object_metadata(&sidir)?;
    if simeta.type_name != "sequence_information" {
        return Err(ValidationError::dispatch(
            "'sequence_information' should contain a 'sequence_information' object".to_string(),
        ));
    }
    crate::dispatch::validate_with_metadata(&sidir, &simeta, options)?;
    let limits = sequence_information::read_sequence_limits(&sidir, options)?;
    let num_sequences = limits.seqlen.len() as u64;

    let handle = h5::open_file(&path.join("ranges.h5"))?;
    let ghandle = h5::open_group(&handle, "genomic_ranges")?;

    let vstring = h5::load_scalar_string_attr(&ghandle, "version")?;
    check_major_version_1(&vstring)?;

    let shandle = h5::open_dataset(&ghandle, "sequence")?;
    h5::check_integer_fits(&shandle, 64, false, "sequence")?;
    let num_ranges = h5::get_1d_length(&shandle, "sequence")?;

    let sthandle = h5::open_dataset(&ghandle, "start")?;
    h5::check_integer_fits(&sthandle, 64, true, "start")?;
    if h5::get_1d_length(&sthandle, "start")? != num_ranges {
        return Err(ValidationError::structure(
            "'start' should have the same length as 'sequence'".to_string(),
        ));
    }

    let whandle = h5::open_dataset(&ghandle, "width")?;
    h5::check_integer_fits(&whandle, 64, false, "width")?;
    if h5::get_1d_length(&whandle, "width")? != num_ranges {
        return Err(ValidationError::structure(
            "'width' should have the same length as 'sequence'".to_string(),
        ));
    }

    let strhandle = h5::open_dataset(&ghandle, "strand")?;
    h5::check_integer_fits(&strhandle, 32, true, "strand")?;
    if h5::get_1d_length(&strhandle, "strand")? != num_ranges {
        return Err(ValidationError::structure(
            "'strand' should have the same length as 'sequence'".to_string(),
        ));
    }

    // Walk all four datasets in lockstep, one bounded block at a time.
    let step = options.hdf5_buffer_size.max(1) as u64;
    let mut start_at = 0;
    while start_at < num_ranges {
        let end_at = (start_at + step).min(num_ranges);
        let range = ndarray::s![start_at as usize..end_at as usize];
        let seq_ids = shandle.read_slice_1d::<u64, _>(range)?;
        let starts = sthandle.read_slice_1d::<i64, _>(range)?;
        let widths = whandle.read_slice_1d::<u64, _>(range)?;
        let strands = strhandle.read_slice_1d::<i64, _>(range)?;

        for i in 0..seq_ids.len() {
            let seq_id = seq_ids[i];
            if seq_id >= num_sequences {
                return Err(ValidationError::value(
                    "entries of 'sequence' should be less than the number of sequences"
                        .to_string(),
                ));
            }

            let start = starts[i];
            let width = widths[i];
            let end = start as i128 + width as i128;
            if end > i64::MAX as i128 {
                return Err(ValidationError::value(
                    "end position beyond the range of a 64-bit integer".to_string(),
                ));
            }

            if !matches!(strands[i], -1 | 0 | 1) {
                return Err(ValidationError::value(format!(
                    "invalid strand '{}'",
                    strands[i]
                )));
            }

            if limits.restricted[seq_id as usize] {
                if start < 1 {
                    return Err(ValidationError::value(
                        "start position must be positive for non-circular sequences".to_string(),
                    ));
                }
                if end - 1 > limits.seqlen[seq_id as usize] as i128 {
                    return Err(ValidationError::value(
                        "end position beyond sequence length for non-circular sequences"
                            .to_string(),
                    ));
                }
            }
        }

        start_at = end_at;
    }

    if ghandle.link_exists("name") {
        let nhandle = h5::open_dataset(&ghandle, "name")?;
        h5::check_string_type(&nhandle, "name")?;
        if h5::get_1d_length(&nhandle, "name")? != num_ranges {
            return Err(ValidationError::structure(
                "'name' should have the same length as 'sequence'".to_string(),
            ));
        }
        h5::validate_1d_string_dataset(&nhandle, num_ranges, options)?;
    }

    dirs::validate_annotation_data_frame(&path.join("range_annotations"), num_ranges, options)
        .map_err(|e| e.nested("failed to validate 'range_annotations'"))?;
    dirs::validate_annotation_list(&path.join("other_annotations"), options)
        .map_err(|e| e.nested("failed to validate 'other_annotations'"))?;

    Ok(())
}

pub fn height(path: &Path, _metadata: &ObjectMetadata, _options: &Options) -> Result<u64> {
    let handle = h5::open_file(&path.join("ranges.h5"))?;
    let ghandle = h5::open_group(&handle, "genomic_ranges")?;
    let dhandle = h5::open_dataset(&ghandle, "sequence")?;
    h5::get_1d_length(&dhandle, "sequence")
}
