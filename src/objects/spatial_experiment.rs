//! Validation for spatial experiments.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{Result, ValidationError};
use crate::metadata::{read_object_metadata, ObjectMetadata};
use crate::objects::{single_cell_experiment, summarized_experiment};
use crate::options::Options;
use crate::utils::dirs;
use crate::utils::hdf5 as h5;

fn validate_coordinates(path: &Path, num_cols: u64, options: &Options) -> Result<()> {
    let coord_path = path.join("coordinates");
    let coord_meta = read_object_metadata(&coord_path)?;
    if coord_meta.type_name != "dense_array" {
        return Err(ValidationError::dispatch(
            "'coordinates' should be a dense array".to_string(),
        ));
    }

    crate::dispatch::validate_with_metadata(&coord_path, &coord_meta, options)
        .map_err(|e| e.nested("failed to validate 'coordinates'"))?;

    let dims = crate::dispatch::dimensions_with_metadata(&coord_path, &coord_meta, options)?;
    if dims.len() != 2 {
        return Err(ValidationError::value(
            "'coordinates' should be a 2-dimensional dense array".to_string(),
        ));
    }
    if dims[1] != 2 && dims[1] != 3 {
        return Err(ValidationError::value(
            "'coordinates' should have 2 or 3 columns".to_string(),
        ));
    }
    if dims[0] != num_cols {
        return Err(ValidationError::value(
            "number of rows in 'coordinates' should equal the number of columns in the \
             'spatial_experiment'"
                .to_string(),
        ));
    }

    // Polygons or hulls may be supported in the future, but for now the
    // coordinates must be numeric points.
    let handle = h5::open_file(&coord_path.join("array.h5"))?;
    let ghandle = h5::open_group(&handle, "dense_array")?;
    let atype = h5::load_scalar_string_attr(&ghandle, "type")?;
    if atype != "integer" && atype != "number" {
        return Err(ValidationError::value(
            "values in 'coordinates' should be numeric".to_string(),
        ));
    }

    Ok(())
}

fn validate_image_mapping(
    ghandle: &hdf5::Group,
    num_cols: u64,
    options: &Options,
) -> Result<u64> {
    // Sample names, unique and non-missing.
    let snhandle = h5::open_dataset(ghandle, "sample_names")?;
    h5::check_string_type(&snhandle, "sample_names")?;
    let num_samples = h5::get_1d_length(&snhandle, "sample_names")?;
    {
        let mut present = HashSet::with_capacity(num_samples as usize);
        h5::scan_string_blocks(&snhandle, num_samples, options, |_, block| {
            for x in block {
                if !present.insert(x.clone()) {
                    return Err(ValidationError::value(format!(
                        "duplicated sample name '{}'",
                        x
                    )));
                }
            }
            Ok(())
        })?;
    }

    // Column-to-sample assignments.
    let cshandle = h5::open_dataset(ghandle, "column_samples")?;
    h5::check_integer_fits(&cshandle, 64, false, "column_samples")?;
    if h5::get_1d_length(&cshandle, "column_samples")? != num_cols {
        return Err(ValidationError::structure(
            "length of 'column_samples' should equal the number of columns in the spatial \
             experiment"
                .to_string(),
        ));
    }
    h5::scan_numeric_blocks::<u64, _>(&cshandle, num_cols, options, |_, block| {
        if block.iter().any(|&x| x >= num_samples) {
            return Err(ValidationError::value(
                "entries of 'column_samples' should be less than the number of samples"
                    .to_string(),
            ));
        }
        Ok(())
    })?;

    // Image-to-sample assignments and identifiers.
    let ishandle = h5::open_dataset(ghandle, "image_samples")?;
    h5::check_integer_fits(&ishandle, 64, false, "image_samples")?;
    let num_images = h5::get_1d_length(&ishandle, "image_samples")?;

    let iihandle = h5::open_dataset(ghandle, "image_ids")?;
    h5::check_string_type(&iihandle, "image_ids")?;
    if h5::get_1d_length(&iihandle, "image_ids")? != num_images {
        return Err(ValidationError::structure(
            "expected 'image_ids' to have the same length as 'image_samples'".to_string(),
        ));
    }

    {
        let mut collected: Vec<HashSet<String>> = vec![HashSet::new(); num_samples as usize];
        let step = options.hdf5_buffer_size.max(1) as u64;
        let mut start = 0;
        while start < num_images {
            let end = (start + step).min(num_images);
            let range = ndarray::s![start as usize..end as usize];
            let samples = ishandle.read_slice_1d::<u64, _>(range)?;
            let ids = iihandle.read_slice_1d::<hdf5::types::VarLenUnicode, _>(range)?;

            for i in 0..samples.len() {
                let sample = samples[i];
                if sample >= num_samples {
                    return Err(ValidationError::value(
                        "entries of 'image_samples' should be less than the number of samples"
                            .to_string(),
                    ));
                }
                if !collected[sample as usize].insert(ids[i].to_string()) {
                    return Err(ValidationError::value(format!(
                        "'image_ids' contains duplicated image IDs for the same sample ('{}')",
                        ids[i]
                    )));
                }
            }

            start = end;
        }

        if collected.iter().any(|x| x.is_empty()) {
            return Err(ValidationError::value(
                "each sample should map to one or more images in 'image_samples'".to_string(),
            ));
        }
    }

    // Scale factors.
    let sfhandle = h5::open_dataset(ghandle, "image_scale_factors")?;
    h5::check_float64(&sfhandle, "image_scale_factors")?;
    if h5::get_1d_length(&sfhandle, "image_scale_factors")? != num_images {
        return Err(ValidationError::structure(
            "expected 'image_scale_factors' to have the same length as 'image_samples'"
                .to_string(),
        ));
    }
    h5::scan_numeric_blocks::<f64, _>(&sfhandle, num_images, options, |_, block| {
        if block.iter().any(|&x| !x.is_finite() || x <= 0.0) {
            return Err(ValidationError::value(
                "entries of 'image_scale_factors' should be finite and positive".to_string(),
            ));
        }
        Ok(())
    })?;

    Ok(num_images)
}

fn validate_images(path: &Path, num_cols: u64, options: &Options) -> Result<()> {
    let image_dir = path.join("images");
    let map_path = image_dir.join("mapping.h5");

    let num_images = {
        let handle = h5::open_file(&map_path)?;
        let ghandle = h5::open_group(&handle, "spatial_experiment")?;
        validate_image_mapping(&ghandle, num_cols, options)
            .map_err(|e| e.nested(format!("failed to validate '{}'", map_path.display())))?
    };

    for i in 0..num_images {
        let image_path = image_dir.join(i.to_string());
        let image_meta = read_object_metadata(&image_path)?;
        if !crate::dispatch::derived_from(&image_meta.type_name, "image_file", options) {
            return Err(ValidationError::dispatch(format!(
                "expected an 'image_file' object at 'images/{}'",
                i
            )));
        }
        crate::dispatch::validate_with_metadata(&image_path, &image_meta, options)
            .map_err(|e| e.nested(format!("failed to validate image at 'images/{}'", i)))?;
    }

    // The mapping file plus one subdirectory per image, nothing else.
    if dirs::count_directory_entries(&image_dir)? != num_images as usize + 1 {
        return Err(ValidationError::structure(
            "more objects than expected inside the 'images' subdirectory".to_string(),
        ));
    }

    Ok(())
}

pub fn validate(path: &Path, metadata: &ObjectMetadata, options: &Options) -> Result<()> {
    single_cell_experiment::validate(path, metadata, options)?;
    let (_, num_cols) = summarized_experiment::metadata_dimensions(metadata)?;
    validate_coordinates(path, num_cols, options)?;
    validate_images(path, num_cols, options)?;
    Ok(())
}
