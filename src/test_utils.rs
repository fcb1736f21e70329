//! Helpers for building mock object directories in tests.

use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use hdf5::types::VarLenUnicode;
use ndarray::IxDyn;

use crate::options::Options;

pub fn test_validate(dir: &Path) -> crate::error::Result<()> {
    crate::validate(dir, &Options::default())
}

pub fn test_height(dir: &Path) -> crate::error::Result<u64> {
    crate::height(dir, &Options::default())
}

pub fn test_dimensions(dir: &Path) -> crate::error::Result<Vec<u64>> {
    crate::dimensions(dir, &Options::default())
}

pub fn expect_validation_error(dir: &Path, msg: &str) {
    let err = test_validate(dir).expect_err("expected validation to fail");
    let text = err.to_string();
    assert!(
        text.contains(msg),
        "error message '{}' does not contain '{}'",
        text,
        msg
    );
}

// ---------------------------------------------------------------------------
// OBJECT files and directories.
// ---------------------------------------------------------------------------

pub fn write_object_file(dir: &Path, value: serde_json::Value) {
    std::fs::write(dir.join("OBJECT"), serde_json::to_string(&value).unwrap()).unwrap();
}

pub fn write_object_file_in_new_dir(dir: &Path, value: serde_json::Value) {
    std::fs::create_dir_all(dir).unwrap();
    write_object_file(dir, value);
}

pub fn init_object_dir(dir: &Path, type_name: &str, version: &str) {
    write_object_file_in_new_dir(
        dir,
        serde_json::json!({ "type": type_name, type_name: { "version": version } }),
    );
}

pub fn rewrite_object_file(dir: &Path, metadata: &crate::metadata::ObjectMetadata) {
    let mut map = metadata.other.clone();
    map.insert(
        "type".to_string(),
        serde_json::Value::String(metadata.type_name.clone()),
    );
    write_object_file(dir, serde_json::Value::Object(map));
}

// ---------------------------------------------------------------------------
// HDF5 primitives.
// ---------------------------------------------------------------------------

fn varlen(x: &str) -> VarLenUnicode {
    VarLenUnicode::from_str(x).unwrap()
}

pub fn write_string_attr(location: &hdf5::Location, name: &str, value: &str) {
    location
        .new_attr::<VarLenUnicode>()
        .create(name)
        .unwrap()
        .write_scalar(&varlen(value))
        .unwrap();
}

pub fn write_i32_attr(location: &hdf5::Location, name: &str, value: i32) {
    location
        .new_attr::<i32>()
        .create(name)
        .unwrap()
        .write_scalar(&value)
        .unwrap();
}

pub fn write_u32_attr(location: &hdf5::Location, name: &str, value: u32) {
    location
        .new_attr::<u32>()
        .create(name)
        .unwrap()
        .write_scalar(&value)
        .unwrap();
}

pub fn write_i8_attr(location: &hdf5::Location, name: &str, value: i8) {
    location
        .new_attr::<i8>()
        .create(name)
        .unwrap()
        .write_scalar(&value)
        .unwrap();
}

pub fn write_u64_attr(location: &hdf5::Location, name: &str, value: u64) {
    location
        .new_attr::<u64>()
        .create(name)
        .unwrap()
        .write_scalar(&value)
        .unwrap();
}

pub fn write_i32_dataset(group: &hdf5::Group, name: &str, values: &[i32]) -> hdf5::Dataset {
    group
        .new_dataset_builder()
        .with_data(values)
        .create(name)
        .unwrap()
}

pub fn write_i8_dataset(group: &hdf5::Group, name: &str, values: &[i8]) -> hdf5::Dataset {
    group
        .new_dataset_builder()
        .with_data(values)
        .create(name)
        .unwrap()
}

pub fn write_i64_dataset(group: &hdf5::Group, name: &str, values: &[i64]) -> hdf5::Dataset {
    group
        .new_dataset_builder()
        .with_data(values)
        .create(name)
        .unwrap()
}

pub fn write_u32_dataset(group: &hdf5::Group, name: &str, values: &[u32]) -> hdf5::Dataset {
    group
        .new_dataset_builder()
        .with_data(values)
        .create(name)
        .unwrap()
}

pub fn write_u64_dataset(group: &hdf5::Group, name: &str, values: &[u64]) -> hdf5::Dataset {
    group
        .new_dataset_builder()
        .with_data(values)
        .create(name)
        .unwrap()
}

pub fn write_f64_dataset(group: &hdf5::Group, name: &str, values: &[f64]) -> hdf5::Dataset {
    group
        .new_dataset_builder()
        .with_data(values)
        .create(name)
        .unwrap()
}

pub fn write_string_dataset(group: &hdf5::Group, name: &str, values: &[String]) -> hdf5::Dataset {
    let converted: Vec<VarLenUnicode> = values.iter().map(|x| varlen(x)).collect();
    group
        .new_dataset_builder()
        .with_data(&converted)
        .create(name)
        .unwrap()
}

pub fn write_str_dataset(group: &hdf5::Group, name: &str, values: &[&str]) -> hdf5::Dataset {
    let converted: Vec<String> = values.iter().map(|x| x.to_string()).collect();
    write_string_dataset(group, name, &converted)
}

pub fn write_u64_scalar(group: &hdf5::Group, name: &str, value: u64) {
    group
        .new_dataset_builder()
        .with_data(&ndarray::arr0(value))
        .create(name)
        .unwrap();
}

// ---------------------------------------------------------------------------
// Compressed payloads.
// ---------------------------------------------------------------------------

pub fn write_gz(path: &Path, payload: &[u8]) {
    let file = std::fs::File::create(path).unwrap();
    let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    encoder.write_all(payload).unwrap();
    encoder.finish().unwrap();
}

pub fn write_bgzf(path: &Path, payload: &[u8]) {
    let file = std::fs::File::create(path).unwrap();
    let mut writer = noodles_bgzf::Writer::new(file);
    writer.write_all(payload).unwrap();
    writer.finish().unwrap();
}

pub fn mock_png_bytes() -> Vec<u8> {
    let mut payload = vec![137, 80, 78, 71, 13, 10, 26, 10];
    payload.extend_from_slice(b"\x00\x00\x00\x0dIHDR");
    payload
}

// ---------------------------------------------------------------------------
// Leaf object mocks.
// ---------------------------------------------------------------------------

pub fn mock_atomic_vector(dir: &Path, len: u64) {
    mock_atomic_vector_with(dir, len, "1.0", "integer");
}

pub fn mock_atomic_vector_with(dir: &Path, len: u64, version: &str, vtype: &str) {
    init_object_dir(dir, "atomic_vector", "1.0");
    let handle = hdf5::File::create(dir.join("contents.h5")).unwrap();
    let ghandle = handle.create_group("atomic_vector").unwrap();
    write_string_attr(&ghandle, "version", version);
    write_string_attr(&ghandle, "type", vtype);
    let values: Vec<i32> = (0..len as i32).collect();
    write_i32_dataset(&ghandle, "values", &values);
}

pub fn mock_string_atomic_vector(dir: &Path, values: &[&str]) {
    init_object_dir(dir, "atomic_vector", "1.0");
    let handle = hdf5::File::create(dir.join("contents.h5")).unwrap();
    let ghandle = handle.create_group("atomic_vector").unwrap();
    write_string_attr(&ghandle, "version", "1.0");
    write_string_attr(&ghandle, "type", "string");
    write_str_dataset(&ghandle, "values", values);
}

pub fn mock_string_factor(dir: &Path, levels: &[&str], codes: &[i32]) {
    init_object_dir(dir, "string_factor", "1.0");
    let handle = hdf5::File::create(dir.join("contents.h5")).unwrap();
    let ghandle = handle.create_group("string_factor").unwrap();
    write_string_attr(&ghandle, "version", "1.0");
    write_str_dataset(&ghandle, "levels", levels);
    write_i32_dataset(&ghandle, "codes", codes);
}

#[derive(Clone, Copy)]
pub enum MockColumn<'a> {
    Integer(&'a str),
    Number(&'a str),
    String(&'a str),
    Boolean(&'a str),
    Factor(&'a str, &'a [&'a str]),
    Other(&'a str),
}

impl MockColumn<'_> {
    fn name(&self) -> &str {
        match self {
            MockColumn::Integer(name)
            | MockColumn::Number(name)
            | MockColumn::String(name)
            | MockColumn::Boolean(name)
            | MockColumn::Factor(name, _)
            | MockColumn::Other(name) => name,
        }
    }
}

pub fn mock_data_frame(dir: &Path, num_rows: u64, columns: &[MockColumn]) {
    init_object_dir(dir, "data_frame", "1.0");
    let handle = hdf5::File::create(dir.join("basic_columns.h5")).unwrap();
    let ghandle = handle.create_group("data_frame").unwrap();
    write_string_attr(&ghandle, "version", "1.0");
    write_u64_attr(&ghandle, "row-count", num_rows);

    let names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();
    write_string_dataset(&ghandle, "column_names", &names);

    let dhandle = ghandle.create_group("data").unwrap();
    for (c, column) in columns.iter().enumerate() {
        let dataset = c.to_string();
        match column {
            MockColumn::Integer(_) => {
                let values: Vec<i32> = (0..num_rows as i32).collect();
                let xhandle = write_i32_dataset(&dhandle, &dataset, &values);
                write_string_attr(&xhandle, "type", "integer");
            }
            MockColumn::Number(_) => {
                let values: Vec<f64> = (0..num_rows).map(|x| x as f64 / 2.0).collect();
                let xhandle = write_f64_dataset(&dhandle, &dataset, &values);
                write_string_attr(&xhandle, "type", "number");
            }
            MockColumn::String(_) => {
                let values: Vec<String> = (0..num_rows).map(|x| format!("s{}", x)).collect();
                let xhandle = write_string_dataset(&dhandle, &dataset, &values);
                write_string_attr(&xhandle, "type", "string");
            }
            MockColumn::Boolean(_) => {
                let values: Vec<i8> = (0..num_rows).map(|x| (x % 2) as i8).collect();
                let xhandle = write_i8_dataset(&dhandle, &dataset, &values);
                write_string_attr(&xhandle, "type", "boolean");
            }
            MockColumn::Factor(_, levels) => {
                let fhandle = dhandle.create_group(&dataset).unwrap();
                write_string_attr(&fhandle, "type", "factor");
                write_str_dataset(&fhandle, "levels", levels);
                let codes: Vec<i32> = (0..num_rows).map(|x| (x % levels.len() as u64) as i32).collect();
                write_i32_dataset(&fhandle, "codes", &codes);
            }
            MockColumn::Other(_) => {}
        }
    }
}

#[derive(Clone, Copy)]
pub enum ArrayType {
    Integer,
    Boolean,
    Number,
}

pub fn mock_dense_array(dir: &Path, atype: ArrayType, dims: &[u64]) {
    let type_name = match atype {
        ArrayType::Integer => "integer",
        ArrayType::Boolean => "boolean",
        ArrayType::Number => "number",
    };
    init_object_dir(dir, "dense_array", "1.0");
    let handle = hdf5::File::create(dir.join("array.h5")).unwrap();
    let ghandle = handle.create_group("dense_array").unwrap();
    write_string_attr(&ghandle, "version", "1.0");
    write_string_attr(&ghandle, "type", type_name);

    let file_shape: Vec<usize> = dims.iter().map(|&d| d as usize).collect();
    match atype {
        ArrayType::Number => {
            let data = ndarray::ArrayD::<f64>::zeros(IxDyn(&file_shape));
            ghandle
                .new_dataset_builder()
                .with_data(&data)
                .create("data")
                .unwrap();
        }
        _ => {
            let data = ndarray::ArrayD::<i32>::zeros(IxDyn(&file_shape));
            ghandle
                .new_dataset_builder()
                .with_data(&data)
                .create("data")
                .unwrap();
        }
    }
}

pub fn mock_dense_string_array(dir: &Path, dims: &[u64], values: &[&str]) {
    init_object_dir(dir, "dense_array", "1.0");
    let handle = hdf5::File::create(dir.join("array.h5")).unwrap();
    let ghandle = handle.create_group("dense_array").unwrap();
    write_string_attr(&ghandle, "version", "1.0");
    write_string_attr(&ghandle, "type", "string");

    let file_shape: Vec<usize> = dims.iter().map(|&d| d as usize).collect();
    let converted: Vec<VarLenUnicode> = values.iter().map(|x| varlen(x)).collect();
    let data = ndarray::ArrayD::from_shape_vec(IxDyn(&file_shape), converted).unwrap();
    ghandle
        .new_dataset_builder()
        .with_data(&data)
        .create("data")
        .unwrap();
}

pub fn mock_dense_array_with_type(dir: &Path, type_name: &str, dims: &[u64]) {
    init_object_dir(dir, "dense_array", "1.0");
    let handle = hdf5::File::create(dir.join("array.h5")).unwrap();
    let ghandle = handle.create_group("dense_array").unwrap();
    write_string_attr(&ghandle, "version", "1.0");
    write_string_attr(&ghandle, "type", type_name);
    let file_shape: Vec<usize> = dims.iter().map(|&d| d as usize).collect();
    let data = ndarray::ArrayD::<i32>::zeros(IxDyn(&file_shape));
    ghandle
        .new_dataset_builder()
        .with_data(&data)
        .create("data")
        .unwrap();
}

pub fn mock_compressed_sparse_matrix(
    dir: &Path,
    shape: &[u64],
    layout: &str,
    data: &[f64],
    indices: &[u64],
    indptr: &[u64],
) {
    init_object_dir(dir, "compressed_sparse_matrix", "1.0");
    let handle = hdf5::File::create(dir.join("matrix.h5")).unwrap();
    let ghandle = handle.create_group("compressed_sparse_matrix").unwrap();
    write_string_attr(&ghandle, "version", "1.0");
    write_string_attr(&ghandle, "layout", layout);
    write_string_attr(&ghandle, "type", "number");
    write_u64_dataset(&ghandle, "shape", shape);
    write_f64_dataset(&ghandle, "data", data);
    write_u64_dataset(&ghandle, "indices", indices);
    write_u64_dataset(&ghandle, "indptr", indptr);
}

pub fn mock_sequence_information(
    dir: &Path,
    names: &[&str],
    lengths: &[u32],
    circular: &[i8],
    genomes: &[&str],
) {
    init_object_dir(dir, "sequence_information", "1.0");
    let handle = hdf5::File::create(dir.join("info.h5")).unwrap();
    let ghandle = handle.create_group("sequence_information").unwrap();
    write_string_attr(&ghandle, "version", "1.0");
    write_str_dataset(&ghandle, "name", names);
    write_u32_dataset(&ghandle, "length", lengths);
    write_i8_dataset(&ghandle, "circular", circular);
    write_str_dataset(&ghandle, "genome", genomes);
}

#[allow(clippy::too_many_arguments)]
pub fn mock_genomic_ranges(
    dir: &Path,
    seq_ids: &[u64],
    starts: &[i64],
    widths: &[u64],
    strands: &[i8],
    seq_lengths: &[u32],
    circular: &[i8],
) {
    init_object_dir(dir, "genomic_ranges", "1.0");
    let handle = hdf5::File::create(dir.join("ranges.h5")).unwrap();
    let ghandle = handle.create_group("genomic_ranges").unwrap();
    write_string_attr(&ghandle, "version", "1.0");
    write_u64_dataset(&ghandle, "sequence", seq_ids);
    write_i64_dataset(&ghandle, "start", starts);
    write_u64_dataset(&ghandle, "width", widths);
    write_i8_dataset(&ghandle, "strand", strands);

    let names: Vec<String> = (0..seq_lengths.len()).map(|i| i.to_string()).collect();
    let name_refs: Vec<&str> = names.iter().map(|x| x.as_str()).collect();
    let genomes: Vec<&str> = (0..seq_lengths.len()).map(|_| "mm10").collect();
    mock_sequence_information(
        &dir.join("sequence_information"),
        &name_refs,
        seq_lengths,
        circular,
        &genomes,
    );
}

pub fn mock_simple_list(dir: &Path) {
    mock_simple_list_with_contents(dir, r#"{ "type": "list", "values": [] }"#);
}

pub fn mock_simple_list_with_contents(dir: &Path, payload: &str) {
    write_object_file_in_new_dir(
        dir,
        serde_json::json!({
            "type": "simple_list",
            "simple_list": { "version": "1.0", "format": "json.gz" }
        }),
    );
    write_gz(&dir.join("list_contents.json.gz"), payload.as_bytes());
}

pub fn mock_simple_list_hdf5(dir: &Path, num_elements: u64) {
    write_object_file_in_new_dir(
        dir,
        serde_json::json!({
            "type": "simple_list",
            "simple_list": { "version": "1.0", "format": "hdf5" }
        }),
    );
    let handle = hdf5::File::create(dir.join("list_contents.h5")).unwrap();
    let ghandle = handle.create_group("simple_list").unwrap();
    write_string_attr(&ghandle, "object", "list");
    let dhandle = ghandle.create_group("data").unwrap();
    for i in 0..num_elements {
        let child = dhandle.create_group(&i.to_string()).unwrap();
        write_string_attr(&child, "object", "nothing");
    }
}

pub fn mock_sequence_string_set_fasta(dir: &Path, length: u64, seqtype: &str, payload: &str) {
    write_object_file_in_new_dir(
        dir,
        serde_json::json!({
            "type": "sequence_string_set",
            "sequence_string_set": {
                "version": "1.0",
                "length": length,
                "sequence_type": seqtype
            }
        }),
    );
    write_gz(&dir.join("sequences.fasta.gz"), payload.as_bytes());
}

pub fn mock_sequence_string_set_fastq(dir: &Path, length: u64, payload: &str) {
    write_object_file_in_new_dir(
        dir,
        serde_json::json!({
            "type": "sequence_string_set",
            "sequence_string_set": {
                "version": "1.0",
                "length": length,
                "sequence_type": "DNA",
                "quality_type": "phred",
                "quality_offset": 33
            }
        }),
    );
    write_gz(&dir.join("sequences.fastq.gz"), payload.as_bytes());
}

// ---------------------------------------------------------------------------
// Container mocks.
// ---------------------------------------------------------------------------

pub fn mock_compressed_list_skeleton(dir: &Path, type_name: &str, lengths: &[u64]) {
    init_object_dir(dir, type_name, "1.0");
    let handle = hdf5::File::create(dir.join("partitions.h5")).unwrap();
    let ghandle = handle.create_group(type_name).unwrap();
    write_string_attr(&ghandle, "version", "1.0");
    write_u64_dataset(&ghandle, "lengths", lengths);
}

pub fn mock_atomic_vector_list(dir: &Path, lengths: &[u64]) {
    mock_compressed_list_skeleton(dir, "atomic_vector_list", lengths);
    mock_atomic_vector(&dir.join("concatenated"), lengths.iter().sum());
}

pub fn mock_bumpy_skeleton(
    dir: &Path,
    type_name: &str,
    dims: &[u64],
    lengths: &[u64],
    indices: Option<&[&[u64]]>,
) {
    init_object_dir(dir, type_name, "1.0");
    let handle = hdf5::File::create(dir.join("partitions.h5")).unwrap();
    let ghandle = handle.create_group(type_name).unwrap();
    write_string_attr(&ghandle, "version", "1.0");
    write_u64_dataset(&ghandle, "dimensions", dims);
    write_u64_dataset(&ghandle, "lengths", lengths);
    if let Some(indices) = indices {
        let ihandle = ghandle.create_group("indices").unwrap();
        for (d, column) in indices.iter().enumerate() {
            write_u64_dataset(&ihandle, &d.to_string(), column);
        }
    }
}

pub fn mock_bumpy_atomic_array(
    dir: &Path,
    dims: &[u64],
    lengths: &[u64],
    indices: Option<&[&[u64]]>,
) {
    mock_bumpy_skeleton(dir, "bumpy_atomic_array", dims, lengths, indices);
    mock_atomic_vector(&dir.join("concatenated"), lengths.iter().sum());
}

// ---------------------------------------------------------------------------
// Experiment mocks.
// ---------------------------------------------------------------------------

pub struct MockExperiment {
    pub num_rows: u64,
    pub num_cols: u64,
    pub num_assays: usize,
    pub has_row_data: bool,
    pub has_column_data: bool,
    pub has_other_data: bool,
}

impl MockExperiment {
    pub fn new(num_rows: u64, num_cols: u64) -> Self {
        Self {
            num_rows,
            num_cols,
            num_assays: 1,
            has_row_data: false,
            has_column_data: false,
            has_other_data: false,
        }
    }

    pub fn assays(mut self, num_assays: usize) -> Self {
        self.num_assays = num_assays;
        self
    }

    pub fn row_data(mut self) -> Self {
        self.has_row_data = true;
        self
    }

    pub fn column_data(mut self) -> Self {
        self.has_column_data = true;
        self
    }

    pub fn other_data(mut self) -> Self {
        self.has_other_data = true;
        self
    }
}

fn fill_experiment(dir: &Path, config: &MockExperiment) {
    let assay_dir = dir.join("assays");
    std::fs::create_dir_all(&assay_dir).unwrap();
    let names: Vec<String> = (0..config.num_assays).map(|a| format!("assay-{}", a)).collect();
    std::fs::write(
        assay_dir.join("names.json"),
        serde_json::to_string(&names).unwrap(),
    )
    .unwrap();
    for a in 0..config.num_assays {
        mock_dense_array(
            &assay_dir.join(a.to_string()),
            ArrayType::Integer,
            &[config.num_rows, config.num_cols],
        );
    }

    if config.has_row_data {
        mock_data_frame(
            &dir.join("row_data"),
            config.num_rows,
            &[MockColumn::Integer("id")],
        );
    }
    if config.has_column_data {
        mock_data_frame(
            &dir.join("column_data"),
            config.num_cols,
            &[MockColumn::Integer("id")],
        );
    }
    if config.has_other_data {
        mock_simple_list(&dir.join("other_data"));
    }
}

fn experiment_object(type_name: &str, config: &MockExperiment) -> serde_json::Value {
    let mut value = serde_json::json!({
        "type": type_name,
        "summarized_experiment": {
            "version": "1.0",
            "dimensions": [config.num_rows, config.num_cols]
        }
    });
    let extras = match type_name {
        "ranged_summarized_experiment" => vec!["ranged_summarized_experiment"],
        "single_cell_experiment" => {
            vec!["ranged_summarized_experiment", "single_cell_experiment"]
        }
        "spatial_experiment" => vec![
            "ranged_summarized_experiment",
            "single_cell_experiment",
            "spatial_experiment",
        ],
        "vcf_experiment" => vec!["ranged_summarized_experiment"],
        _ => vec![],
    };
    for extra in extras {
        value[extra] = serde_json::json!({ "version": "1.0" });
    }
    value
}

pub fn mock_summarized_experiment(dir: &Path, config: &MockExperiment) {
    write_object_file_in_new_dir(dir, experiment_object("summarized_experiment", config));
    fill_experiment(dir, config);
}

pub fn mock_ranged_summarized_experiment(
    dir: &Path,
    config: &MockExperiment,
    with_row_ranges: bool,
) {
    write_object_file_in_new_dir(
        dir,
        experiment_object("ranged_summarized_experiment", config),
    );
    fill_experiment(dir, config);
    if with_row_ranges {
        mock_row_ranges(dir, config.num_rows);
    }
}

fn mock_row_ranges(dir: &Path, num_rows: u64) {
    let seq_ids: Vec<u64> = vec![0; num_rows as usize];
    let starts: Vec<i64> = (0..num_rows as i64).map(|x| x * 10 + 1).collect();
    let widths: Vec<u64> = vec![5; num_rows as usize];
    let strands: Vec<i8> = vec![0; num_rows as usize];
    mock_genomic_ranges(
        &dir.join("row_ranges"),
        &seq_ids,
        &starts,
        &widths,
        &strands,
        &[1_000_000],
        &[0],
    );
}

pub fn mock_single_cell_experiment(dir: &Path, config: &MockExperiment) {
    write_object_file_in_new_dir(dir, experiment_object("single_cell_experiment", config));
    fill_experiment(dir, config);
}

pub fn mock_spatial_experiment(dir: &Path, config: &MockExperiment, num_samples: u64) {
    write_object_file_in_new_dir(dir, experiment_object("spatial_experiment", config));
    fill_experiment(dir, config);

    mock_dense_array(
        &dir.join("coordinates"),
        ArrayType::Number,
        &[config.num_cols, 2],
    );

    let image_dir = dir.join("images");
    std::fs::create_dir_all(&image_dir).unwrap();
    {
        let handle = hdf5::File::create(image_dir.join("mapping.h5")).unwrap();
        let ghandle = handle.create_group("spatial_experiment").unwrap();

        let sample_names: Vec<String> = (0..num_samples).map(|s| format!("sample_{}", s)).collect();
        write_string_dataset(&ghandle, "sample_names", &sample_names);

        let column_samples: Vec<u64> =
            (0..config.num_cols).map(|c| c % num_samples).collect();
        write_u64_dataset(&ghandle, "column_samples", &column_samples);

        // One image per sample.
        let image_samples: Vec<u64> = (0..num_samples).collect();
        write_u64_dataset(&ghandle, "image_samples", &image_samples);
        let image_ids: Vec<String> = (0..num_samples).map(|_| "hires".to_string()).collect();
        write_string_dataset(&ghandle, "image_ids", &image_ids);
        let scale_factors: Vec<f64> = vec![1.0; num_samples as usize];
        write_f64_dataset(&ghandle, "image_scale_factors", &scale_factors);
    }

    for i in 0..num_samples {
        let ipath = image_dir.join(i.to_string());
        write_object_file_in_new_dir(
            &ipath,
            serde_json::json!({
                "type": "image_file",
                "image_file": { "version": "1.0", "format": "PNG" }
            }),
        );
        std::fs::write(ipath.join("file.png"), mock_png_bytes()).unwrap();
    }
}

pub fn mock_vcf_experiment(dir: &Path, num_rows: u64, num_cols: u64, expanded: bool, structural: bool) {
    let config = MockExperiment::new(num_rows, num_cols);
    let mut object = experiment_object("vcf_experiment", &config);
    object["vcf_experiment"] = serde_json::json!({
        "version": "1.0",
        "expanded": expanded,
        "structural": structural
    });
    write_object_file_in_new_dir(dir, object);
    fill_experiment(dir, &config);
    mock_row_ranges(dir, num_rows);

    let allele_dir = dir.join("alleles");
    std::fs::create_dir_all(&allele_dir).unwrap();
    mock_sequence_string_set_fasta(
        &allele_dir.join("reference"),
        num_rows,
        "DNA",
        &dna_fasta(num_rows),
    );

    let alt_dir = allele_dir.join("alternative");
    match (expanded, structural) {
        (true, false) => {
            mock_sequence_string_set_fasta(&alt_dir, num_rows, "DNA", &dna_fasta(num_rows));
        }
        (true, true) => {
            let values: Vec<String> = (0..num_rows).map(|_| "<DEL>".to_string()).collect();
            let refs: Vec<&str> = values.iter().map(|x| x.as_str()).collect();
            mock_string_atomic_vector(&alt_dir, &refs);
        }
        _ => panic!("unsupported mock combination"),
    }

    let handle = hdf5::File::create(dir.join("variants.h5")).unwrap();
    handle.create_group("vcf_experiment").unwrap();
}

fn dna_fasta(num_records: u64) -> String {
    let mut payload = String::new();
    for i in 0..num_records {
        payload.push_str(&format!(">{}\nACGT\n", i));
    }
    payload
}

pub fn mock_multi_sample_dataset(dir: &Path, num_samples: u64, experiments: &[(u64, u64)]) {
    init_object_dir(dir, "multi_sample_dataset", "1.0");
    mock_data_frame(
        &dir.join("sample_data"),
        num_samples,
        &[MockColumn::String("sample_id")],
    );

    let exp_dir = dir.join("experiments");
    std::fs::create_dir_all(&exp_dir).unwrap();
    let names: Vec<String> = (0..experiments.len()).map(|e| format!("exp-{}", e)).collect();
    std::fs::write(
        exp_dir.join("names.json"),
        serde_json::to_string(&names).unwrap(),
    )
    .unwrap();
    for (e, &(num_rows, num_cols)) in experiments.iter().enumerate() {
        mock_summarized_experiment(
            &exp_dir.join(e.to_string()),
            &MockExperiment::new(num_rows, num_cols),
        );
    }

    let handle = hdf5::File::create(dir.join("sample_map.h5")).unwrap();
    let ghandle = handle.create_group("multi_sample_dataset").unwrap();
    for (e, &(_, num_cols)) in experiments.iter().enumerate() {
        let mapping: Vec<u64> = (0..num_cols).map(|c| c % num_samples).collect();
        write_u64_dataset(&ghandle, &e.to_string(), &mapping);
    }
}

pub fn mock_delayed_array(dir: &Path, dims: &[u64], kind: &str) {
    init_object_dir(dir, "delayed_array", "1.0");
    let handle = hdf5::File::create(dir.join("array.h5")).unwrap();
    let ghandle = handle.create_group("delayed_array").unwrap();
    write_string_attr(&ghandle, "delayed_type", "array");
    write_string_attr(&ghandle, "delayed_array", "custom bioshelf seed array");
    write_string_attr(&ghandle, "type", kind);
    write_u64_dataset(&ghandle, "dimensions", dims);
    write_u64_scalar(&ghandle, "index", 0);
    std::fs::create_dir_all(dir.join("seeds")).unwrap();
}
