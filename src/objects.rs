//! Per-type validators for all registered object types.

pub mod atomic_vector;
pub mod atomic_vector_list;
pub mod bam_file;
pub mod bcf_file;
pub mod bed_file;
pub mod bigbed_file;
pub mod bigwig_file;
pub mod bumpy_array;
pub mod bumpy_atomic_array;
pub mod bumpy_data_frame_array;
pub mod compressed_list;
pub mod compressed_sparse_matrix;
pub mod data_frame;
pub mod data_frame_factor;
pub mod data_frame_list;
pub mod delayed_array;
pub mod dense_array;
pub mod fasta_file;
pub mod fastq_file;
pub mod genomic_ranges;
pub mod genomic_ranges_list;
pub mod gff_file;
pub mod gmt_file;
pub mod image_file;
pub mod multi_sample_dataset;
pub mod ranged_summarized_experiment;
pub mod rds_file;
pub mod sequence_information;
pub mod sequence_string_set;
pub mod sequence_string_set_list;
pub mod simple_list;
pub mod single_cell_experiment;
pub mod spatial_experiment;
pub mod string_factor;
pub mod summarized_experiment;
pub mod vcf_experiment;
