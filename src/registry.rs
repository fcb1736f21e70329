//! Type registries mapping object type names to dispatch functions.
//!
//! The default tables are built once per process.  Applications may extend
//! or override them through [`crate::Options::custom`], which is consulted
//! first by the dispatcher; all of this is read-only during dispatch.

use std::path::Path;
use std::sync::{Arc, OnceLock};

use indexmap::{IndexMap, IndexSet};

use crate::error::Result;
use crate::metadata::ObjectMetadata;
use crate::objects;
use crate::options::Options;

/// Default validation function for an object type.
pub type ValidateFn = fn(&Path, &ObjectMetadata, &Options) -> Result<()>;
/// Default height function for an object type.
pub type HeightFn = fn(&Path, &ObjectMetadata, &Options) -> Result<u64>;
/// Default dimensions function for an object type.
pub type DimensionsFn = fn(&Path, &ObjectMetadata, &Options) -> Result<Vec<u64>>;

/// User-supplied validation function.
pub type CustomValidateFn =
    Arc<dyn Fn(&Path, &ObjectMetadata, &Options) -> Result<()> + Send + Sync>;
/// User-supplied height function.
pub type CustomHeightFn =
    Arc<dyn Fn(&Path, &ObjectMetadata, &Options) -> Result<u64> + Send + Sync>;
/// User-supplied dimensions function.
pub type CustomDimensionsFn =
    Arc<dyn Fn(&Path, &ObjectMetadata, &Options) -> Result<Vec<u64>> + Send + Sync>;

/// Custom registries of dispatch functions and type relationships.
///
/// Functions registered here replace the default for the same type name;
/// derivation and interface entries are added to the default sets.
#[derive(Clone, Default)]
pub struct CustomRegistry {
    /// Custom `validate` functions by object type.
    pub validate: IndexMap<String, CustomValidateFn>,
    /// Custom `height` functions by object type.
    pub height: IndexMap<String, CustomHeightFn>,
    /// Custom `dimensions` functions by object type.
    pub dimensions: IndexMap<String, CustomDimensionsFn>,
    /// Extra derivation edges: base type to its directly derived types.
    pub derived_from: IndexMap<String, IndexSet<String>>,
    /// Extra interface members: interface name to satisfying types.
    pub satisfies_interface: IndexMap<String, IndexSet<String>>,
}

impl std::fmt::Debug for CustomRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomRegistry")
            .field("validate", &self.validate.keys().collect::<Vec<_>>())
            .field("height", &self.height.keys().collect::<Vec<_>>())
            .field("dimensions", &self.dimensions.keys().collect::<Vec<_>>())
            .field("derived_from", &self.derived_from)
            .field("satisfies_interface", &self.satisfies_interface)
            .finish()
    }
}

pub(crate) fn default_validate_registry() -> &'static IndexMap<&'static str, ValidateFn> {
    static REGISTRY: OnceLock<IndexMap<&'static str, ValidateFn>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut registry: IndexMap<&'static str, ValidateFn> = IndexMap::new();
        registry.insert("atomic_vector", objects::atomic_vector::validate);
        registry.insert("string_factor", objects::string_factor::validate);
        registry.insert("simple_list", objects::simple_list::validate);
        registry.insert("data_frame", objects::data_frame::validate);
        registry.insert("data_frame_factor", objects::data_frame_factor::validate);
        registry.insert(
            "sequence_information",
            objects::sequence_information::validate,
        );
        registry.insert("genomic_ranges", objects::genomic_ranges::validate);
        registry.insert("atomic_vector_list", objects::atomic_vector_list::validate);
        registry.insert("data_frame_list", objects::data_frame_list::validate);
        registry.insert(
            "genomic_ranges_list",
            objects::genomic_ranges_list::validate,
        );
        registry.insert(
            "sequence_string_set_list",
            objects::sequence_string_set_list::validate,
        );
        registry.insert("dense_array", objects::dense_array::validate);
        registry.insert(
            "compressed_sparse_matrix",
            objects::compressed_sparse_matrix::validate,
        );
        registry.insert(
            "summarized_experiment",
            objects::summarized_experiment::validate,
        );
        registry.insert(
            "ranged_summarized_experiment",
            objects::ranged_summarized_experiment::validate,
        );
        registry.insert(
            "single_cell_experiment",
            objects::single_cell_experiment::validate,
        );
        registry.insert("spatial_experiment", objects::spatial_experiment::validate);
        registry.insert(
            "multi_sample_dataset",
            objects::multi_sample_dataset::validate,
        );
        registry.insert(
            "sequence_string_set",
            objects::sequence_string_set::validate,
        );
        registry.insert("bam_file", objects::bam_file::validate);
        registry.insert("bcf_file", objects::bcf_file::validate);
        registry.insert("bigwig_file", objects::bigwig_file::validate);
        registry.insert("bigbed_file", objects::bigbed_file::validate);
        registry.insert("fasta_file", objects::fasta_file::validate);
        registry.insert("fastq_file", objects::fastq_file::validate);
        registry.insert("bed_file", objects::bed_file::validate);
        registry.insert("gmt_file", objects::gmt_file::validate);
        registry.insert("gff_file", objects::gff_file::validate);
        registry.insert("rds_file", objects::rds_file::validate);
        registry.insert("image_file", objects::image_file::validate);
        registry.insert("bumpy_atomic_array", objects::bumpy_atomic_array::validate);
        registry.insert(
            "bumpy_data_frame_array",
            objects::bumpy_data_frame_array::validate,
        );
        registry.insert("vcf_experiment", objects::vcf_experiment::validate);
        registry.insert("delayed_array", objects::delayed_array::validate);
        registry
    })
}

pub(crate) fn default_height_registry() -> &'static IndexMap<&'static str, HeightFn> {
    static REGISTRY: OnceLock<IndexMap<&'static str, HeightFn>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut registry: IndexMap<&'static str, HeightFn> = IndexMap::new();
        registry.insert("atomic_vector", objects::atomic_vector::height);
        registry.insert("string_factor", objects::string_factor::height);
        registry.insert("simple_list", objects::simple_list::height);
        registry.insert("data_frame", objects::data_frame::height);
        registry.insert("data_frame_factor", objects::data_frame_factor::height);
        registry.insert(
            "sequence_information",
            objects::sequence_information::height,
        );
        registry.insert("genomic_ranges", objects::genomic_ranges::height);
        registry.insert("atomic_vector_list", objects::atomic_vector_list::height);
        registry.insert("data_frame_list", objects::data_frame_list::height);
        registry.insert("genomic_ranges_list", objects::genomic_ranges_list::height);
        registry.insert(
            "sequence_string_set_list",
            objects::sequence_string_set_list::height,
        );
        registry.insert("dense_array", objects::dense_array::height);
        registry.insert(
            "compressed_sparse_matrix",
            objects::compressed_sparse_matrix::height,
        );

        // Subclasses of the SE, so we just re-use its functions here.
        registry.insert(
            "summarized_experiment",
            objects::summarized_experiment::height,
        );
        registry.insert(
            "ranged_summarized_experiment",
            objects::summarized_experiment::height,
        );
        registry.insert(
            "single_cell_experiment",
            objects::summarized_experiment::height,
        );
        registry.insert(
            "spatial_experiment",
            objects::summarized_experiment::height,
        );

        registry.insert("sequence_string_set", objects::sequence_string_set::height);
        registry.insert("bumpy_atomic_array", objects::bumpy_atomic_array::height);
        registry.insert(
            "bumpy_data_frame_array",
            objects::bumpy_data_frame_array::height,
        );
        registry.insert("vcf_experiment", objects::vcf_experiment::height);
        registry.insert("delayed_array", objects::delayed_array::height);
        registry
    })
}

pub(crate) fn default_dimensions_registry() -> &'static IndexMap<&'static str, DimensionsFn> {
    static REGISTRY: OnceLock<IndexMap<&'static str, DimensionsFn>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut registry: IndexMap<&'static str, DimensionsFn> = IndexMap::new();
        registry.insert("data_frame", objects::data_frame::dimensions);
        registry.insert("dense_array", objects::dense_array::dimensions);
        registry.insert(
            "compressed_sparse_matrix",
            objects::compressed_sparse_matrix::dimensions,
        );

        // Subclasses of the SE, so we just re-use its functions here.
        registry.insert(
            "summarized_experiment",
            objects::summarized_experiment::dimensions,
        );
        registry.insert(
            "ranged_summarized_experiment",
            objects::summarized_experiment::dimensions,
        );
        registry.insert(
            "single_cell_experiment",
            objects::summarized_experiment::dimensions,
        );
        registry.insert(
            "spatial_experiment",
            objects::summarized_experiment::dimensions,
        );

        registry.insert(
            "bumpy_atomic_array",
            objects::bumpy_atomic_array::dimensions,
        );
        registry.insert(
            "bumpy_data_frame_array",
            objects::bumpy_data_frame_array::dimensions,
        );
        registry.insert("vcf_experiment", objects::vcf_experiment::dimensions);
        registry.insert("delayed_array", objects::delayed_array::dimensions);
        registry
    })
}

pub(crate) fn default_derived_from() -> &'static IndexMap<&'static str, IndexSet<&'static str>> {
    static REGISTRY: OnceLock<IndexMap<&'static str, IndexSet<&'static str>>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut registry: IndexMap<&'static str, IndexSet<&'static str>> = IndexMap::new();
        registry.insert(
            "summarized_experiment",
            IndexSet::from(["ranged_summarized_experiment"]),
        );
        registry.insert(
            "ranged_summarized_experiment",
            IndexSet::from(["single_cell_experiment", "vcf_experiment"]),
        );
        registry.insert(
            "single_cell_experiment",
            IndexSet::from(["spatial_experiment"]),
        );
        registry
    })
}

pub(crate) fn default_satisfies_interface(
) -> &'static IndexMap<&'static str, IndexSet<&'static str>> {
    static REGISTRY: OnceLock<IndexMap<&'static str, IndexSet<&'static str>>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut registry: IndexMap<&'static str, IndexSet<&'static str>> = IndexMap::new();
        registry.insert("DATA_FRAME", IndexSet::from(["data_frame"]));
        registry.insert("SIMPLE_LIST", IndexSet::from(["simple_list"]));
        registry.insert(
            "SUMMARIZED_EXPERIMENT",
            IndexSet::from(["summarized_experiment"]),
        );
        registry
    })
}
