//! Runtime options for validation.

use std::path::Path;
use std::sync::Arc;

use crate::delayed;
use crate::metadata::ObjectMetadata;
use crate::registry::CustomRegistry;

/// Application-supplied deep check for an opaque file format, invoked after
/// the signature checks pass.  Any error is propagated to the caller.
pub type StrictCheck =
    Arc<dyn Fn(&Path, &ObjectMetadata, &Options) -> anyhow::Result<()> + Send + Sync>;

/// Strict check for FASTA/FASTQ files; the final argument indicates whether
/// index files are expected to be present in the directory.
pub type IndexedStrictCheck =
    Arc<dyn Fn(&Path, &ObjectMetadata, &Options, bool) -> anyhow::Result<()> + Send + Sync>;

/// Application-supplied check for duplicated rows in the `levels` of a
/// data frame factor.  Returns `true` if any row is duplicated.
pub type AnyDuplicated =
    Arc<dyn Fn(&Path, &ObjectMetadata, &Options) -> anyhow::Result<bool> + Send + Sync>;

/// Validation options.
///
/// Most fields tune input performance; the `custom` registry and the
/// strict-check callbacks extend validation behavior.  All of this is
/// read-only during dispatch, so it should be fully configured before the
/// first call into [`crate::validate`].
#[derive(Clone)]
pub struct Options {
    /// Whether to parallelize reading from disk and parsing, when available.
    /// This is a performance hint and never changes the validation outcome.
    pub parallel_reads: bool,

    /// Maximum number of elements per block when scanning HDF5 datasets.
    pub hdf5_buffer_size: usize,

    /// Custom registries of validation, height and dimension functions, plus
    /// derivation and interface tables.  Entries here take precedence over
    /// the defaults.
    pub custom: CustomRegistry,

    /// Options passed through to the delayed-operation sub-validator.
    pub delayed_array: delayed::DelayedOptions,

    /// Strict check for `bam_file` objects.
    pub bam_file_strict_check: Option<StrictCheck>,
    /// Strict check for `bcf_file` objects.
    pub bcf_file_strict_check: Option<StrictCheck>,
    /// Strict check for `bed_file` objects.
    pub bed_file_strict_check: Option<StrictCheck>,
    /// Strict check for `bigbed_file` objects.
    pub bigbed_file_strict_check: Option<StrictCheck>,
    /// Strict check for `bigwig_file` objects.
    pub bigwig_file_strict_check: Option<StrictCheck>,
    /// Strict check for `fasta_file` objects.
    pub fasta_file_strict_check: Option<IndexedStrictCheck>,
    /// Strict check for `fastq_file` objects.
    pub fastq_file_strict_check: Option<IndexedStrictCheck>,
    /// Strict check for `gff_file` objects.
    pub gff_file_strict_check: Option<StrictCheck>,
    /// Strict check for `gmt_file` objects.
    pub gmt_file_strict_check: Option<StrictCheck>,
    /// Strict check for `rds_file` objects.
    pub rds_file_strict_check: Option<StrictCheck>,
    /// Strict check for `image_file` objects.
    pub image_file_strict_check: Option<StrictCheck>,

    /// Optional duplicate-row check for `data_frame_factor` levels.  When
    /// supplied and it reports a duplicate, validation fails.
    pub data_frame_factor_any_duplicated: Option<AnyDuplicated>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            parallel_reads: true,
            hdf5_buffer_size: 10_000,
            custom: CustomRegistry::default(),
            delayed_array: delayed::DelayedOptions::default(),
            bam_file_strict_check: None,
            bcf_file_strict_check: None,
            bed_file_strict_check: None,
            bigbed_file_strict_check: None,
            bigwig_file_strict_check: None,
            fasta_file_strict_check: None,
            fastq_file_strict_check: None,
            gff_file_strict_check: None,
            gmt_file_strict_check: None,
            rds_file_strict_check: None,
            image_file_strict_check: None,
            data_frame_factor_any_duplicated: None,
        }
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("parallel_reads", &self.parallel_reads)
            .field("hdf5_buffer_size", &self.hdf5_buffer_size)
            .field("custom", &self.custom)
            .finish_non_exhaustive()
    }
}
