//! Command line interface for validating on-disk object stores.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use itertools::Itertools;

/// CLI parser based on clap.
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Validate on-disk bioinformatics object stores",
    long_about = "This tool checks that a directory is a structurally and semantically valid \
                  representation of its declared object type, recursing into any nested objects."
)]
struct Cli {
    /// Verbosity of the program
    #[clap(flatten)]
    verbose: Verbosity<InfoLevel>,

    /// The sub command to run
    #[command(subcommand)]
    command: Commands,
}

/// Enum supporting the parsing of top-level commands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate an object directory.
    Validate(PathArgs),
    /// Report the height (leading extent) of an object.
    Height(PathArgs),
    /// Report the full extent vector of a multi-dimensional object.
    Dimensions(PathArgs),
}

/// Arguments shared by all sub commands.
#[derive(Debug, Args)]
struct PathArgs {
    /// Path to the directory containing the object.
    path: PathBuf,

    /// Buffer size for scanning HDF5 datasets, in elements.
    #[arg(long, default_value_t = 10_000)]
    hdf5_buffer_size: usize,

    /// Disable parallel reading of compressed payloads.
    #[arg(long)]
    no_parallel_reads: bool,
}

impl PathArgs {
    fn options(&self) -> bioshelf::Options {
        bioshelf::Options {
            parallel_reads: !self.no_parallel_reads,
            hdf5_buffer_size: self.hdf5_buffer_size,
            ..Default::default()
        }
    }
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Build a tracing subscriber according to the configured verbosity.
    let collector = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(match cli.verbose.log_level() {
            Some(level) => match level {
                log::Level::Error => tracing::Level::ERROR,
                log::Level::Warn => tracing::Level::WARN,
                log::Level::Info => tracing::Level::INFO,
                log::Level::Debug => tracing::Level::DEBUG,
                log::Level::Trace => tracing::Level::TRACE,
            },
            None => tracing::Level::INFO,
        })
        .compact()
        .finish();

    tracing::subscriber::with_default(collector, || {
        match &cli.command {
            Commands::Validate(args) => {
                bioshelf::validate(&args.path, &args.options())
                    .map_err(|e| anyhow::anyhow!("{}", e))?;
                println!("ok");
            }
            Commands::Height(args) => {
                let height = bioshelf::height(&args.path, &args.options())
                    .map_err(|e| anyhow::anyhow!("{}", e))?;
                println!("{}", height);
            }
            Commands::Dimensions(args) => {
                let dimensions = bioshelf::dimensions(&args.path, &args.options())
                    .map_err(|e| anyhow::anyhow!("{}", e))?;
                println!("{}", dimensions.iter().join(" x "));
            }
        }

        Ok::<(), anyhow::Error>(())
    })
}
