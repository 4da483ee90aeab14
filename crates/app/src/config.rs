//! Configuration for the wavremix application.
//!
//! Command-line arguments are parsed by clap into [`Cli`], then resolved into
//! a [`Config`]: the code table is loaded once here and never changes for the
//! rest of the run.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use wavremix_core::{CodeTable, OverflowPolicy};

/// Which way to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Wrap a file in a WAV container
    Encode,
    /// Recover a file from a WAV container
    Decode,
}

/// File encoder and decoder to WAV.
#[derive(Parser, Debug)]
#[command(name = "wavremix", version, about, long_about = None)]
pub struct Cli {
    /// Encode/decode mode
    #[arg(short, long, value_enum, default_value_t = Mode::Encode)]
    pub mode: Mode,

    /// Location of the file to handle
    pub file: PathBuf,

    /// JSON code table for file extensions (default: built-in table)
    #[arg(long)]
    pub code: Option<PathBuf>,

    /// WAV sample width in bytes (encode only; decode uses the file's)
    #[arg(
        long,
        alias = "sample_width",
        default_value_t = 2,
        value_parser = clap::value_parser!(u8).range(1..=4)
    )]
    pub sample_width: u8,

    /// Directory to write output files into
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Write extensions of 50+ characters with a 0 length byte instead of failing
    #[arg(long)]
    pub legacy_overflow: bool,

    /// After encoding, read the WAV back and check the file round-trips
    #[arg(long)]
    pub verify: bool,

    /// Print resolved configuration
    #[arg(long)]
    pub print_config: bool,

    /// Don't print the summary
    #[arg(long)]
    pub no_summary: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Where the code table came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    /// No `--code` given
    Builtin,
    /// Loaded from this file
    File(PathBuf),
    /// This file failed to load; the built-in table is used instead
    Fallback(PathBuf),
}

/// Complete configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    // === Mode ===
    pub mode: Mode,

    // === Files ===
    /// Input file (any file on encode, a WAV on decode)
    pub input: PathBuf,

    /// Directory output files are written into
    pub out_dir: PathBuf,

    // === Trailer ===
    /// Extension code table, fixed for the run
    pub table: CodeTable,

    /// Origin of `table`
    pub table_source: TableSource,

    /// Bytes per sample when encoding
    pub sample_width: u8,

    /// Handling of over-long extensions
    pub overflow: OverflowPolicy,

    // === Behavior ===
    /// Whether to read the encoded WAV back and decode it
    pub verify: bool,

    /// Whether to print detailed config
    pub print_config: bool,

    /// Whether to print the summary
    pub print_summary: bool,
}

impl Config {
    /// Resolve parsed arguments into a configuration.
    ///
    /// A code table that cannot be loaded is not fatal: a warning is logged
    /// and the built-in table is used.
    pub fn from_cli(cli: Cli) -> Self {
        let (table, table_source) = match cli.code {
            None => (CodeTable::default(), TableSource::Builtin),
            Some(path) => match CodeTable::from_path(&path) {
                Ok(table) => {
                    if table.is_empty() {
                        log::warn!(
                            "code table {} is empty, only files without an extension can be encoded",
                            path.display()
                        );
                    }
                    (table, TableSource::File(path))
                }
                Err(err) => {
                    log::warn!(
                        "code table {} is unusable ({}), using default",
                        path.display(),
                        err
                    );
                    (CodeTable::default(), TableSource::Fallback(path))
                }
            },
        };

        Config {
            mode: cli.mode,
            input: cli.file,
            out_dir: cli.out_dir,
            table,
            table_source,
            sample_width: cli.sample_width,
            overflow: if cli.legacy_overflow {
                OverflowPolicy::Sentinel
            } else {
                OverflowPolicy::Reject
            },
            verify: cli.verify,
            print_config: cli.print_config,
            print_summary: !cli.no_summary,
        }
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        println!("Mode:       {:?}", self.mode);
        println!("Input:      {}", self.input.display());
        println!("Output dir: {}", self.out_dir.display());
        println!();
        println!("=== Trailer ===");
        match &self.table_source {
            TableSource::Builtin => println!("Code table: built-in ({} entries)", self.table.len()),
            TableSource::File(path) => println!(
                "Code table: {} ({} entries)",
                path.display(),
                self.table.len()
            ),
            TableSource::Fallback(path) => println!(
                "Code table: built-in ({} entries, {} failed to load)",
                self.table.len(),
                path.display()
            ),
        }
        if self.mode == Mode::Encode {
            println!("Sample width: {} bytes", self.sample_width);
            println!("Overflow policy: {:?}", self.overflow);
            println!("Verify: {}", self.verify);
        }
        println!();
    }
}
