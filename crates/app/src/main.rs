//! wavremix: hide any file inside a WAV container and get it back out
//!
//! Encode wraps `<file>` into `WavReMiX_<stem>.wav`; decode turns such a WAV
//! back into `output.<ext>`.

mod config;
mod naming;
mod wav;

use anyhow::{bail, Context, Result};
use clap::Parser;
use config::{Cli, Config, Mode};
use std::path::{Path, PathBuf};
use wavremix_core::metrics::Metrics;
use wavremix_core::{decode, encode_file, CodeTable};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::from_cli(cli);
    if config.print_config {
        config.print();
    }

    let mut metrics = Metrics::new();
    let written = match config.mode {
        Mode::Encode => run_encode(&config, &mut metrics)?,
        Mode::Decode => run_decode(&config, &mut metrics)?,
    };
    metrics.complete();

    println!("wrote {}", written.display());
    if config.print_summary {
        metrics.print_summary(wav::FRAME_RATE);
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

/// Encode the input file into a WAV in the output directory.
fn run_encode(config: &Config, metrics: &mut Metrics) -> Result<PathBuf> {
    let encoded = encode_file(
        &config.input,
        &config.table,
        config.sample_width,
        config.overflow,
    )
    .with_context(|| format!("failed to encode {}", config.input.display()))?;
    metrics.record_encode(&encoded.layout);

    let out_path = config
        .out_dir
        .join(naming::encoded_file_name(&config.input));
    log::info!(
        "encoding {} (extension {:?}) into {}",
        config.input.display(),
        encoded.extension,
        out_path.display()
    );

    let result = wav::write_frames(&out_path, &encoded.payload, config.sample_width).and_then(
        |()| {
            if config.verify {
                let (content, extension) = encoded.expected_decode();
                verify(&out_path, content, extension, &config.table)?;
                metrics.verified = true;
            }
            Ok(())
        },
    );
    if let Err(err) = result {
        remove_partial(&out_path);
        return Err(err);
    }

    Ok(out_path)
}

/// Read an encoded WAV back and check it decodes to `content` and
/// `extension`.
fn verify(path: &Path, content: &[u8], extension: &str, table: &CodeTable) -> Result<()> {
    let (frames, width) = wav::read_frames(path)?;
    let decoded = decode(&frames, width, table)
        .with_context(|| format!("verification of {} failed", path.display()))?;

    if decoded.content != content {
        bail!(
            "verification of {} failed: recovered {} bytes that differ from the {} input bytes",
            path.display(),
            decoded.content.len(),
            content.len()
        );
    }
    if decoded.extension != extension {
        bail!(
            "verification of {} failed: recovered extension {:?}, expected {:?}",
            path.display(),
            decoded.extension,
            extension
        );
    }
    log::debug!("verified {}", path.display());
    Ok(())
}

/// Decode the input WAV into `output.<ext>` in the output directory.
fn run_decode(config: &Config, metrics: &mut Metrics) -> Result<PathBuf> {
    let (frames, width) = wav::read_frames(&config.input)?;
    let decoded = decode(&frames, width, &config.table)
        .with_context(|| format!("failed to decode {}", config.input.display()))?;
    metrics.record_decode(&decoded.layout);

    let out_path = config
        .out_dir
        .join(naming::decoded_file_name(&decoded.extension));
    log::info!(
        "recovered {} bytes (extension {:?}) into {}",
        decoded.content.len(),
        decoded.extension,
        out_path.display()
    );

    if let Err(err) = std::fs::write(&out_path, &decoded.content) {
        remove_partial(&out_path);
        return Err(err).with_context(|| format!("failed to write {}", out_path.display()));
    }

    Ok(out_path)
}

fn remove_partial(path: &Path) {
    if path.exists() {
        if let Err(err) = std::fs::remove_file(path) {
            log::warn!("could not remove partial output {}: {}", path.display(), err);
        }
    }
}
