//! WAV container I/O.
//!
//! The core works on raw frame bytes; this module moves those bytes in and
//! out of mono integer PCM WAV files without changing a single byte.
//!
//! ```text
//! frame bytes:  [b0 b1][b2 b3][b4 b5] ...     (sample width 2)
//!                  |      |      |
//! samples:       s0     s1     s2   ...       (little-endian, signed)
//! ```
//!
//! 8-bit WAV samples are unsigned on disk, so hound shifts them by 128;
//! wider samples are signed little-endian and map to bytes directly.

use anyhow::{bail, Context, Result};
use std::path::Path;

/// Frame rate written into every encoded WAV.
pub const FRAME_RATE: u32 = 44_100;

/// Encoded WAVs are mono.
pub const CHANNELS: u16 = 1;

/// Sample widths hound can write as integer PCM.
pub const SUPPORTED_WIDTHS: std::ops::RangeInclusive<u8> = 1..=4;

/// Write `frames` as the data chunk of a mono PCM WAV at `path`.
///
/// `frames.len()` must be a multiple of `sample_width`, which the encoder
/// guarantees through padding.
pub fn write_frames(path: &Path, frames: &[u8], sample_width: u8) -> Result<()> {
    if !SUPPORTED_WIDTHS.contains(&sample_width) {
        bail!("unsupported WAV sample width {sample_width} (expected 1-4 bytes)");
    }
    let width = sample_width as usize;
    if frames.len() % width != 0 {
        bail!(
            "{} frame bytes do not fill whole {}-byte samples",
            frames.len(),
            width
        );
    }

    let spec = hound::WavSpec {
        channels: CHANNELS,
        sample_rate: FRAME_RATE,
        bits_per_sample: u16::from(sample_width) * 8,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("failed to create {}", path.display()))?;

    for chunk in frames.chunks_exact(width) {
        writer
            .write_sample(bytes_to_sample(chunk))
            .with_context(|| format!("failed to write samples to {}", path.display()))?;
    }
    writer
        .finalize()
        .with_context(|| format!("failed to finalize {}", path.display()))?;

    log::debug!(
        "wrote {} samples ({} bytes) to {}",
        frames.len() / width,
        frames.len(),
        path.display()
    );
    Ok(())
}

/// Read the raw frame bytes and the sample width (in bytes) of a WAV.
pub fn read_frames(path: &Path) -> Result<(Vec<u8>, u8)> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("failed to open WAV {}", path.display()))?;
    let spec = reader.spec();

    if spec.sample_format != hound::SampleFormat::Int {
        bail!("{} holds float samples, expected integer PCM", path.display());
    }
    let width = u8::try_from((spec.bits_per_sample + 7) / 8)
        .with_context(|| format!("bad bits per sample {}", spec.bits_per_sample))?;
    if !SUPPORTED_WIDTHS.contains(&width) {
        bail!("unsupported WAV sample width {width} in {}", path.display());
    }

    let mut frames = Vec::with_capacity(reader.len() as usize * width as usize);
    for sample in reader.samples::<i32>() {
        let sample =
            sample.with_context(|| format!("failed to read samples from {}", path.display()))?;
        sample_to_bytes(sample, width, &mut frames);
    }

    log::debug!(
        "read {} bytes at sample width {} from {}",
        frames.len(),
        width,
        path.display()
    );
    Ok((frames, width))
}

/// Little-endian bytes -> signed sample, sign-extended from the top byte.
fn bytes_to_sample(bytes: &[u8]) -> i32 {
    if let [byte] = bytes {
        return i32::from(*byte) - 128;
    }
    let mut raw = [0u8; 4];
    raw[..bytes.len()].copy_from_slice(bytes);
    let shift = 32 - 8 * bytes.len() as u32;
    (i32::from_le_bytes(raw) << shift) >> shift
}

fn sample_to_bytes(sample: i32, width: u8, out: &mut Vec<u8>) {
    if width == 1 {
        out.push((sample + 128) as u8);
    } else {
        out.extend_from_slice(&sample.to_le_bytes()[..width as usize]);
    }
}
