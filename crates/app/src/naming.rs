//! Output file names.

use std::path::Path;

/// Prefix of every encoded WAV file name.
pub const ENCODED_PREFIX: &str = "WavReMiX_";

/// Characters of the input stem kept in the encoded name.
pub const STEM_CHARS: usize = 10;

/// Base name of every decoded file.
pub const DECODED_STEM: &str = "output";

/// `WavReMiX_<first 10 chars of the input stem>.wav`
pub fn encoded_file_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let short: String = stem.chars().take(STEM_CHARS).collect();
    format!("{ENCODED_PREFIX}{short}.wav")
}

/// `output.<extension>`, or `output` when no extension was recorded.
///
/// Custom code tables may map codes to path separators; those are replaced
/// so the decoded file always lands in the output directory.
pub fn decoded_file_name(extension: &str) -> String {
    if extension.is_empty() {
        return DECODED_STEM.to_string();
    }
    let safe: String = extension
        .chars()
        .map(|ch| match ch {
            '/' | '\\' | '\0' => '_',
            ch => ch,
        })
        .collect();
    if safe != extension {
        log::warn!("extension {extension:?} contains path separators, writing as {safe:?}");
    }
    format!("{DECODED_STEM}.{safe}")
}
