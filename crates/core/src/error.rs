//! Error types for wavremix-core.
//!
//! Every lookup or format violation surfaces as a structured error. Nothing
//! in the encode/decode path panics or silently drops bytes.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all operations in the crate.
///
/// Each variant corresponds to a specific failure domain:
/// - Code table: loading or validating a character-to-code mapping
/// - Encode: building a trailer for a file
/// - Decode: locating and validating a trailer in WAV frames
/// - I/O: reading the input file
#[derive(Debug, Error)]
pub enum Error {
    /// Code table could not be loaded or is not a valid bijection
    #[error("code table error: {0}")]
    CodeTable(#[from] CodeTableError),

    /// Encoding a file into a payload failed
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Decoding frames back into a file failed
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Code table loading and validation errors.
///
/// Any of these coming out of [`CodeTable::from_path`](crate::codetable::CodeTable::from_path)
/// is a load failure; callers are expected to fall back to the built-in table.
#[derive(Debug, Error)]
pub enum CodeTableError {
    /// Table file could not be read
    #[error("cannot read code table {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Table file is not a JSON object of character -> code
    #[error("malformed code table: {0}")]
    Parse(#[from] serde_json::Error),

    /// Key is not exactly one character
    #[error("code table key {key:?} must be a single character")]
    InvalidKey { key: String },

    /// Character is listed more than once
    #[error("character {key:?} is assigned more than once")]
    DuplicateKey { key: char },

    /// Code does not fit in two decimal digits
    #[error("code {value} for {key:?} is not a two-digit decimal code (0-99)")]
    InvalidCodeValue { key: String, value: String },

    /// Two characters share a code, so the reverse lookup would be ambiguous
    #[error("code {code:02} is assigned to both {first:?} and {second:?}")]
    DuplicateCode { code: u8, first: char, second: char },
}

/// Trailer encoding errors.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Extension contains a character the code table does not map
    #[error("extension character {ch:?} is not in the code table")]
    UnknownExtensionCharacter { ch: char },

    /// Sample width is 0 or collides with the padding byte
    #[error("invalid sample width {0}: must be between 1 and 254")]
    InvalidSampleWidth(u8),

    /// Extension has too many characters for the one-byte length field
    #[error("extension is {length} characters long, maximum is {max}")]
    ExtensionTooLong { length: usize, max: usize },
}

/// Trailer decoding errors.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The container's sample width differs from the one recorded at encode time
    #[error("sample width modified: should be {expected} but is {actual}")]
    SampleWidthMismatch { expected: u8, actual: u8 },

    /// Trailer byte does not reverse-map to any character in the table
    #[error("code {code:02} is not assigned to any character in the code table")]
    UnknownCode { code: u8 },

    /// Trailer byte is not a packed pair of decimal digits
    #[error("trailer byte {byte:#04x} is not a packed two-digit code")]
    MalformedCode { byte: u8 },

    /// Frames are empty or consist only of padding
    #[error("no trailer found: {frames} bytes of frames contain only padding")]
    MissingTrailer { frames: usize },

    /// Trailer claims more bytes than the frames hold
    #[error("trailer truncated: need {required} bytes, got {actual}")]
    Truncated { required: usize, actual: usize },

    /// Length byte is outside the range the encoder writes
    #[error("extension length byte {0} is out of range (0-49)")]
    InvalidExtensionLength(u8),

    /// Recorded width matches the container but no encoder writes it
    #[error("recorded sample width {0} is invalid: must be between 1 and 254")]
    InvalidSampleWidth(u8),
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
