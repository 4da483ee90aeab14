//! Trailer wire layout shared by the encoder and decoder.
//!
//! A payload is the original file followed by a short trailer and padding,
//! sized so the whole thing splits evenly into audio samples.
//!
//! # Payload Format
//!
//! ```text
//! +----------------------+
//! | content (N bytes)    |  original file bytes, untouched
//! +----------------------+
//! | extension codes      |  one packed code per extension character
//! | (L bytes)            |  (code 51 -> byte 0x51)
//! +----------------------+
//! | length (1)           |  L if 1..=49, 0 for no extension
//! +----------------------+
//! | sample width (1)     |  bytes per sample used at encode time
//! +----------------------+
//! | padding (0..w-1)     |  0xFF until total length % w == 0
//! +----------------------+
//! ```
//!
//! # Locating the Trailer
//!
//! Code bytes never exceed 0x99, the length byte never exceeds 49 and the
//! width byte never exceeds 254, so the first non-0xFF byte scanning back from
//! the end is always the width byte.

use std::path::Path;

/// Byte used to pad the payload to a whole number of samples.
pub const PAD_BYTE: u8 = 0xFF;

/// Longest extension whose length fits in the length byte.
pub const MAX_EXTENSION_LEN: usize = 49;

/// Largest sample width that cannot be mistaken for padding.
pub const MAX_SAMPLE_WIDTH: u8 = PAD_BYTE - 1;

/// Length byte + sample width byte.
pub const FIXED_TRAILER_LEN: usize = 2;

/// Number of characters recorded in the length byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionLength {
    /// No extension; wire byte 0
    Empty,
    /// 1..=49 characters; wire byte is the count
    Len(u8),
    /// 50 or more characters; only writable as the 0 sentinel
    Overflow(usize),
}

impl ExtensionLength {
    /// Classify an extension by its character count.
    pub fn for_extension(chars: usize) -> Self {
        match chars {
            0 => ExtensionLength::Empty,
            n if n <= MAX_EXTENSION_LEN => ExtensionLength::Len(n as u8),
            n => ExtensionLength::Overflow(n),
        }
    }

    /// Interpret a length byte read from a trailer.
    ///
    /// Returns `None` for bytes the encoder never writes (50 and above).
    /// A 0 byte is read as `Empty`; an overflowed extension written with the
    /// sentinel is indistinguishable from no extension at all.
    pub fn from_wire_byte(byte: u8) -> Option<Self> {
        match byte as usize {
            0 => Some(ExtensionLength::Empty),
            n if n <= MAX_EXTENSION_LEN => Some(ExtensionLength::Len(byte)),
            _ => None,
        }
    }

    /// Byte written to the trailer.
    pub fn wire_byte(self) -> u8 {
        match self {
            ExtensionLength::Empty | ExtensionLength::Overflow(_) => 0,
            ExtensionLength::Len(n) => n,
        }
    }

    /// Number of code bytes that precede the length byte.
    pub fn code_bytes(self) -> usize {
        match self {
            ExtensionLength::Empty => 0,
            ExtensionLength::Len(n) => n as usize,
            ExtensionLength::Overflow(n) => n,
        }
    }
}

/// What the encoder does with an extension longer than [`MAX_EXTENSION_LEN`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Fail with `EncodeError::ExtensionTooLong`
    #[default]
    Reject,
    /// Write every code byte followed by a 0 length byte. Decoding such a
    /// payload yields no extension and leaves the code bytes on the content.
    Sentinel,
}

/// Sizes of each region of an encoded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailerLayout {
    /// Original file bytes
    pub content_len: usize,

    /// Extension code bytes
    pub extension_bytes: usize,

    /// Sample width recorded in the trailer
    pub sample_width: u8,

    /// 0xFF bytes after the width byte
    pub padding: usize,
}

impl TrailerLayout {
    /// Compute the layout for a payload about to be encoded.
    pub fn plan(content_len: usize, extension_bytes: usize, sample_width: u8) -> Self {
        let unpadded = content_len + extension_bytes + FIXED_TRAILER_LEN;
        Self {
            content_len,
            extension_bytes,
            sample_width,
            padding: padding_len(unpadded, sample_width),
        }
    }

    /// Bytes between content and padding.
    pub fn trailer_len(&self) -> usize {
        self.extension_bytes + FIXED_TRAILER_LEN
    }

    /// Total payload length, padding included.
    pub fn total_len(&self) -> usize {
        self.content_len + self.trailer_len() + self.padding
    }

    /// Number of samples the payload occupies; 0 for a zero width.
    pub fn samples(&self) -> usize {
        self.total_len()
            .checked_div(self.sample_width as usize)
            .unwrap_or(0)
    }
}

/// True if `width` can be written to and recovered from a trailer.
pub fn is_valid_sample_width(width: u8) -> bool {
    (1..=MAX_SAMPLE_WIDTH).contains(&width)
}

/// Padding needed to round `len` up to a multiple of `sample_width`.
///
/// Always in `0..sample_width`; zero when `len` is already aligned or the
/// width is zero.
pub fn padding_len(len: usize, sample_width: u8) -> usize {
    let width = sample_width as usize;
    match len.checked_rem(width) {
        Some(0) | None => 0,
        Some(rem) => width - rem,
    }
}

/// Extension of `path`: everything after the last `.` of the file name.
///
/// Returns an empty string when the name has no `.` or ends with one.
/// Non-UTF-8 names are converted lossily.
pub fn extension_of(path: &Path) -> String {
    let Some(name) = path.file_name() else {
        return String::new();
    };
    let name = name.to_string_lossy();
    match name.rfind('.') {
        Some(dot) => name[dot + 1..].to_string(),
        None => String::new(),
    }
}
