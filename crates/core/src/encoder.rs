//! Trailer encoding: file bytes + extension -> sample-aligned payload.
//!
//! The payload is written to a WAV file as raw frames by the caller. See
//! [`crate::trailer`] for the byte layout.

use crate::codetable::{Code, CodeTable};
use crate::error::{EncodeError, Result};
use crate::trailer::{
    extension_of, is_valid_sample_width, ExtensionLength, OverflowPolicy, TrailerLayout,
    MAX_EXTENSION_LEN, PAD_BYTE,
};
use std::path::Path;

/// Build a payload, rejecting extensions longer than [`MAX_EXTENSION_LEN`].
///
/// # Example
/// ```
/// use wavremix_core::{encoder::encode, CodeTable};
///
/// let payload = encode(b"0123456789", "to", &CodeTable::default(), 2).unwrap();
/// assert_eq!(&payload[10..], &[0x51, 0x91, 0x02, 0x02]);
/// ```
pub fn encode(
    content: &[u8],
    extension: &str,
    table: &CodeTable,
    sample_width: u8,
) -> Result<Vec<u8>> {
    encode_with_policy(content, extension, table, sample_width, OverflowPolicy::Reject)
}

/// A payload built from a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFile {
    /// Bytes to write as WAV frames
    pub payload: Vec<u8>,

    /// Extension taken from the file name
    pub extension: String,

    /// Region sizes of `payload`
    pub layout: TrailerLayout,
}

impl EncodedFile {
    /// The original file bytes at the front of the payload.
    pub fn content(&self) -> &[u8] {
        &self.payload[..self.layout.content_len]
    }

    /// Content and extension that decoding `payload` yields.
    ///
    /// Same as the input, except for an extension written with
    /// [`OverflowPolicy::Sentinel`]: its code bytes stay on the content and
    /// no extension comes back.
    pub fn expected_decode(&self) -> (&[u8], &str) {
        match ExtensionLength::for_extension(self.extension.chars().count()) {
            ExtensionLength::Overflow(_) => (
                &self.payload[..self.layout.content_len + self.layout.extension_bytes],
                "",
            ),
            _ => (self.content(), &self.extension),
        }
    }
}

/// Build a payload with an explicit policy for over-long extensions.
///
/// # Errors
/// - `EncodeError::InvalidSampleWidth` if `sample_width` is 0 or 255
/// - `EncodeError::ExtensionTooLong` if the extension has 50+ characters
///   and `policy` is `Reject`
/// - `EncodeError::UnknownExtensionCharacter` for the first extension
///   character missing from `table`
pub fn encode_with_policy(
    content: &[u8],
    extension: &str,
    table: &CodeTable,
    sample_width: u8,
    policy: OverflowPolicy,
) -> Result<Vec<u8>> {
    assemble(content, extension, table, sample_width, policy).map(|(payload, _)| payload)
}

/// Read a file and encode it under the extension taken from its name.
///
/// Nothing is returned unless the whole payload was built.
pub fn encode_file(
    path: &Path,
    table: &CodeTable,
    sample_width: u8,
    policy: OverflowPolicy,
) -> Result<EncodedFile> {
    let extension = extension_of(path);
    let content = std::fs::read(path)?;
    let (payload, layout) = assemble(&content, &extension, table, sample_width, policy)?;

    Ok(EncodedFile {
        payload,
        extension,
        layout,
    })
}

fn assemble(
    content: &[u8],
    extension: &str,
    table: &CodeTable,
    sample_width: u8,
    policy: OverflowPolicy,
) -> Result<(Vec<u8>, TrailerLayout)> {
    if !is_valid_sample_width(sample_width) {
        return Err(EncodeError::InvalidSampleWidth(sample_width).into());
    }

    let length = ExtensionLength::for_extension(extension.chars().count());
    if let ExtensionLength::Overflow(chars) = length {
        match policy {
            OverflowPolicy::Reject => {
                return Err(EncodeError::ExtensionTooLong {
                    length: chars,
                    max: MAX_EXTENSION_LEN,
                }
                .into());
            }
            OverflowPolicy::Sentinel => {
                log::warn!(
                    "extension has {} characters (max {}); writing length 0, it will not be recovered",
                    chars,
                    MAX_EXTENSION_LEN
                );
            }
        }
    }

    let codes = extension
        .chars()
        .map(|ch| {
            table
                .code_for(ch)
                .map(Code::to_wire_byte)
                .ok_or(EncodeError::UnknownExtensionCharacter { ch })
        })
        .collect::<std::result::Result<Vec<u8>, _>>()?;

    let layout = TrailerLayout::plan(content.len(), codes.len(), sample_width);
    log::debug!(
        "encoding {} bytes, extension {:?} ({} code bytes), width {}, padding {}",
        layout.content_len,
        extension,
        layout.extension_bytes,
        sample_width,
        layout.padding
    );

    let mut payload = Vec::with_capacity(layout.total_len());
    payload.extend_from_slice(content);
    payload.extend_from_slice(&codes);
    payload.push(length.wire_byte());
    payload.push(sample_width);
    payload.resize(layout.total_len(), PAD_BYTE);

    Ok((payload, layout))
}
