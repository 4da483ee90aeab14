//! Trailer decoding: WAV frames -> original file bytes + extension.
//!
//! # Algorithm
//!
//! 1. Skip the trailing run of 0xFF padding bytes
//! 2. The byte before it is the recorded sample width; it must equal the
//!    width the WAV container reports, otherwise the container was altered
//!    after encoding and decoding stops here
//! 3. The next byte inward is the extension length
//! 4. That many bytes before it are packed codes, reverse-mapped through the
//!    code table to extension characters
//! 5. Everything before the codes is the original file
//!
//! The width check runs before any code lookup, so a tampered container is
//! always reported as `SampleWidthMismatch` and never as a table problem.

use crate::codetable::{Code, CodeTable};
use crate::error::{DecodeError, Result};
use crate::trailer::{
    is_valid_sample_width, ExtensionLength, TrailerLayout, FIXED_TRAILER_LEN, PAD_BYTE,
};

/// A file recovered from WAV frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFile {
    /// Original file bytes
    pub content: Vec<u8>,

    /// Extension without the leading dot; empty if none was recorded
    pub extension: String,

    /// Region sizes found while scanning the trailer
    pub layout: TrailerLayout,
}

/// Recover the original file from `frames`.
///
/// # Arguments
/// - `frames`: raw frame bytes read from the WAV file
/// - `reported_sample_width`: sample width declared by the WAV header
/// - `table`: the code table used at encode time
///
/// # Errors
/// - `DecodeError::MissingTrailer` if `frames` is empty or all padding
/// - `DecodeError::SampleWidthMismatch` if the recorded width differs from
///   `reported_sample_width`
/// - `DecodeError::InvalidSampleWidth` if both widths agree on 0
/// - `DecodeError::Truncated` if the trailer runs past the start of `frames`
/// - `DecodeError::InvalidExtensionLength` for a length byte of 50 or more
/// - `DecodeError::MalformedCode` for a code byte with a nibble above 9
/// - `DecodeError::UnknownCode` for a code missing from `table`
pub fn decode(
    frames: &[u8],
    reported_sample_width: u8,
    table: &CodeTable,
) -> Result<DecodedFile> {
    let padding = frames.iter().rev().take_while(|&&b| b == PAD_BYTE).count();
    let unpadded = &frames[..frames.len() - padding];

    let (&recorded_width, rest) = unpadded.split_last().ok_or(DecodeError::MissingTrailer {
        frames: frames.len(),
    })?;

    if recorded_width != reported_sample_width {
        return Err(DecodeError::SampleWidthMismatch {
            expected: recorded_width,
            actual: reported_sample_width,
        }
        .into());
    }
    if !is_valid_sample_width(recorded_width) {
        return Err(DecodeError::InvalidSampleWidth(recorded_width).into());
    }

    let (&length_byte, rest) = rest.split_last().ok_or(DecodeError::Truncated {
        required: FIXED_TRAILER_LEN,
        actual: unpadded.len(),
    })?;

    let length = ExtensionLength::from_wire_byte(length_byte)
        .ok_or(DecodeError::InvalidExtensionLength(length_byte))?;
    let code_bytes = length.code_bytes();

    if code_bytes > rest.len() {
        return Err(DecodeError::Truncated {
            required: code_bytes + FIXED_TRAILER_LEN,
            actual: unpadded.len(),
        }
        .into());
    }

    let (content, tag) = rest.split_at(rest.len() - code_bytes);
    let extension = tag
        .iter()
        .map(|&byte| {
            let code = Code::from_wire_byte(byte).ok_or(DecodeError::MalformedCode { byte })?;
            table
                .char_for(code)
                .ok_or(DecodeError::UnknownCode { code: code.value() })
        })
        .collect::<std::result::Result<String, _>>()?;

    if length == ExtensionLength::Empty {
        log::debug!("trailer records no extension");
    }

    let layout = TrailerLayout {
        content_len: content.len(),
        extension_bytes: code_bytes,
        sample_width: recorded_width,
        padding,
    };
    log::debug!(
        "decoded {} bytes, extension {:?}, width {}, padding {}",
        layout.content_len,
        extension,
        layout.sample_width,
        layout.padding
    );

    Ok(DecodedFile {
        content: content.to_vec(),
        extension,
        layout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{encode, encode_with_policy};
    use crate::error::Error;
    use crate::trailer::OverflowPolicy;

    #[test]
    fn test_reference_frames() {
        let content: Vec<u8> = (0..10).collect();
        let mut frames = content.clone();
        frames.extend_from_slice(&[0x51, 0x91, 0x02, 0x02]);

        let decoded = decode(&frames, 2, &CodeTable::default()).unwrap();
        assert_eq!(decoded.content, content);
        assert_eq!(decoded.extension, "to");
        assert_eq!(decoded.layout.padding, 0);
        assert_eq!(decoded.layout.total_len(), frames.len());
    }

    #[test]
    fn test_skips_padding() {
        let table = CodeTable::default();
        let frames = encode(b"hello", "txt", &table, 4).unwrap();
        assert_eq!(frames.len(), 12);

        let decoded = decode(&frames, 4, &table).unwrap();
        assert_eq!(decoded.content, b"hello");
        assert_eq!(decoded.extension, "txt");
        assert_eq!(decoded.layout.padding, 2);
    }

    #[test]
    fn test_content_ending_in_pad_bytes() {
        let table = CodeTable::default();
        let content = [0x00, 0xFF, 0xFF, 0xFF];
        let frames = encode(&content, "bin", &table, 3).unwrap();

        let decoded = decode(&frames, 3, &table).unwrap();
        assert_eq!(decoded.content, content);
        assert_eq!(decoded.extension, "bin");
    }

    #[test]
    fn test_sample_width_mismatch() {
        let table = CodeTable::default();
        let frames = encode(b"payload", "wav", &table, 2).unwrap();

        for reported in [0, 1, 3, 4, 255] {
            let result = decode(&frames, reported, &table);
            assert!(
                matches!(
                    result,
                    Err(Error::Decode(DecodeError::SampleWidthMismatch {
                        expected: 2,
                        actual
                    })) if actual == reported
                ),
                "reported width {reported}: {result:?}"
            );
        }
    }

    #[test]
    fn test_mismatch_checked_before_codes() {
        // Unknown code in the tag, but the width is wrong: the width wins
        let frames = [0xAA, 0x00, 0x01, 0x02];
        let result = decode(&frames, 4, &CodeTable::default());
        assert!(matches!(
            result,
            Err(Error::Decode(DecodeError::SampleWidthMismatch { .. }))
        ));
    }

    #[test]
    fn test_zero_width_rejected() {
        let result = decode(&[0xAB, 0x00, 0x00], 0, &CodeTable::default());
        assert!(matches!(
            result,
            Err(Error::Decode(DecodeError::InvalidSampleWidth(0)))
        ));

        // A container reporting a real width still sees a mismatch
        let result = decode(&[0xAB, 0x00, 0x00], 2, &CodeTable::default());
        assert!(matches!(
            result,
            Err(Error::Decode(DecodeError::SampleWidthMismatch {
                expected: 0,
                actual: 2
            }))
        ));
    }

    #[test]
    fn test_unknown_code() {
        let table = CodeTable::new([('a', 12)]).unwrap();
        let frames = [0x01, 0x13, 0x01, 0x01];
        let result = decode(&frames, 1, &table);
        assert!(matches!(
            result,
            Err(Error::Decode(DecodeError::UnknownCode { code: 13 }))
        ));
    }

    #[test]
    fn test_table_mismatch() {
        let frames = encode(b"data", "zip", &CodeTable::default(), 2).unwrap();
        let other = CodeTable::new([('z', 13), ('i', 81)]).unwrap();
        let result = decode(&frames, 2, &other);
        assert!(matches!(
            result,
            Err(Error::Decode(DecodeError::UnknownCode { code: 83 }))
        ));
    }

    #[test]
    fn test_malformed_code() {
        let frames = [0x01, 0x3C, 0x01, 0x01];
        let result = decode(&frames, 1, &CodeTable::default());
        assert!(matches!(
            result,
            Err(Error::Decode(DecodeError::MalformedCode { byte: 0x3C }))
        ));
    }

    #[test]
    fn test_missing_trailer() {
        for frames in [&[][..], &[0xFFu8, 0xFF][..]] {
            let result = decode(frames, 2, &CodeTable::default());
            assert!(matches!(
                result,
                Err(Error::Decode(DecodeError::MissingTrailer { .. }))
            ));
        }
    }

    #[test]
    fn test_truncated_trailer() {
        let result = decode(&[0x02], 2, &CodeTable::default());
        assert!(matches!(
            result,
            Err(Error::Decode(DecodeError::Truncated {
                required: 2,
                actual: 1
            }))
        ));

        // Length byte claims 5 codes, only 1 byte precedes it
        let result = decode(&[0x51, 0x05, 0x02, 0xFF], 2, &CodeTable::default());
        assert!(matches!(
            result,
            Err(Error::Decode(DecodeError::Truncated {
                required: 7,
                actual: 3
            }))
        ));
    }

    #[test]
    fn test_invalid_extension_length() {
        let result = decode(&[0x00, 0x32, 0x01], 1, &CodeTable::default());
        assert!(matches!(
            result,
            Err(Error::Decode(DecodeError::InvalidExtensionLength(50)))
        ));
    }

    #[test]
    fn test_no_extension_recorded() {
        let table = CodeTable::default();
        let frames = encode(b"README", "", &table, 2).unwrap();
        let decoded = decode(&frames, 2, &table).unwrap();
        assert_eq!(decoded.content, b"README");
        assert_eq!(decoded.extension, "");
    }

    #[test]
    fn test_sentinel_overflow_keeps_codes_on_content() {
        let table = CodeTable::default();
        let ext = "q".repeat(60);
        let frames =
            encode_with_policy(b"body", &ext, &table, 2, OverflowPolicy::Sentinel).unwrap();

        let decoded = decode(&frames, 2, &table).unwrap();
        assert_eq!(decoded.extension, "");
        assert_eq!(&decoded.content[..4], b"body");
        assert_eq!(decoded.content.len(), 4 + 60);
        assert!(decoded.content[4..].iter().all(|&b| b == 0x11));
    }
}
