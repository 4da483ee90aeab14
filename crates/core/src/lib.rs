//! wavremix-core: hide arbitrary files inside WAV audio frames
//!
//! This library provides the framing used to carry a file through a WAV
//! container and get it back:
//! - Appends a trailer recording the file extension and the sample width
//! - Pads the payload to a whole number of audio samples
//! - Scans the trailer back out of the frames and validates it
//!
//! Writing and reading the WAV container itself is left to the caller; the
//! core only ever sees frame bytes and a sample width.
//!
//! # Architecture
//!
//! - `codetable`: bijective character <-> two-digit code mapping
//! - `trailer`: trailer byte layout, padding rule, extension extraction
//! - `encoder`: file bytes + extension -> payload
//! - `decoder`: payload -> file bytes + extension
//! - `metrics`: per-run counters and summary
//!
//! # Example
//!
//! ```
//! use wavremix_core::{decode, encode, CodeTable};
//!
//! let table = CodeTable::default();
//! let frames = encode(b"%PDF-1.7", "pdf", &table, 2)?;
//! assert_eq!(frames.len() % 2, 0);
//!
//! let decoded = decode(&frames, 2, &table)?;
//! assert_eq!(decoded.content, b"%PDF-1.7");
//! assert_eq!(decoded.extension, "pdf");
//! # Ok::<(), wavremix_core::Error>(())
//! ```

pub mod codetable;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod metrics;
pub mod trailer;

// Re-export commonly used types
pub use codetable::{Code, CodeTable};
pub use decoder::{decode, DecodedFile};
pub use encoder::{encode, encode_file, encode_with_policy, EncodedFile};
pub use error::{Error, Result};
pub use trailer::{OverflowPolicy, TrailerLayout};
