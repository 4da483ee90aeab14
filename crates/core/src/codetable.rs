//! Character-to-code tables for file extensions.
//!
//! Each character of an extension is stored in the trailer as a two-digit
//! decimal code packed into one byte (code 81 becomes byte 0x81). A table maps
//! characters to codes and must be a bijection: the decoder reverses it.
//!
//! # Invariants
//! - Every code is in `0..=99`
//! - No two characters share a code
//! - The reverse mapping is built once, at construction
//!
//! # External Tables
//!
//! A table can be loaded from a JSON object mapping single-character strings
//! to codes. Codes may be written as integers (`81`) or digit strings (`"81"`):
//!
//! ```text
//! { "t": 51, "x": 23, "5": "50" }
//! ```

use crate::error::{CodeTableError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Number of distinct codes (`00`..=`99`).
const CODE_SPACE: usize = 100;

/// Built-in table used when no external table is supplied or it fails to load.
pub const DEFAULT_CODES: [(char, u8); 36] = [
    ('q', 11),
    ('w', 21),
    ('e', 31),
    ('r', 41),
    ('t', 51),
    ('y', 61),
    ('u', 71),
    ('i', 81),
    ('o', 91),
    ('a', 12),
    ('s', 22),
    ('d', 32),
    ('f', 42),
    ('g', 52),
    ('h', 62),
    ('j', 72),
    ('k', 82),
    ('l', 92),
    ('z', 13),
    ('x', 23),
    ('c', 33),
    ('v', 43),
    ('b', 53),
    ('n', 63),
    ('m', 73),
    ('p', 83),
    ('0', 93),
    ('1', 10),
    ('2', 20),
    ('3', 30),
    ('4', 40),
    ('5', 50),
    ('6', 60),
    ('7', 70),
    ('8', 80),
    ('9', 90),
];

/// A two-digit decimal code in `0..=99`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Code(u8);

impl Code {
    /// Largest representable code.
    pub const MAX: u8 = 99;

    /// Create a code, or `None` if `value` has more than two decimal digits.
    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MAX).then_some(Self(value))
    }

    /// The decimal value of this code.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Pack the tens digit into the high nibble and the ones digit into the
    /// low nibble.
    pub fn to_wire_byte(self) -> u8 {
        ((self.0 / 10) << 4) | (self.0 % 10)
    }

    /// Unpack a trailer byte. Returns `None` if either nibble is above 9.
    pub fn from_wire_byte(byte: u8) -> Option<Self> {
        let (tens, ones) = (byte >> 4, byte & 0x0F);
        if tens > 9 || ones > 9 {
            return None;
        }
        Some(Self(tens * 10 + ones))
    }
}

/// Code value as it appears in a JSON table.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCode {
    Number(i64),
    Text(String),
}

impl RawCode {
    fn to_code(&self) -> Option<u8> {
        match self {
            RawCode::Number(n) => u8::try_from(*n).ok(),
            RawCode::Text(s) => {
                if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                s.parse().ok()
            }
        }
        .filter(|&value| value <= Code::MAX)
    }

    fn display(&self) -> String {
        match self {
            RawCode::Number(n) => n.to_string(),
            RawCode::Text(s) => format!("{s:?}"),
        }
    }
}

/// Bijective mapping between extension characters and codes.
///
/// Immutable once built. Lookups in both directions are O(log n) / O(1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    forward: BTreeMap<char, Code>,
    reverse: [Option<char>; CODE_SPACE],
}

impl CodeTable {
    fn empty() -> Self {
        Self {
            forward: BTreeMap::new(),
            reverse: [None; CODE_SPACE],
        }
    }

    /// Build a table from `(character, code)` pairs.
    ///
    /// # Errors
    /// - `CodeTableError::InvalidCodeValue` if a code is above 99
    /// - `CodeTableError::DuplicateCode` if two characters share a code
    /// - `CodeTableError::DuplicateKey` if a character is listed twice
    pub fn new<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (char, u8)>,
    {
        let mut table = Self::empty();

        for (ch, value) in pairs {
            let code = Code::new(value).ok_or_else(|| CodeTableError::InvalidCodeValue {
                key: ch.to_string(),
                value: value.to_string(),
            })?;

            if table.forward.contains_key(&ch) {
                return Err(CodeTableError::DuplicateKey { key: ch }.into());
            }

            if let Some(first) = table.reverse[code.value() as usize] {
                return Err(CodeTableError::DuplicateCode {
                    code: code.value(),
                    first,
                    second: ch,
                }
                .into());
            }

            table.forward.insert(ch, code);
            table.reverse[code.value() as usize] = Some(ch);
        }

        Ok(table)
    }

    /// The built-in table: lowercase letters and digits.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for (ch, value) in DEFAULT_CODES {
            table.forward.insert(ch, Code(value));
            table.reverse[value as usize] = Some(ch);
        }
        table
    }

    /// Parse a table from a JSON object of single-character keys to codes.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, RawCode> =
            serde_json::from_str(json).map_err(CodeTableError::from)?;

        let mut pairs = Vec::with_capacity(raw.len());
        for (key, raw_code) in &raw {
            let mut chars = key.chars();
            let ch = match (chars.next(), chars.next()) {
                (Some(ch), None) => ch,
                _ => return Err(CodeTableError::InvalidKey { key: key.clone() }.into()),
            };

            let value = raw_code
                .to_code()
                .ok_or_else(|| CodeTableError::InvalidCodeValue {
                    key: key.clone(),
                    value: raw_code.display(),
                })?;
            pairs.push((ch, value));
        }

        Self::new(pairs)
    }

    /// Load a JSON table from disk.
    ///
    /// # Errors
    /// `CodeTableError::Read` if the file cannot be read, otherwise any error
    /// from [`CodeTable::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CodeTableError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Code assigned to `ch`, if any.
    pub fn code_for(&self, ch: char) -> Option<Code> {
        self.forward.get(&ch).copied()
    }

    /// Character assigned to `code`, if any.
    pub fn char_for(&self, code: Code) -> Option<char> {
        self.reverse[code.value() as usize]
    }

    /// Number of characters in the table.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// True if the table maps no characters.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Iterate over `(character, code)` pairs in character order.
    pub fn iter(&self) -> impl Iterator<Item = (char, Code)> + '_ {
        self.forward.iter().map(|(&ch, &code)| (ch, code))
    }
}

impl Default for CodeTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;

    #[test]
    fn test_builtin_table_is_valid() {
        let validated = CodeTable::new(DEFAULT_CODES).unwrap();
        assert_eq!(validated, CodeTable::builtin());
        assert_eq!(validated.len(), 36);
        assert!(!validated.is_empty());
    }

    #[test]
    fn test_json_empty_table() {
        let table = CodeTable::from_json_str("{}").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert_eq!(table.code_for('a'), None);
    }

    #[test]
    fn test_builtin_lookups() {
        let table = CodeTable::default();
        assert_eq!(table.code_for('t').map(Code::value), Some(51));
        assert_eq!(table.code_for('o').map(Code::value), Some(91));
        assert_eq!(table.char_for(Code::new(93).unwrap()), Some('0'));
        assert_eq!(table.code_for('T'), None);
        assert_eq!(table.code_for('.'), None);
        assert_eq!(table.char_for(Code::new(0).unwrap()), None);
    }

    #[test]
    fn test_wire_byte_packing() {
        assert_eq!(Code::new(81).unwrap().to_wire_byte(), 0x81);
        assert_eq!(Code::new(7).unwrap().to_wire_byte(), 0x07);
        assert_eq!(Code::new(99).unwrap().to_wire_byte(), 0x99);
        assert_eq!(Code::from_wire_byte(0x51).map(Code::value), Some(51));
        assert_eq!(Code::from_wire_byte(0x00).map(Code::value), Some(0));
    }

    #[test]
    fn test_wire_byte_rejects_hex_nibbles() {
        assert!(Code::from_wire_byte(0x8A).is_none());
        assert!(Code::from_wire_byte(0xA1).is_none());
        assert!(Code::from_wire_byte(0xFF).is_none());
    }

    #[test]
    fn test_code_range() {
        assert!(Code::new(99).is_some());
        assert!(Code::new(100).is_none());
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let result = CodeTable::new([('a', 12), ('b', 12)]);
        assert!(matches!(
            result,
            Err(Error::CodeTable(CodeTableError::DuplicateCode {
                code: 12,
                first: 'a',
                second: 'b'
            }))
        ));
    }

    #[test]
    fn test_repeated_key_rejected() {
        let result = CodeTable::new([('a', 12), ('a', 13)]);
        assert!(matches!(
            result,
            Err(Error::CodeTable(CodeTableError::DuplicateKey { key: 'a' }))
        ));
    }

    #[test]
    fn test_out_of_range_code_rejected() {
        let result = CodeTable::new([('a', 100)]);
        assert!(matches!(
            result,
            Err(Error::CodeTable(CodeTableError::InvalidCodeValue { .. }))
        ));
    }

    #[test]
    fn test_json_numbers_and_strings() {
        let table = CodeTable::from_json_str(r#"{"t": 51, "X": "07", "-": 0}"#).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.code_for('X').map(Code::value), Some(7));
        assert_eq!(table.code_for('-').map(Code::value), Some(0));
        assert_eq!(table.char_for(Code::new(51).unwrap()), Some('t'));
    }

    #[test]
    fn test_json_invalid_values() {
        for json in [
            r#"{"a": 100}"#,
            r#"{"a": -1}"#,
            r#"{"a": "8a"}"#,
            r#"{"a": "123"}"#,
            r#"{"a": ""}"#,
        ] {
            let result = CodeTable::from_json_str(json);
            assert!(
                matches!(
                    result,
                    Err(Error::CodeTable(CodeTableError::InvalidCodeValue { .. }))
                ),
                "{json} should be rejected, got {result:?}"
            );
        }
    }

    #[test]
    fn test_json_multi_char_key() {
        let result = CodeTable::from_json_str(r#"{"ab": 12}"#);
        assert!(matches!(
            result,
            Err(Error::CodeTable(CodeTableError::InvalidKey { .. }))
        ));
    }

    #[test]
    fn test_json_malformed() {
        for json in ["not json", "[1, 2]", r#"{"a": 1.5}"#, r#"{"a": null}"#] {
            let result = CodeTable::from_json_str(json);
            assert!(
                matches!(result, Err(Error::CodeTable(CodeTableError::Parse(_)))),
                "{json} should fail to parse, got {result:?}"
            );
        }
    }

    #[test]
    fn test_json_duplicate_code() {
        let result = CodeTable::from_json_str(r#"{"a": 12, "b": 12}"#);
        assert!(matches!(
            result,
            Err(Error::CodeTable(CodeTableError::DuplicateCode { .. }))
        ));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"w": 21, "a": 12, "v": 43}}"#).unwrap();

        let table = CodeTable::from_path(file.path()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.code_for('v').map(Code::value), Some(43));
    }

    #[test]
    fn test_from_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = CodeTable::from_path(dir.path().join("missing.json"));
        assert!(matches!(
            result,
            Err(Error::CodeTable(CodeTableError::Read { .. }))
        ));
    }

    #[test]
    fn test_iter_in_char_order() {
        let table = CodeTable::new([('b', 53), ('a', 12)]).unwrap();
        let pairs: Vec<_> = table.iter().map(|(ch, code)| (ch, code.value())).collect();
        assert_eq!(pairs, vec![('a', 12), ('b', 53)]);
    }
}
