//! Tryte strings and conversions between trits, trytes and bytes.
//!
//! A tryte is three trits, written as one character of
//! `9ABCDEFGHIJKLMNOPQRSTUVWXYZ`. `9` is zero, `A`..`M` are 1..13 and
//! `N`..`Z` are -13..-1. Trits are ordered least significant first.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ternary::bigint::Bigint;
use crate::ternary::Trit;

/// The 27 tryte symbols, indexed by unbalanced value.
pub const TRYTE_ALPHABET: &str = "9ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Number of trits in one tryte.
pub const TRITS_PER_TRYTE: usize = 3;

/// Trits in one hash (and in one sponge chunk).
pub const HASH_TRITS: usize = 243;

/// Trytes in one hash.
pub const HASH_TRYTES: usize = 81;

/// Bytes in one hash when encoded through the bigint bridge.
pub const HASH_BYTES: usize = 48;

/// Address length without checksum.
pub const ADDRESS_LENGTH: usize = 81;

/// Address length including the 9-tryte checksum.
pub const ADDRESS_LENGTH_WITH_CHECKSUM: usize = 90;

/// Checksum length.
pub const CHECKSUM_LENGTH: usize = 9;

/// Trytes per normalized bundle fragment, and blocks per key fragment.
pub const FRAGMENT_LENGTH: usize = 27;

const ALPHABET: &[u8; 27] = b"9ABCDEFGHIJKLMNOPQRSTUVWXYZ";

use Trit::{N, O, P};

/// Trits of each tryte symbol, in alphabet order.
const TRYTE_TRITS: [[Trit; 3]; 27] = [
    [O, O, O], [P, O, O], [N, P, O], [O, P, O], [P, P, O], [N, N, P],
    [O, N, P], [P, N, P], [N, O, P], [O, O, P], [P, O, P], [N, P, P],
    [O, P, P], [P, P, P], [N, N, N], [O, N, N], [P, N, N], [N, O, N],
    [O, O, N], [P, O, N], [N, P, N], [O, P, N], [P, P, N], [N, N, O],
    [O, N, O], [P, N, O], [N, O, O],
];

/// Errors raised while parsing or converting ternary data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrytesError {
    #[error("invalid tryte '{found}' at position {index}")]
    InvalidTryte { index: usize, found: char },

    #[error("expected {expected} trytes, got {got}")]
    WrongLength { expected: usize, got: usize },

    #[error("{len} trits is not a multiple of {multiple}")]
    NotTritMultiple { len: usize, multiple: usize },

    #[error("{len} bytes is not a multiple of {multiple}")]
    NotByteMultiple { len: usize, multiple: usize },

    #[error("odd number of trytes ({0}) cannot encode ASCII text")]
    OddLength(usize),

    #[error("character {0:?} is not ASCII")]
    NonAscii(char),
}

/// Unbalanced index (0..27) of a tryte symbol.
#[inline]
fn tryte_index(c: u8) -> Option<usize> {
    match c {
        b'9' => Some(0),
        b'A'..=b'Z' => Some((c - b'A' + 1) as usize),
        _ => None,
    }
}

/// Balanced value (-13..=13) of a tryte symbol.
pub fn tryte_value(c: char) -> Option<i8> {
    if !c.is_ascii() {
        return None;
    }
    tryte_index(c as u8).map(|i| if i > 13 { i as i8 - 27 } else { i as i8 })
}

/// Tryte symbol for a balanced value in -13..=13.
pub fn value_to_tryte(value: i8) -> Option<char> {
    if !(-13..=13).contains(&value) {
        return None;
    }
    let index = if value < 0 { value + 27 } else { value } as usize;
    Some(ALPHABET[index] as char)
}

/// Whether every character belongs to the tryte alphabet.
pub fn is_valid_trytes(trytes: &str) -> bool {
    trytes.bytes().all(|c| tryte_index(c).is_some())
}

/// Whether `trytes` is a valid tryte string of exactly `len` characters.
pub fn is_trytes_of_len(trytes: &str, len: usize) -> bool {
    trytes.len() == len && is_valid_trytes(trytes)
}

/// Whether `trytes` is a valid 81-tryte hash.
pub fn is_valid_hash(trytes: &str) -> bool {
    is_trytes_of_len(trytes, HASH_TRYTES)
}

/// Whether `address` has a valid alphabet and a length of 81 or 90.
pub fn is_valid_address(address: &str) -> bool {
    (address.len() == ADDRESS_LENGTH || address.len() == ADDRESS_LENGTH_WITH_CHECKSUM)
        && is_valid_trytes(address)
}

fn check_trytes(trytes: &str) -> Result<(), TrytesError> {
    match trytes.chars().enumerate().find(|&(_, c)| tryte_value(c).is_none()) {
        Some((index, found)) => Err(TrytesError::InvalidTryte { index, found }),
        None => Ok(()),
    }
}

/// Convert a tryte string to trits.
pub fn trytes_to_trits(trytes: &str) -> Result<Vec<Trit>, TrytesError> {
    check_trytes(trytes)?;
    let mut trits = Vec::with_capacity(trytes.len() * TRITS_PER_TRYTE);
    for c in trytes.bytes() {
        // Validated above.
        let index = tryte_index(c).unwrap_or(0);
        trits.extend_from_slice(&TRYTE_TRITS[index]);
    }
    Ok(trits)
}

/// Convert trits to a tryte string. The length must be a multiple of 3.
pub fn trits_to_trytes(trits: &[Trit]) -> Result<String, TrytesError> {
    if trits.len() % TRITS_PER_TRYTE != 0 {
        return Err(TrytesError::NotTritMultiple {
            len: trits.len(),
            multiple: TRITS_PER_TRYTE,
        });
    }
    Ok(trits
        .chunks_exact(TRITS_PER_TRYTE)
        .map(|t| {
            let value = t[0].to_i8() + 3 * t[1].to_i8() + 9 * t[2].to_i8();
            let index = if value < 0 { value + 27 } else { value } as usize;
            ALPHABET[index] as char
        })
        .collect())
}

/// Encode hash-sized trit chunks as 48-byte big-endian integers.
///
/// The last trit of every 243-trit chunk is not encoded.
pub fn trits_to_bytes(trits: &[Trit]) -> Result<Vec<u8>, TrytesError> {
    if trits.is_empty() || trits.len() % HASH_TRITS != 0 {
        return Err(TrytesError::NotTritMultiple {
            len: trits.len(),
            multiple: HASH_TRITS,
        });
    }
    let mut bytes = Vec::with_capacity(trits.len() / HASH_TRITS * HASH_BYTES);
    for chunk in trits.chunks_exact(HASH_TRITS) {
        bytes.extend_from_slice(&Bigint::from_trits(chunk).to_bytes());
    }
    Ok(bytes)
}

/// Decode 48-byte chunks into 243-trit chunks (last trit of each is zero).
pub fn bytes_to_trits(bytes: &[u8]) -> Result<Vec<Trit>, TrytesError> {
    if bytes.is_empty() || bytes.len() % HASH_BYTES != 0 {
        return Err(TrytesError::NotByteMultiple {
            len: bytes.len(),
            multiple: HASH_BYTES,
        });
    }
    let mut trits = vec![Trit::O; bytes.len() / HASH_BYTES * HASH_TRITS];
    for (chunk, out) in bytes.chunks_exact(HASH_BYTES).zip(trits.chunks_exact_mut(HASH_TRITS)) {
        Bigint::from_bytes(chunk).write_trits(out);
    }
    Ok(trits)
}

/// Encode 81-tryte chunks as bytes.
pub fn trytes_to_bytes(trytes: &str) -> Result<Vec<u8>, TrytesError> {
    trits_to_bytes(&trytes_to_trits(trytes)?)
}

/// Decode bytes into 81-tryte chunks.
pub fn bytes_to_trytes(bytes: &[u8]) -> Result<String, TrytesError> {
    trits_to_trytes(&bytes_to_trits(bytes)?)
}

/// Encode ASCII text as trytes, two trytes per character.
pub fn ascii_to_trytes(text: &str) -> Result<String, TrytesError> {
    let mut out = String::with_capacity(text.len() * 2);
    for c in text.chars() {
        if !c.is_ascii() {
            return Err(TrytesError::NonAscii(c));
        }
        let code = c as usize;
        out.push(ALPHABET[code % 27] as char);
        out.push(ALPHABET[code / 27] as char);
    }
    Ok(out)
}

/// Decode trytes produced by [`ascii_to_trytes`].
pub fn trytes_to_ascii(trytes: &str) -> Result<String, TrytesError> {
    check_trytes(trytes)?;
    if trytes.len() % 2 != 0 {
        return Err(TrytesError::OddLength(trytes.len()));
    }
    let mut out = String::with_capacity(trytes.len() / 2);
    for pair in trytes.as_bytes().chunks_exact(2) {
        let low = tryte_index(pair[0]).unwrap_or(0);
        let high = tryte_index(pair[1]).unwrap_or(0);
        let code = low + high * 27;
        if code > 0x7f {
            return Err(TrytesError::NonAscii(char::from_u32(code as u32).unwrap_or('?')));
        }
        out.push(code as u8 as char);
    }
    Ok(out)
}

/// A validated tryte string.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Trytes(String);

impl Trytes {
    /// Parse and validate a tryte string.
    pub fn new(trytes: impl Into<String>) -> Result<Self, TrytesError> {
        let trytes = trytes.into();
        check_trytes(&trytes)?;
        Ok(Self(trytes))
    }

    /// Build from trits (length must be a multiple of 3).
    pub fn from_trits(trits: &[Trit]) -> Result<Self, TrytesError> {
        trits_to_trytes(trits).map(Self)
    }

    /// Parse and require an exact length.
    pub fn with_len(trytes: impl Into<String>, len: usize) -> Result<Self, TrytesError> {
        let trytes = Self::new(trytes)?;
        if trytes.len() != len {
            return Err(TrytesError::WrongLength { expected: len, got: trytes.len() });
        }
        Ok(trytes)
    }

    /// The trit form.
    pub fn to_trits(&self) -> Vec<Trit> {
        let mut trits = Vec::with_capacity(self.0.len() * TRITS_PER_TRYTE);
        for c in self.0.bytes() {
            trits.extend_from_slice(&TRYTE_TRITS[tryte_index(c).unwrap_or(0)]);
        }
        trits
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every tryte is `9`.
    pub fn is_null(&self) -> bool {
        self.0.bytes().all(|c| c == b'9')
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Trytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Trytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Trytes({})", self.0)
    }
}

impl FromStr for Trytes {
    type Err = TrytesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Trytes::new(s)
    }
}

impl TryFrom<String> for Trytes {
    type Error = TrytesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Trytes::new(value)
    }
}

impl From<Trytes> for String {
    fn from(trytes: Trytes) -> Self {
        trytes.0
    }
}

impl AsRef<str> for Trytes {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tryte_table_matches_values() {
        for (index, trits) in TRYTE_TRITS.iter().enumerate() {
            let value = trits[0].to_i8() + 3 * trits[1].to_i8() + 9 * trits[2].to_i8();
            let expected = if index > 13 { index as i8 - 27 } else { index as i8 };
            assert_eq!(value, expected, "tryte {}", ALPHABET[index] as char);
        }
    }

    #[test]
    fn test_trytes_roundtrip() {
        let trytes = "GYOMKVTSNHVJNCNFBBAH9AAMXLPLLLROQY99QN9DLSJUHDPBLCFFAIQXZA9BKMBJCYSFHFPXAHDWZFEIZ";
        let trits = trytes_to_trits(trytes).unwrap();
        assert_eq!(trits.len(), 243);
        assert_eq!(trits_to_trytes(&trits).unwrap(), trytes);
    }

    #[test]
    fn test_known_trytes() {
        assert_eq!(trytes_to_trits("9").unwrap(), vec![O, O, O]);
        assert_eq!(trytes_to_trits("A").unwrap(), vec![P, O, O]);
        assert_eq!(trytes_to_trits("M").unwrap(), vec![P, P, P]);
        assert_eq!(trytes_to_trits("N").unwrap(), vec![N, N, N]);
        assert_eq!(trytes_to_trits("Z").unwrap(), vec![N, O, O]);
    }

    #[test]
    fn test_tryte_values() {
        assert_eq!(tryte_value('9'), Some(0));
        assert_eq!(tryte_value('M'), Some(13));
        assert_eq!(tryte_value('N'), Some(-13));
        assert_eq!(tryte_value('Z'), Some(-1));
        assert_eq!(tryte_value('a'), None);
        for value in -13..=13 {
            assert_eq!(tryte_value(value_to_tryte(value).unwrap()), Some(value));
        }
        assert_eq!(value_to_tryte(14), None);
    }

    #[test]
    fn test_invalid_trytes() {
        assert_eq!(
            trytes_to_trits("AB8C"),
            Err(TrytesError::InvalidTryte { index: 2, found: '8' })
        );
        assert!(!is_valid_trytes("abc"));
        assert!(is_valid_trytes(""));
        assert!(Trytes::new("HELLO9WORLD").is_ok());
        assert!(Trytes::new("hello").is_err());
    }

    #[test]
    fn test_trits_not_multiple_of_three() {
        assert_eq!(
            trits_to_trytes(&[P, O]),
            Err(TrytesError::NotTritMultiple { len: 2, multiple: 3 })
        );
    }

    #[test]
    fn test_address_validation() {
        let body = "9".repeat(81);
        assert!(is_valid_address(&body));
        assert!(is_valid_address(&format!("{}A9BEONKZW", body)));
        assert!(!is_valid_address(&"9".repeat(80)));
        assert!(!is_valid_address(&"9".repeat(85)));
        assert!(!is_valid_address(&format!("{}a", "9".repeat(80))));
        assert!(is_valid_hash(&body));
    }

    #[test]
    fn test_bytes_roundtrip() {
        let trytes = "GYOMKVTSNHVJNCNFBBAH9AAMXLPLLLROQY99QN9DLSJUHDPBLCFFAIQXZA9BKMBJCYSFHFPXAHDWZFEI9";
        let bytes = trytes_to_bytes(trytes).unwrap();
        assert_eq!(bytes.len(), 48);
        // Last tryte '9' keeps the final trit at zero, so the round trip is exact.
        assert_eq!(bytes_to_trytes(&bytes).unwrap(), trytes);
    }

    #[test]
    fn test_bytes_length_errors() {
        assert!(matches!(trits_to_bytes(&[O; 100]), Err(TrytesError::NotTritMultiple { .. })));
        assert!(matches!(bytes_to_trits(&[0; 47]), Err(TrytesError::NotByteMultiple { .. })));
        assert!(bytes_to_trits(&[]).is_err());
    }

    #[test]
    fn test_ascii_roundtrip() {
        let trytes = ascii_to_trytes("Hello, ternary!").unwrap();
        assert_eq!(trytes.len(), 30);
        assert_eq!(trytes_to_ascii(&trytes).unwrap(), "Hello, ternary!");
        assert_eq!(ascii_to_trytes("Z").unwrap(), "IC");
        assert_eq!(trytes_to_ascii("ABC"), Err(TrytesError::OddLength(3)));
        assert!(matches!(ascii_to_trytes("é"), Err(TrytesError::NonAscii('é'))));
    }

    #[test]
    fn test_trytes_serde() {
        let trytes = Trytes::new("ABC9").unwrap();
        let json = serde_json::to_string(&trytes).unwrap();
        assert_eq!(json, "\"ABC9\"");
        let back: Trytes = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trytes);
        assert!(serde_json::from_str::<Trytes>("\"abc\"").is_err());
    }

    #[test]
    fn test_with_len() {
        assert!(Trytes::with_len("9".repeat(81), 81).is_ok());
        assert_eq!(
            Trytes::with_len("99", 81),
            Err(TrytesError::WrongLength { expected: 81, got: 2 })
        );
    }
}
