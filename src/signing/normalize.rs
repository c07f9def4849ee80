//! Bundle hash normalization.
//!
//! A bundle hash of 81 trytes is read as three groups of 27 tryte values.
//! Each group is nudged one unit at a time until its digits sum to zero, so
//! that a signature reveals the same amount of every key fragment.

use crate::signing::SigningError;
use crate::ternary::{tryte_value, TrytesError, FRAGMENT_LENGTH, HASH_TRYTES};

/// Number of normalized fragments in a bundle hash.
pub const NORMALIZED_FRAGMENTS: usize = HASH_TRYTES / FRAGMENT_LENGTH;

/// Largest digit magnitude.
pub const MAX_DIGIT: i8 = 13;

/// Normalize an 81-tryte bundle hash into 81 digits in [-13, 13].
///
/// Every 27-digit fragment of the result sums to zero.
pub fn normalized_bundle(bundle_hash: &str) -> Result<[i8; HASH_TRYTES], SigningError> {
    if bundle_hash.len() != HASH_TRYTES {
        return Err(SigningError::BundleHashLength(bundle_hash.len()));
    }

    let mut normalized = [0i8; HASH_TRYTES];
    for (index, c) in bundle_hash.chars().enumerate() {
        normalized[index] = tryte_value(c)
            .ok_or(SigningError::Trytes(TrytesError::InvalidTryte { index, found: c }))?;
    }

    for fragment in normalized.chunks_exact_mut(FRAGMENT_LENGTH) {
        balance(fragment);
    }
    Ok(normalized)
}

/// Bring the digit sum of one fragment to zero.
fn balance(fragment: &mut [i8]) {
    let mut sum: i32 = fragment.iter().map(|&d| i32::from(d)).sum();

    while sum > 0 {
        match fragment.iter_mut().find(|d| **d > -MAX_DIGIT) {
            Some(digit) => *digit -= 1,
            None => break,
        }
        sum -= 1;
    }

    while sum < 0 {
        match fragment.iter_mut().find(|d| **d < MAX_DIGIT) {
            Some(digit) => *digit += 1,
            None => break,
        }
        sum += 1;
    }
}

/// Split a normalized bundle into its three 27-digit fragments.
pub fn fragments(normalized: &[i8; HASH_TRYTES]) -> [[i8; FRAGMENT_LENGTH]; NORMALIZED_FRAGMENTS] {
    let mut out = [[0i8; FRAGMENT_LENGTH]; NORMALIZED_FRAGMENTS];
    for (dst, src) in out.iter_mut().zip(normalized.chunks_exact(FRAGMENT_LENGTH)) {
        dst.copy_from_slice(src);
    }
    out
}

/// Normalize and split in one step.
pub fn normalized_fragments(
    bundle_hash: &str,
) -> Result<[[i8; FRAGMENT_LENGTH]; NORMALIZED_FRAGMENTS], SigningError> {
    normalized_bundle(bundle_hash).map(|n| fragments(&n))
}

/// False if any digit is 13.
///
/// A 13 means the matching key block is published without hashing.
pub fn is_secure(normalized: &[i8]) -> bool {
    !normalized.contains(&MAX_DIGIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLE: &str =
        "RHBKYBCLYZCDQDUQPPJDFYPMNXPXDULWVEXOUDQFNTLHZRDHHAAYJLZOTUSBMTPIRATMJRCUWFOTUWGDA";

    const EXPECTED: [i8; 81] = [
        11, 8, 2, 11, -2, 2, 3, 12, -2, -1, 3, 4, -10, 4, -6, -10, -11, -11, 10, 4, 6, -2, -11,
        13, -13, -3, -11, -13, 0, -6, 12, -4, -5, 5, -3, -12, -6, 4, -10, 6, -13, -7, 12, 8, -1,
        -9, 4, 8, 8, 1, 1, -2, 10, 12, 13, 13, 1, -6, -8, 2, 13, -7, -11, 9, -9, 1, -7, 13, 10,
        -9, 3, -6, -4, 6, -12, -7, -6, -4, 7, 4, 1,
    ];

    #[test]
    fn test_known_normalization() {
        assert_eq!(normalized_bundle(BUNDLE).unwrap(), EXPECTED);
    }

    #[test]
    fn test_fragments_sum_to_zero() {
        let normalized = normalized_bundle(BUNDLE).unwrap();
        for fragment in fragments(&normalized) {
            let sum: i32 = fragment.iter().map(|&d| i32::from(d)).sum();
            assert_eq!(sum, 0);
            assert!(fragment.iter().all(|d| (-13..=13).contains(d)));
        }
    }

    #[test]
    fn test_all_nines_is_already_balanced() {
        let normalized = normalized_bundle(&"9".repeat(81)).unwrap();
        assert!(normalized.iter().all(|&d| d == 0));
        assert!(is_secure(&normalized));
    }

    #[test]
    fn test_saturated_fragment() {
        // 27 x 'M' (13) sums to 351; each digit gets pulled down in order.
        let hash = format!("{}{}", "M".repeat(27), "9".repeat(54));
        let normalized = normalized_bundle(&hash).unwrap();
        let sum: i32 = normalized[..27].iter().map(|&d| i32::from(d)).sum();
        assert_eq!(sum, 0);
        assert_eq!(normalized[0], -13);
    }

    #[test]
    fn test_is_secure() {
        let normalized = normalized_bundle(BUNDLE).unwrap();
        assert!(!is_secure(&normalized));
        assert!(is_secure(&[0, -13, 12]));
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(normalized_bundle("ABC"), Err(SigningError::BundleHashLength(3))));
        let bad = format!("{}a", "9".repeat(80));
        assert!(matches!(
            normalized_bundle(&bad),
            Err(SigningError::Trytes(TrytesError::InvalidTryte { index: 80, .. }))
        ));
    }
}
