//! Bridge between 243-trit balanced ternary values and 384-bit integers.
//!
//! A hash chunk of 243 trits is stored as a signed 384-bit integer in
//! twelve 32-bit words (least significant word first). Only 242 trits fit
//! into the signed range, so the 243rd trit is always treated as zero:
//! it is ignored on the way in and forced to zero on the way out.
//!
//! The byte form is 48 bytes, big-endian, two's complement.

use std::cmp::Ordering;
use std::fmt;

use crate::ternary::{Trit, HASH_BYTES, HASH_TRITS};

/// Number of 32-bit words in a [`Bigint`].
pub const WORDS: usize = 12;

/// The middle of the domain described by 242 trits, i.e. sum_{k=0}^{241} 3^k.
const HALF_3: [u32; WORDS] = [
    0xa5ce8964, 0x9f007669, 0x1484504f, 0x3ade00d9, 0x0c24486e, 0x50979d57,
    0x79a4c702, 0x48bbae36, 0xa9f6808b, 0xaa06a805, 0xa87fabdf, 0x5e69ebef,
];

/// Two's complement of `HALF_3`.
const NEG_HALF_3: [u32; WORDS] = [
    0x5a31769c, 0x60ff8996, 0xeb7bafb0, 0xc521ff26, 0xf3dbb791, 0xaf6862a8,
    0x865b38fd, 0xb74451c9, 0x56097f74, 0x55f957fa, 0x57805420, 0xa1961410,
];

/// 3^242, the weight of the trit that does not fit.
const LAST_TRIT: [u32; WORDS] = [
    0x4b9d12c9, 0x3e00ecd3, 0x2908a09f, 0x75bc01b2, 0x184890dc, 0xa12f3aae,
    0xf3498e04, 0x91775c6c, 0x53ed0116, 0x540d500b, 0x50ff57bf, 0xbcd3d7df,
];

/// A fixed-width signed 384-bit integer.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Bigint {
    /// Least significant word at index 0.
    words: [u32; WORDS],
}

impl Bigint {
    /// Create a zero value.
    #[inline]
    pub const fn zero() -> Self {
        Self { words: [0; WORDS] }
    }

    /// Create from a machine integer (sign-extended).
    pub fn from_i64(value: i64) -> Self {
        let fill = if value < 0 { u32::MAX } else { 0 };
        let mut words = [fill; WORDS];
        words[0] = value as u32;
        words[1] = (value >> 32) as u32;
        Self { words }
    }

    /// Convert to a machine integer, or `None` if the value does not fit.
    pub fn to_i64(&self) -> Option<i64> {
        let fill = if self.is_negative() { u32::MAX } else { 0 };
        if self.words[2..].iter().any(|&w| w != fill) {
            return None;
        }
        let value = ((u64::from(self.words[1]) << 32) | u64::from(self.words[0])) as i64;
        // The sign bit of word 1 must agree with the extension words.
        if (value < 0) != self.is_negative() {
            return None;
        }
        Some(value)
    }

    /// Convert the first 243 trits of `trits` (least significant first).
    ///
    /// The 243rd trit is ignored.
    ///
    /// # Panics
    /// Panics if fewer than 243 trits are supplied.
    pub fn from_trits(trits: &[Trit]) -> Self {
        assert!(
            trits.len() >= HASH_TRITS,
            "Bigint::from_trits needs {} trits, got {}",
            HASH_TRITS,
            trits.len()
        );

        let mut value = Self::zero();
        for &trit in trits[..HASH_TRITS - 1].iter().rev() {
            // 3^242 < 2^384, so the accumulator never overflows.
            let carry = value.mul_small(3);
            debug_assert_eq!(carry, 0);
            // Unbalanced digit: -1, 0, 1 -> 0, 1, 2
            value.add_small((trit.to_i8() + 1) as u32);
        }

        // Shift back to balanced form: value - HALF_3 in two's complement.
        value.sub_words(&HALF_3);
        value
    }

    /// Convert to 243 balanced trits (least significant first).
    ///
    /// Values outside the 242-trit range are folded back into it first,
    /// and the 243rd trit of the result is always zero.
    pub fn to_trits(&self) -> Vec<Trit> {
        let mut out = vec![Trit::O; HASH_TRITS];
        self.write_trits(&mut out);
        out
    }

    /// Like [`to_trits`](Self::to_trits) but writes into an existing buffer.
    ///
    /// # Panics
    /// Panics if `out` is shorter than 243 trits.
    pub fn write_trits(&self, out: &mut [Trit]) {
        assert!(
            out.len() >= HASH_TRITS,
            "Bigint::write_trits needs room for {} trits, got {}",
            HASH_TRITS,
            out.len()
        );

        let mut value = *self;
        value.set_last_trit_zero();

        // Shift to the unbalanced range [0, 3^242).
        value.add_words(&HALF_3);

        for slot in out[..HASH_TRITS - 1].iter_mut() {
            let rem = value.div_small(3);
            *slot = Trit::from_i8(rem as i8 - 1);
        }
        out[HASH_TRITS - 1] = Trit::O;
    }

    /// Read 48 big-endian bytes.
    ///
    /// # Panics
    /// Panics if fewer than 48 bytes are supplied.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        assert!(
            bytes.len() >= HASH_BYTES,
            "Bigint::from_bytes needs {} bytes, got {}",
            HASH_BYTES,
            bytes.len()
        );

        let mut words = [0u32; WORDS];
        for (i, chunk) in bytes[..HASH_BYTES].chunks_exact(4).enumerate() {
            words[WORDS - 1 - i] = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Self { words }
    }

    /// Write as 48 big-endian bytes.
    pub fn to_bytes(&self) -> [u8; HASH_BYTES] {
        let mut out = [0u8; HASH_BYTES];
        for (i, chunk) in out.chunks_exact_mut(4).enumerate() {
            chunk.copy_from_slice(&self.words[WORDS - 1 - i].to_be_bytes());
        }
        out
    }

    /// Whether the two's complement sign bit is set.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.words[WORDS - 1] >> 31 != 0
    }

    /// Two's complement negation.
    pub fn negate(&mut self) {
        for word in self.words.iter_mut() {
            *word = !*word;
        }
        self.add_small(1);
    }

    /// Unsigned comparison of the raw words.
    fn cmp_words(&self, other: &[u32; WORDS]) -> Ordering {
        for i in (0..WORDS).rev() {
            match self.words[i].cmp(&other[i]) {
                Ordering::Equal => continue,
                ordering => return ordering,
            }
        }
        Ordering::Equal
    }

    /// Multiply in place by a small factor, returning the carry out of the top word.
    fn mul_small(&mut self, factor: u32) -> u32 {
        let mut carry = 0u32;
        for word in self.words.iter_mut() {
            let v = u64::from(factor) * u64::from(*word) + u64::from(carry);
            *word = v as u32;
            carry = (v >> 32) as u32;
        }
        carry
    }

    /// Divide in place by a small divisor, returning the remainder.
    fn div_small(&mut self, divisor: u32) -> u32 {
        let mut remainder = 0u64;
        for word in self.words.iter_mut().rev() {
            let v = (remainder << 32) | u64::from(*word);
            *word = (v / u64::from(divisor)) as u32;
            remainder = v % u64::from(divisor);
        }
        remainder as u32
    }

    /// Add a small value, returning true on overflow out of the top word.
    fn add_small(&mut self, summand: u32) -> bool {
        let (sum, mut carry) = self.words[0].overflowing_add(summand);
        self.words[0] = sum;
        for word in self.words[1..].iter_mut() {
            if !carry {
                break;
            }
            let (sum, c) = word.overflowing_add(1);
            *word = sum;
            carry = c;
        }
        carry
    }

    /// `self += other` modulo 2^384, returning the carry out.
    fn add_words(&mut self, other: &[u32; WORDS]) -> bool {
        let mut carry = false;
        for (word, &rhs) in self.words.iter_mut().zip(other.iter()) {
            let (s1, c1) = word.overflowing_add(rhs);
            let (s2, c2) = s1.overflowing_add(carry as u32);
            *word = s2;
            carry = c1 || c2;
        }
        carry
    }

    /// `self -= other` modulo 2^384, returning true when no borrow occurred.
    fn sub_words(&mut self, other: &[u32; WORDS]) -> bool {
        let mut borrow = false;
        for (word, &rhs) in self.words.iter_mut().zip(other.iter()) {
            let (d1, b1) = word.overflowing_sub(rhs);
            let (d2, b2) = d1.overflowing_sub(borrow as u32);
            *word = d2;
            borrow = b1 || b2;
        }
        !borrow
    }

    /// Fold a value outside the 242-trit range back in by ±3^242.
    ///
    /// Returns true if the value was changed.
    fn set_last_trit_zero(&mut self) -> bool {
        if self.is_negative() {
            if self.cmp_words(&NEG_HALF_3) == Ordering::Less {
                self.add_words(&LAST_TRIT);
                return true;
            }
        } else if self.cmp_words(&HALF_3) == Ordering::Greater {
            self.sub_words(&LAST_TRIT);
            return true;
        }
        false
    }
}

impl fmt::Debug for Bigint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bigint(0x")?;
        for word in self.words.iter().rev() {
            write!(f, "{:08x}", word)?;
        }
        write!(f, ")")
    }
}

impl From<i64> for Bigint {
    fn from(value: i64) -> Self {
        Bigint::from_i64(value)
    }
}
