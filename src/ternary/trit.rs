//! Single balanced ternary digit (trit).
//!
//! A trit holds one of three values: -1, 0, or +1. It is stored as a
//! signed byte so that slices of trits can be fed straight into the
//! sponge truth tables and the bigint bridge without translation.

use std::fmt;
use serde::{Serialize, Deserialize};

/// A single balanced ternary digit.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
#[repr(i8)]
pub enum Trit {
    /// Negative (-1)
    N = -1,
    /// Zero (0)
    O = 0,
    /// Positive (+1)
    P = 1,
}

impl Trit {
    /// All possible trit values in order: N, O, P
    pub const ALL: [Trit; 3] = [Trit::N, Trit::O, Trit::P];

    /// Create a trit from an integer value, or `None` outside {-1, 0, 1}.
    #[inline]
    pub const fn try_from_i8(value: i8) -> Option<Self> {
        match value {
            -1 => Some(Trit::N),
            0 => Some(Trit::O),
            1 => Some(Trit::P),
            _ => None,
        }
    }

    /// Create a trit from an integer value.
    ///
    /// # Panics
    /// Panics if value is not in {-1, 0, 1}.
    #[inline]
    pub fn from_i8(value: i8) -> Self {
        match Self::try_from_i8(value) {
            Some(trit) => trit,
            None => panic!("Invalid trit value: {} (must be -1, 0, or 1)", value),
        }
    }

    /// Convert to integer value.
    #[inline]
    pub const fn to_i8(self) -> i8 {
        self as i8
    }

    /// Negate the trit (flip N ↔ P, O stays O).
    #[inline]
    pub const fn neg(self) -> Self {
        match self {
            Trit::N => Trit::P,
            Trit::O => Trit::O,
            Trit::P => Trit::N,
        }
    }

    /// Half-adder sum: (a + b) mod 3, normalized to {-1, 0, 1}.
    #[inline]
    pub const fn sum(self, other: Self) -> Self {
        match self.to_i8() + other.to_i8() {
            -2 => Trit::P,
            -1 => Trit::N,
            0 => Trit::O,
            1 => Trit::P,
            _ => Trit::N,
        }
    }

    /// Half-adder carry: carry output when adding two trits.
    #[inline]
    pub const fn carry(self, other: Self) -> Self {
        match self.to_i8() + other.to_i8() {
            -2 => Trit::N,
            2 => Trit::P,
            _ => Trit::O,
        }
    }

    /// Full adder: adds three trits (a, b, c_in), returns (sum, carry_out).
    #[inline]
    pub const fn full_add(self, other: Self, carry_in: Self) -> (Self, Self) {
        // a + b + c lies in -3..=3, so it splits into one sum and one carry trit.
        match self.to_i8() + other.to_i8() + carry_in.to_i8() {
            -3 => (Trit::O, Trit::N),
            -2 => (Trit::P, Trit::N),
            -1 => (Trit::N, Trit::O),
            0 => (Trit::O, Trit::O),
            1 => (Trit::P, Trit::O),
            2 => (Trit::N, Trit::P),
            _ => (Trit::O, Trit::P),
        }
    }

    /// Returns true if this trit is zero.
    #[inline]
    pub const fn is_zero(self) -> bool {
        matches!(self, Trit::O)
    }
}

impl Default for Trit {
    fn default() -> Self {
        Trit::O
    }
}

impl fmt::Debug for Trit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trit::N => write!(f, "N"),
            Trit::O => write!(f, "O"),
            Trit::P => write!(f, "P"),
        }
    }
}

impl fmt::Display for Trit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trit::N => write!(f, "-"),
            Trit::O => write!(f, "0"),
            Trit::P => write!(f, "+"),
        }
    }
}

impl std::ops::Neg for Trit {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Trit::neg(self)
    }
}

/// Error returned when an integer is not a valid trit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid trit value {0} (must be -1, 0, or 1)")]
pub struct InvalidTrit(pub i8);

impl TryFrom<i8> for Trit {
    type Error = InvalidTrit;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        Trit::try_from_i8(value).ok_or(InvalidTrit(value))
    }
}

impl From<Trit> for i8 {
    fn from(trit: Trit) -> Self {
        trit.to_i8()
    }
}
