//! Multi-trit arithmetic on trit slices.
//!
//! Provides ripple-carry addition, increment and integer conversion
//! for little-endian balanced ternary numbers of any length.

use crate::ternary::Trit;

/// Add `rhs` into `acc` in place, returning the carry out of the top trit.
///
/// `rhs` may be shorter than `acc`; the carry keeps rippling through the
/// remaining trits of `acc`. Trits of `rhs` beyond `acc.len()` are ignored.
pub fn add_assign(acc: &mut [Trit], rhs: &[Trit]) -> Trit {
    let mut carry = Trit::O;

    for (i, slot) in acc.iter_mut().enumerate() {
        let addend = rhs.get(i).copied().unwrap_or(Trit::O);
        if addend.is_zero() && carry.is_zero() && i >= rhs.len() {
            break;
        }
        let (sum, new_carry) = slot.full_add(addend, carry);
        *slot = sum;
        carry = new_carry;
    }

    carry
}

/// Add a machine integer into `acc` in place, returning the final carry.
pub fn add_int(acc: &mut [Trit], value: impl Into<i128>) -> Trit {
    add_assign(acc, &int_to_trits(value))
}

/// Add one to `acc`, returning the carry out of the top trit.
#[inline]
pub fn increment(acc: &mut [Trit]) -> Trit {
    add_assign(acc, &[Trit::P])
}

/// Negate every trit in place.
pub fn negate(acc: &mut [Trit]) {
    for trit in acc.iter_mut() {
        *trit = trit.neg();
    }
}

/// Minimal balanced ternary form of `value` (least significant first).
///
/// Zero gives an empty vector.
pub fn int_to_trits(value: impl Into<i128>) -> Vec<Trit> {
    let value = value.into();
    let negative = value < 0;
    let mut rest = value.unsigned_abs();
    let mut trits = Vec::new();

    while rest != 0 {
        let (trit, carry) = match rest % 3 {
            0 => (Trit::O, 0),
            1 => (Trit::P, 0),
            _ => (Trit::N, 1),
        };
        trits.push(trit);
        rest = rest / 3 + carry;
    }

    if negative {
        negate(&mut trits);
    }
    trits
}

/// Write `value` into `out`, padding with zeros.
///
/// Returns `false` (leaving `out` untouched) when the value needs more trits.
pub fn write_int(value: impl Into<i128>, out: &mut [Trit]) -> bool {
    let trits = int_to_trits(value);
    if trits.len() > out.len() {
        return false;
    }
    out[..trits.len()].copy_from_slice(&trits);
    out[trits.len()..].fill(Trit::O);
    true
}

/// Value of a balanced ternary number, or `None` if it overflows `i64`.
pub fn trits_to_int(trits: &[Trit]) -> Option<i64> {
    let mut value: i128 = 0;
    for trit in trits.iter().rev() {
        value = value.checked_mul(3)?.checked_add(i128::from(trit.to_i8()))?;
    }
    i64::try_from(value).ok()
}
