//! Curl: the native ternary sponge.
//!
//! The state holds 729 trits. The first 243 are the rate; absorbing copies a
//! chunk over them and squeezing reads them out, each followed by a full
//! transform.

use tracing::trace;

use crate::sponge::{check_length, Sponge, SpongeError};
use crate::ternary::{Trit, HASH_TRITS};

/// Trits in the Curl state.
pub const STATE_LENGTH: usize = 3 * HASH_TRITS;

/// Substitution table indexed by `a + 4 * b + 5` for two state trits.
///
/// Indices 3 and 7 cannot occur (they would need `a = 2`).
const TRUTH_TABLE: [Trit; 11] = [
    Trit::P, Trit::O, Trit::N, Trit::O, Trit::P, Trit::N,
    Trit::O, Trit::O, Trit::N, Trit::P, Trit::O,
];

/// Number of rounds per transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CurlRounds {
    P27,
    #[default]
    P81,
}

impl CurlRounds {
    #[inline]
    pub const fn count(self) -> usize {
        match self {
            CurlRounds::P27 => 27,
            CurlRounds::P81 => 81,
        }
    }
}

/// Next position of the stride walk over the state.
///
/// Starting from 0, 729 steps visit every position once and return to 0.
#[inline]
const fn next_index(p: usize) -> usize {
    if p < 365 {
        p + 364
    } else {
        p - 365
    }
}

/// The Curl sponge.
#[derive(Clone)]
pub struct Curl {
    state: [Trit; STATE_LENGTH],
    rounds: CurlRounds,
}

impl Curl {
    /// Curl-P-81.
    pub fn new() -> Self {
        Self::with_rounds(CurlRounds::P81)
    }

    pub fn with_rounds(rounds: CurlRounds) -> Self {
        Self {
            state: [Trit::O; STATE_LENGTH],
            rounds,
        }
    }

    pub fn rounds(&self) -> CurlRounds {
        self.rounds
    }

    /// Full state, mainly for inspection in tests.
    pub fn state(&self) -> &[Trit; STATE_LENGTH] {
        &self.state
    }

    fn transform(&mut self) {
        let mut scratch = [Trit::O; STATE_LENGTH];
        let mut p = 0;

        for _ in 0..self.rounds.count() {
            scratch.copy_from_slice(&self.state);
            for cell in self.state.iter_mut() {
                let q = next_index(p);
                let index = scratch[p].to_i8() + (scratch[q].to_i8() << 2) + 5;
                *cell = TRUTH_TABLE[index as usize];
                p = q;
            }
        }
    }
}

impl Default for Curl {
    fn default() -> Self {
        Self::new()
    }
}

impl Sponge for Curl {
    fn reset(&mut self) {
        self.state = [Trit::O; STATE_LENGTH];
    }

    fn absorb(&mut self, trits: &[Trit]) -> Result<(), SpongeError> {
        check_length(trits.len())?;
        trace!(chunks = trits.len() / HASH_TRITS, "curl absorb");

        for chunk in trits.chunks_exact(HASH_TRITS) {
            self.state[..HASH_TRITS].copy_from_slice(chunk);
            self.transform();
        }
        Ok(())
    }

    fn squeeze(&mut self, out: &mut [Trit]) -> Result<(), SpongeError> {
        check_length(out.len())?;
        trace!(chunks = out.len() / HASH_TRITS, "curl squeeze");

        for chunk in out.chunks_exact_mut(HASH_TRITS) {
            chunk.copy_from_slice(&self.state[..HASH_TRITS]);
            self.transform();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ternary::{trits_to_trytes, trytes_to_trits};

    const INPUT: &str =
        "ABCDEFGHIJKLMNOPQRSTUVWXYZABCDEFGHIJKLMNOPQRSTUVWXYZABCDEFGHIJKLMNOPQRSTUVWXYZABC";

    fn hash(curl: &mut Curl, trytes: &str) -> String {
        curl.absorb(&trytes_to_trits(trytes).unwrap()).unwrap();
        trits_to_trytes(&curl.squeeze_hash().unwrap()).unwrap()
    }

    #[test]
    fn test_stride_visits_every_cell() {
        let mut seen = [false; STATE_LENGTH];
        let mut p = 0;
        for _ in 0..STATE_LENGTH {
            assert!(!seen[p], "position {} visited twice", p);
            seen[p] = true;
            p = next_index(p);
        }
        assert_eq!(p, 0);
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_truth_table_reachable_entries() {
        // Reachable indices are a + 4b + 5 for a, b in {-1, 0, 1}.
        let mut reachable = Vec::new();
        for a in Trit::ALL {
            for b in Trit::ALL {
                reachable.push((a.to_i8() + 4 * b.to_i8() + 5) as usize);
            }
        }
        reachable.sort_unstable();
        assert_eq!(reachable, vec![0, 1, 2, 4, 5, 6, 8, 9, 10]);
        let values: Vec<i8> = [0, 1, 2, 4, 5, 6, 8, 9, 10]
            .iter()
            .map(|&i| TRUTH_TABLE[i].to_i8())
            .collect();
        assert_eq!(values, vec![1, 0, -1, 1, -1, 0, -1, 1, 0]);
    }

    #[test]
    fn test_curl_p81_vector() {
        assert_eq!(
            hash(&mut Curl::new(), INPUT),
            "CHVGMHNSWUDXDJOXXSKMZJGKEDJOHMGMPLXAXTWMSSFJGHREVHJWSGVAURNVOONDVIGDN9PJQELSCBPDO"
        );
    }

    #[test]
    fn test_curl_p27_vector() {
        assert_eq!(
            hash(&mut Curl::with_rounds(CurlRounds::P27), INPUT),
            "HSXPYBMJQKITOJUVNXLHEUZUEKMMPLKCBHYOVXDDEXLOGM9FTETPWKIJTDSULPDKEBJJONNKOFRILMRSI"
        );
    }

    #[test]
    fn test_reset_clears_state() {
        let mut curl = Curl::new();
        let first = hash(&mut curl, INPUT);
        assert!(curl.state().iter().any(|t| !t.is_zero()));
        curl.reset();
        assert!(curl.state().iter().all(|t| t.is_zero()));
        assert_eq!(hash(&mut curl, INPUT), first);
    }

    #[test]
    fn test_consecutive_squeezes_differ() {
        let mut curl = Curl::new();
        curl.absorb(&trytes_to_trits(INPUT).unwrap()).unwrap();
        let a = curl.squeeze_hash().unwrap();
        let b = curl.squeeze_hash().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_input_sensitivity() {
        let mut trits = trytes_to_trits(INPUT).unwrap();
        let mut curl = Curl::new();
        curl.absorb(&trits).unwrap();
        let before = curl.squeeze_hash().unwrap();

        trits[100] = trits[100].neg();
        if trits[100].is_zero() {
            trits[100] = Trit::P;
        }
        curl.reset();
        curl.absorb(&trits).unwrap();
        assert_ne!(curl.squeeze_hash().unwrap(), before);
    }
}
