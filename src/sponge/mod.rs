//! Ternary sponge functions.
//!
//! A sponge absorbs and squeezes trits in 243-trit chunks. Two engines are
//! provided:
//! - [`Curl`] - the native ternary permutation over a 729-trit state
//! - [`Kerl`] - Keccak-384 driven through the bigint bridge
//!
//! [`SpongeKind`] and [`AnySponge`] pick an engine at runtime.

pub mod curl;
pub mod kerl;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ternary::{Trit, TrytesError, HASH_BYTES, HASH_TRITS};

pub use curl::{Curl, CurlRounds};
pub use kerl::Kerl;

/// Errors raised by sponge operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpongeError {
    #[error("illegal length {0}: must be a positive multiple of 243 trits")]
    IllegalLength(usize),

    #[error("illegal byte length {0}: must be a positive multiple of 48 bytes")]
    IllegalByteLength(usize),

    #[error("range {offset}..{offset}+{length} is out of bounds for {len} trits")]
    OutOfBounds { offset: usize, length: usize, len: usize },

    #[error("unknown sponge kind '{0}' (expected kerl, curl-p27 or curl-p81)")]
    UnknownKind(String),

    #[error(transparent)]
    Trytes(#[from] TrytesError),
}

/// Ensure `length` is a positive multiple of the hash width.
#[inline]
pub(crate) fn check_length(length: usize) -> Result<(), SpongeError> {
    if length == 0 || length % HASH_TRITS != 0 {
        return Err(SpongeError::IllegalLength(length));
    }
    Ok(())
}

/// Ensure `length` is a positive multiple of the Keccak digest size.
#[inline]
pub(crate) fn check_byte_length(length: usize) -> Result<(), SpongeError> {
    if length == 0 || length % HASH_BYTES != 0 {
        return Err(SpongeError::IllegalByteLength(length));
    }
    Ok(())
}

fn check_range(len: usize, offset: usize, length: usize) -> Result<(), SpongeError> {
    match offset.checked_add(length) {
        Some(end) if end <= len => Ok(()),
        _ => Err(SpongeError::OutOfBounds { offset, length, len }),
    }
}

/// Common interface of the ternary sponges.
pub trait Sponge {
    /// Return to the initial (all zero) state.
    fn reset(&mut self);

    /// Absorb every 243-trit chunk of `trits`.
    fn absorb(&mut self, trits: &[Trit]) -> Result<(), SpongeError>;

    /// Fill `out` with squeezed trits, one 243-trit chunk at a time.
    fn squeeze(&mut self, out: &mut [Trit]) -> Result<(), SpongeError>;

    /// Absorb `length` trits of `trits` starting at `offset`.
    fn absorb_at(&mut self, trits: &[Trit], offset: usize, length: usize) -> Result<(), SpongeError> {
        check_range(trits.len(), offset, length)?;
        self.absorb(&trits[offset..offset + length])
    }

    /// Squeeze `length` trits into `out` starting at `offset`.
    fn squeeze_at(&mut self, out: &mut [Trit], offset: usize, length: usize) -> Result<(), SpongeError> {
        check_range(out.len(), offset, length)?;
        self.squeeze(&mut out[offset..offset + length])
    }

    /// Absorb several trit slices in order.
    fn absorb_all<'a, I>(&mut self, parts: I) -> Result<(), SpongeError>
    where
        I: IntoIterator<Item = &'a [Trit]>,
        Self: Sized,
    {
        for part in parts {
            self.absorb(part)?;
        }
        Ok(())
    }

    /// Squeeze `length` trits into a new vector.
    fn squeeze_vec(&mut self, length: usize) -> Result<Vec<Trit>, SpongeError> {
        check_length(length)?;
        let mut out = vec![Trit::O; length];
        self.squeeze(&mut out)?;
        Ok(out)
    }

    /// Squeeze one 243-trit hash.
    fn squeeze_hash(&mut self) -> Result<Vec<Trit>, SpongeError> {
        self.squeeze_vec(HASH_TRITS)
    }
}

/// Selects a sponge engine at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpongeKind {
    /// Keccak-384 over the bigint bridge.
    #[default]
    Kerl,
    /// Curl with 27 rounds.
    CurlP27,
    /// Curl with 81 rounds.
    CurlP81,
}

impl SpongeKind {
    pub const ALL: [SpongeKind; 3] = [SpongeKind::Kerl, SpongeKind::CurlP27, SpongeKind::CurlP81];

    /// Create a fresh sponge of this kind.
    pub fn sponge(self) -> AnySponge {
        match self {
            SpongeKind::Kerl => AnySponge::Kerl(Kerl::new()),
            SpongeKind::CurlP27 => AnySponge::Curl(Curl::with_rounds(CurlRounds::P27)),
            SpongeKind::CurlP81 => AnySponge::Curl(Curl::with_rounds(CurlRounds::P81)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SpongeKind::Kerl => "kerl",
            SpongeKind::CurlP27 => "curl-p27",
            SpongeKind::CurlP81 => "curl-p81",
        }
    }
}

impl fmt::Display for SpongeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SpongeKind {
    type Err = SpongeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kerl" => Ok(SpongeKind::Kerl),
            "curl-p27" | "curlp27" | "curl27" => Ok(SpongeKind::CurlP27),
            "curl-p81" | "curlp81" | "curl81" | "curl" => Ok(SpongeKind::CurlP81),
            _ => Err(SpongeError::UnknownKind(s.to_string())),
        }
    }
}

/// A sponge whose engine is chosen at runtime.
#[derive(Clone)]
pub enum AnySponge {
    Kerl(Kerl),
    Curl(Curl),
}

impl AnySponge {
    pub fn kind(&self) -> SpongeKind {
        match self {
            AnySponge::Kerl(_) => SpongeKind::Kerl,
            AnySponge::Curl(curl) => match curl.rounds() {
                CurlRounds::P27 => SpongeKind::CurlP27,
                CurlRounds::P81 => SpongeKind::CurlP81,
            },
        }
    }
}

impl Default for AnySponge {
    fn default() -> Self {
        SpongeKind::default().sponge()
    }
}

impl From<SpongeKind> for AnySponge {
    fn from(kind: SpongeKind) -> Self {
        kind.sponge()
    }
}

impl Sponge for AnySponge {
    fn reset(&mut self) {
        match self {
            AnySponge::Kerl(s) => s.reset(),
            AnySponge::Curl(s) => s.reset(),
        }
    }

    fn absorb(&mut self, trits: &[Trit]) -> Result<(), SpongeError> {
        match self {
            AnySponge::Kerl(s) => s.absorb(trits),
            AnySponge::Curl(s) => s.absorb(trits),
        }
    }

    fn squeeze(&mut self, out: &mut [Trit]) -> Result<(), SpongeError> {
        match self {
            AnySponge::Kerl(s) => s.squeeze(out),
            AnySponge::Curl(s) => s.squeeze(out),
        }
    }
}

impl fmt::Debug for AnySponge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnySponge({})", self.kind())
    }
}
