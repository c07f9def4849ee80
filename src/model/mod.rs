//! Value types built on the signing core.
//!
//! - [`Seed`] - a private seed, padded to 81 trytes
//! - [`Address`] - an 81-tryte address with an optional checksum
//! - [`Signature`] - the signature fragments of one input

mod address;
mod seed;
mod signature;

pub use address::Address;
pub use seed::{Seed, SEED_LENGTH};
pub use signature::Signature;

pub use crate::signing::SecurityLevel;

use thiserror::Error;

use crate::checksum::ChecksumError;
use crate::signing::SigningError;
use crate::ternary::TrytesError;

/// Errors raised while building model values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("seed must be 1 to 81 trytes, got {0}")]
    SeedLength(usize),

    #[error("address must be 81 or 90 trytes, got {0}")]
    AddressLength(usize),

    #[error("address checksum does not match")]
    BadChecksum,

    #[error(transparent)]
    Trytes(#[from] TrytesError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Checksum(#[from] ChecksumError),
}
