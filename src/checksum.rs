//! Address checksums.
//!
//! The checksum is the last 9 trytes of the Kerl hash of the 81-tryte
//! address body. An address with checksum is 90 trytes long.

use thiserror::Error;

use crate::sponge::{Sponge, SpongeError, SpongeKind};
use crate::ternary::{
    is_valid_trytes, trits_to_trytes, trytes_to_trits, TrytesError, ADDRESS_LENGTH,
    ADDRESS_LENGTH_WITH_CHECKSUM, CHECKSUM_LENGTH, HASH_TRYTES,
};

/// Errors raised when computing a checksum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChecksumError {
    #[error("address body must be 81 trytes, got {0}")]
    InvalidLength(usize),

    #[error(transparent)]
    Trytes(#[from] TrytesError),

    #[error(transparent)]
    Sponge(#[from] SpongeError),
}

/// Checksum of an 81-tryte address body, using Kerl.
pub fn check(address: &str) -> Result<String, ChecksumError> {
    check_with(address, SpongeKind::Kerl)
}

/// Checksum of an 81-tryte address body with the given sponge.
pub fn check_with(address: &str, kind: SpongeKind) -> Result<String, ChecksumError> {
    if address.len() != ADDRESS_LENGTH {
        // Report a bad alphabet ahead of a bad length.
        trytes_to_trits(address)?;
        return Err(ChecksumError::InvalidLength(address.len()));
    }

    let mut sponge = kind.sponge();
    sponge.absorb(&trytes_to_trits(address)?)?;
    let hash = trits_to_trytes(&sponge.squeeze_hash()?)?;
    Ok(hash[HASH_TRYTES - CHECKSUM_LENGTH..].to_string())
}

/// Append the checksum to an address body.
pub fn add(address: &str) -> Result<String, ChecksumError> {
    let checksum = check(address)?;
    Ok(format!("{}{}", address, checksum))
}

/// The address body: the first 81 trytes.
///
/// Shorter input is returned unchanged.
pub fn remove(address: &str) -> &str {
    match address.get(..ADDRESS_LENGTH) {
        Some(body) => body,
        None => address,
    }
}

/// True when `address` is 90 valid trytes and its checksum matches.
pub fn is_valid(address: &str) -> bool {
    if address.len() != ADDRESS_LENGTH_WITH_CHECKSUM || !is_valid_trytes(address) {
        return false;
    }
    match add(remove(address)) {
        Ok(expected) => expected == address,
        Err(_) => false,
    }
}
