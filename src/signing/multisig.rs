//! Multi-signature addresses.
//!
//! Each co-signer contributes the byte form of their key digests. The
//! coordinator absorbs them in a fixed order and finalizes the result into
//! one 81-tryte address. Signing then happens per co-signer, each filling
//! their own run of signature slots.

use tracing::debug;

use crate::signing::{Signing, SigningError, KEY_FRAGMENT_TRITS};
use crate::sponge::Kerl;
use crate::ternary::{bytes_to_trytes, trits_to_trytes, Trit, HASH_BYTES};

use super::normalize::normalized_fragments;

/// An address being assembled from several co-signers' digests.
#[derive(Clone, Default)]
pub struct MultiSigningAddress {
    kerl: Kerl,
    security: usize,
    address: Option<String>,
}

impl MultiSigningAddress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb one co-signer's digests (48 bytes per key fragment).
    pub fn absorb_digests(&mut self, digests: &[u8]) -> Result<(), SigningError> {
        if self.address.is_some() {
            return Err(SigningError::AlreadyFinalized);
        }
        self.kerl.absorb_bytes(digests)?;
        self.security += digests.len() / HASH_BYTES;
        debug!(total_security = self.security, "absorbed co-signer digests");
        Ok(())
    }

    /// Squeeze the address. Further absorption is rejected afterwards.
    pub fn finalize(&mut self) -> Result<&str, SigningError> {
        if self.address.is_some() {
            return Err(SigningError::AlreadyFinalized);
        }
        let mut bytes = [0u8; HASH_BYTES];
        self.kerl.squeeze_bytes(&mut bytes)?;
        let address = self.address.insert(bytes_to_trytes(&bytes)?);
        Ok(address.as_str())
    }

    /// The finalized address, if any.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn is_finalized(&self) -> bool {
        self.address.is_some()
    }

    /// Total number of key fragments absorbed so far.
    pub fn security(&self) -> usize {
        self.security
    }

    /// Check that the given digest sets, in order, produce this address.
    pub fn validate<D: AsRef<[u8]>>(&self, digests: &[D]) -> Result<bool, SigningError> {
        let address = self.address.as_deref().ok_or(SigningError::NotFinalized)?;
        Ok(address_from_digests(digests)? == address)
    }
}

impl std::fmt::Debug for MultiSigningAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiSigningAddress")
            .field("security", &self.security)
            .field("address", &self.address)
            .finish()
    }
}

/// Address of a list of digest sets, absorbed in order.
pub fn address_from_digests<D: AsRef<[u8]>>(digests: &[D]) -> Result<String, SigningError> {
    let mut kerl = Kerl::new();
    for set in digests {
        kerl.absorb_bytes(set.as_ref())?;
    }
    let mut bytes = [0u8; HASH_BYTES];
    kerl.squeeze_bytes(&mut bytes)?;
    Ok(bytes_to_trytes(&bytes)?)
}

/// Whether a signature slot is still empty (all `9`).
pub fn is_unsigned(slot: &str) -> bool {
    slot.bytes().all(|c| c == b'9')
}

/// Sign for one co-signer into the first run of empty slots.
///
/// `slots` holds the signature fragments of every input transaction of the
/// multisig address, in bundle order. Slots already signed by earlier
/// co-signers decide which normalized fragment each new one uses, so that
/// signature `n` overall is made with fragment `n % 3`. Returns the index of
/// the first slot written.
pub fn add_signature(
    slots: &mut [String],
    bundle_hash: &str,
    key: &[Trit],
) -> Result<usize, SigningError> {
    if key.is_empty() || key.len() % KEY_FRAGMENT_TRITS != 0 {
        return Err(SigningError::KeyLength(key.len()));
    }
    let security = key.len() / KEY_FRAGMENT_TRITS;

    let signed = slots.iter().take_while(|s| !is_unsigned(s)).count();
    let available = slots.len() - signed;
    if available < security {
        return Err(SigningError::NotEnoughSlots { needed: security, available });
    }

    let normalized = normalized_fragments(bundle_hash)?;
    let mut signing = Signing::<Kerl>::new();

    for (j, fragment) in key.chunks_exact(KEY_FRAGMENT_TRITS).enumerate() {
        let signature =
            signing.signature_fragment(&normalized[(signed + j) % normalized.len()], fragment)?;
        slots[signed + j] = trits_to_trytes(&signature)?;
    }

    debug!(first_slot = signed, security, "added co-signer signature");
    Ok(signed)
}

/// Validate the signed slots of a multisig input against its address.
///
/// Collection stops at the first empty slot.
pub fn validate_signatures(
    address: &str,
    slots: &[String],
    bundle_hash: &str,
) -> Result<bool, SigningError> {
    let fragments: Vec<&str> = slots
        .iter()
        .map(String::as_str)
        .take_while(|s| !is_unsigned(s))
        .collect();
    Signing::<Kerl>::new().validate_signatures(address, &fragments, bundle_hash)
}
