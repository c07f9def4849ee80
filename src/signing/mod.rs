//! Winternitz one-time signatures over ternary sponges.
//!
//! - [`Signing::key`] derives a private key from a seed and an index
//! - [`Signing::digests`] and [`Signing::address`] derive the public address
//! - [`Signing::signature_fragment`] signs one normalized bundle fragment
//! - [`Signing::digest`] and [`Signing::validate_signatures`] verify
//!
//! A key fragment is 27 blocks of 243 trits. Signing hashes block `i`
//! `13 - d[i]` times and verification hashes the result `13 + d[i]` more
//! times, which lands on the same 26-fold hash the address was built from.

pub mod generate;
pub mod multisig;
pub mod normalize;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::sponge::{Kerl, Sponge, SpongeError};
use crate::ternary::{
    arith, bytes_to_trits, trits_to_bytes, trits_to_trytes, trytes_to_trits, Trit, TrytesError,
    ADDRESS_LENGTH, FRAGMENT_LENGTH, HASH_TRITS,
};

pub use generate::generate_addresses;
pub use multisig::MultiSigningAddress;
pub use normalize::{fragments, is_secure, normalized_bundle, normalized_fragments};

/// Trits in one key or signature fragment (27 blocks of 243).
pub const KEY_FRAGMENT_TRITS: usize = FRAGMENT_LENGTH * HASH_TRITS;

/// Trytes in one key or signature fragment.
pub const KEY_FRAGMENT_TRYTES: usize = KEY_FRAGMENT_TRITS / 3;

/// Hash applications between a key block and its public digest block.
pub const CHAIN_LENGTH: usize = 26;

/// Errors raised by signing operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigningError {
    #[error(transparent)]
    Trytes(#[from] TrytesError),

    #[error(transparent)]
    Sponge(#[from] SpongeError),

    #[error("invalid security level {0} (must be 1, 2 or 3)")]
    InvalidSecurity(u8),

    #[error("seed is empty")]
    EmptySeed,

    #[error("key length {0} is not a positive multiple of 6561 trits")]
    KeyLength(usize),

    #[error("fragment length {0} must be 6561 trits")]
    FragmentLength(usize),

    #[error("digests length {0} is not a positive multiple of 243 trits")]
    DigestsLength(usize),

    #[error("normalized fragment has {0} digits, expected 27")]
    NormalizedLength(usize),

    #[error("normalized digit {0} is outside [-13, 13]")]
    NormalizedDigit(i8),

    #[error("bundle hash must be 81 trytes, got {0}")]
    BundleHashLength(usize),

    #[error("address must be 81 or 90 trytes, got {0}")]
    AddressLength(usize),

    #[error("no signature fragments supplied")]
    NoSignatures,

    #[error("multisig address is already finalized")]
    AlreadyFinalized,

    #[error("multisig address is not finalized yet")]
    NotFinalized,

    #[error("address index range starting at {start} overflows")]
    IndexOverflow { start: u64 },

    #[error("need {needed} signature slots, only {available} left")]
    NotEnoughSlots { needed: usize, available: usize },
}

/// Number of key fragments per address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum SecurityLevel {
    Low = 1,
    #[default]
    Medium = 2,
    High = 3,
}

impl SecurityLevel {
    pub const ALL: [SecurityLevel; 3] = [SecurityLevel::Low, SecurityLevel::Medium, SecurityLevel::High];

    /// Number of key fragments.
    #[inline]
    pub const fn fragments(self) -> usize {
        self as usize
    }

    /// Key length in trits.
    #[inline]
    pub const fn key_trits(self) -> usize {
        self.fragments() * KEY_FRAGMENT_TRITS
    }

    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for SecurityLevel {
    type Error = SigningError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SecurityLevel::Low),
            2 => Ok(SecurityLevel::Medium),
            3 => Ok(SecurityLevel::High),
            other => Err(SigningError::InvalidSecurity(other)),
        }
    }
}

impl From<SecurityLevel> for u8 {
    fn from(level: SecurityLevel) -> Self {
        level.as_u8()
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

fn check_normalized(normalized: &[i8]) -> Result<(), SigningError> {
    if normalized.len() != FRAGMENT_LENGTH {
        return Err(SigningError::NormalizedLength(normalized.len()));
    }
    match normalized.iter().find(|d| !(-13..=13).contains(*d)) {
        Some(&digit) => Err(SigningError::NormalizedDigit(digit)),
        None => Ok(()),
    }
}

fn check_fragment(fragment: &[Trit]) -> Result<(), SigningError> {
    if fragment.len() != KEY_FRAGMENT_TRITS {
        return Err(SigningError::FragmentLength(fragment.len()));
    }
    Ok(())
}

/// Signing operations driven by one sponge.
///
/// The sponge is reset before every hash, so one instance can be reused
/// for any number of calls. It must not be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct Signing<S = Kerl> {
    sponge: S,
}

impl<S: Sponge + Default> Signing<S> {
    pub fn new() -> Self {
        Self { sponge: S::default() }
    }
}

impl<S: Sponge> Signing<S> {
    pub fn with_sponge(sponge: S) -> Self {
        Self { sponge }
    }

    pub fn into_sponge(self) -> S {
        self.sponge
    }

    /// Hash one 243-trit block in place `times` times.
    fn hash_block(&mut self, block: &mut [Trit], times: usize) -> Result<(), SigningError> {
        for _ in 0..times {
            self.sponge.reset();
            self.sponge.absorb(block)?;
            self.sponge.squeeze(block)?;
        }
        Ok(())
    }

    /// Absorb `trits` into a fresh sponge and squeeze one hash.
    fn hash(&mut self, trits: &[Trit]) -> Result<Vec<Trit>, SigningError> {
        self.sponge.reset();
        self.sponge.absorb(trits)?;
        let mut out = vec![Trit::O; HASH_TRITS];
        self.sponge.squeeze(&mut out)?;
        Ok(out)
    }

    /// Derive the private key for `index`.
    ///
    /// The seed is zero-padded to a multiple of 243 trits and `index` is
    /// added to its first 243 trits. The result is `security` fragments of
    /// 6561 trits each.
    pub fn key(
        &mut self,
        seed: &[Trit],
        index: u64,
        security: SecurityLevel,
    ) -> Result<Vec<Trit>, SigningError> {
        if seed.is_empty() {
            return Err(SigningError::EmptySeed);
        }

        let padded_len = seed.len().div_ceil(HASH_TRITS) * HASH_TRITS;
        let mut subseed = seed.to_vec();
        subseed.resize(padded_len, Trit::O);
        // Overflow past the first hash wraps around.
        arith::add_int(&mut subseed[..HASH_TRITS], index);

        let subseed = self.hash(&subseed)?;
        self.sponge.reset();
        self.sponge.absorb(&subseed)?;

        let mut key = vec![Trit::O; security.key_trits()];
        for chunk in key.chunks_exact_mut(HASH_TRITS) {
            self.sponge.squeeze(chunk)?;
        }

        debug!(index, security = security.as_u8(), "derived key");
        Ok(key)
    }

    /// Public digest of one 6561-trit key fragment.
    pub fn key_digest(&mut self, fragment: &[Trit]) -> Result<Vec<Trit>, SigningError> {
        check_fragment(fragment)?;

        let mut blocks = fragment.to_vec();
        for block in blocks.chunks_exact_mut(HASH_TRITS) {
            self.hash_block(block, CHAIN_LENGTH)?;
        }
        self.hash(&blocks)
    }

    /// One 243-trit digest per key fragment, concatenated.
    pub fn digests(&mut self, key: &[Trit]) -> Result<Vec<Trit>, SigningError> {
        if key.is_empty() || key.len() % KEY_FRAGMENT_TRITS != 0 {
            return Err(SigningError::KeyLength(key.len()));
        }

        let mut digests = Vec::with_capacity(key.len() / KEY_FRAGMENT_TRITS * HASH_TRITS);
        for fragment in key.chunks_exact(KEY_FRAGMENT_TRITS) {
            digests.extend(self.key_digest(fragment)?);
        }

        debug!(fragments = key.len() / KEY_FRAGMENT_TRITS, "computed key digests");
        Ok(digests)
    }

    /// Digests encoded as 48 bytes each, the form exchanged between co-signers.
    pub fn digests_bytes(&mut self, key: &[Trit]) -> Result<Vec<u8>, SigningError> {
        let digests = self.digests(key)?;
        Ok(trits_to_bytes(&digests)?)
    }

    /// Address of a digest set.
    pub fn address(&mut self, digests: &[Trit]) -> Result<Vec<Trit>, SigningError> {
        if digests.is_empty() || digests.len() % HASH_TRITS != 0 {
            return Err(SigningError::DigestsLength(digests.len()));
        }
        self.hash(digests)
    }

    /// Address of a key, as 81 trytes without checksum.
    pub fn address_trytes(&mut self, key: &[Trit]) -> Result<String, SigningError> {
        let digests = self.digests(key)?;
        let address = self.address(&digests)?;
        Ok(trits_to_trytes(&address)?)
    }

    /// Sign one normalized fragment with one key fragment.
    pub fn signature_fragment(
        &mut self,
        normalized: &[i8],
        key_fragment: &[Trit],
    ) -> Result<Vec<Trit>, SigningError> {
        check_normalized(normalized)?;
        check_fragment(key_fragment)?;

        let mut signature = key_fragment.to_vec();
        for (block, &digit) in signature.chunks_exact_mut(HASH_TRITS).zip(normalized) {
            self.hash_block(block, signing_rounds(digit))?;
        }
        Ok(signature)
    }

    /// Recover the fragment digest from a signature fragment.
    pub fn digest(
        &mut self,
        normalized: &[i8],
        signature_fragment: &[Trit],
    ) -> Result<Vec<Trit>, SigningError> {
        check_normalized(normalized)?;
        check_fragment(signature_fragment)?;

        let mut blocks = signature_fragment.to_vec();
        for (block, &digit) in blocks.chunks_exact_mut(HASH_TRITS).zip(normalized) {
            self.hash_block(block, verification_rounds(digit))?;
        }
        self.hash(&blocks)
    }

    /// Check signature fragments against an address and a bundle hash.
    ///
    /// Fragment `i` is verified with normalized fragment `i % 3`. The address
    /// may carry a checksum, which is ignored. A mismatch is `Ok(false)`.
    pub fn validate_signatures<T: AsRef<str>>(
        &mut self,
        expected_address: &str,
        signature_fragments: &[T],
        bundle_hash: &str,
    ) -> Result<bool, SigningError> {
        let body = address_body(expected_address)?;
        if signature_fragments.is_empty() {
            return Err(SigningError::NoSignatures);
        }
        let normalized = normalized_fragments(bundle_hash)?;

        let mut digests = Vec::with_capacity(signature_fragments.len() * HASH_TRITS);
        for (i, fragment) in signature_fragments.iter().enumerate() {
            let trits = trytes_to_trits(fragment.as_ref())?;
            let digest = self.digest(&normalized[i % normalized.len()], &trits)?;
            digests.extend(digest);
        }

        let address = trits_to_trytes(&self.address(&digests)?)?;
        let valid = address == body;
        debug!(fragments = signature_fragments.len(), valid, "validated signatures");
        Ok(valid)
    }
}

/// Hash count applied by the signer to a block with normalized digit `digit`.
#[inline]
pub fn signing_rounds(digit: i8) -> usize {
    (13 - i32::from(digit)) as usize
}

/// Hash count applied by the verifier to a block with normalized digit `digit`.
#[inline]
pub fn verification_rounds(digit: i8) -> usize {
    (13 + i32::from(digit)) as usize
}

/// The 81-tryte body of an address with or without checksum.
pub(crate) fn address_body(address: &str) -> Result<&str, SigningError> {
    if !crate::ternary::is_valid_address(address) {
        if !crate::ternary::is_valid_trytes(address) {
            trytes_to_trits(address)?;
        }
        return Err(SigningError::AddressLength(address.len()));
    }
    Ok(&address[..ADDRESS_LENGTH])
}

// ============================================================================
// Kerl shorthands
// ============================================================================

/// [`Signing::key`] with Kerl.
pub fn key(seed: &[Trit], index: u64, security: SecurityLevel) -> Result<Vec<Trit>, SigningError> {
    Signing::<Kerl>::new().key(seed, index, security)
}

/// [`Signing::digests`] with Kerl.
pub fn digests(key: &[Trit]) -> Result<Vec<Trit>, SigningError> {
    Signing::<Kerl>::new().digests(key)
}

/// [`Signing::address`] with Kerl.
pub fn address(digests: &[Trit]) -> Result<Vec<Trit>, SigningError> {
    Signing::<Kerl>::new().address(digests)
}

/// [`Signing::signature_fragment`] with Kerl.
pub fn signature_fragment(normalized: &[i8], key_fragment: &[Trit]) -> Result<Vec<Trit>, SigningError> {
    Signing::<Kerl>::new().signature_fragment(normalized, key_fragment)
}

/// [`Signing::digest`] with Kerl.
pub fn digest(normalized: &[i8], signature_fragment: &[Trit]) -> Result<Vec<Trit>, SigningError> {
    Signing::<Kerl>::new().digest(normalized, signature_fragment)
}

/// [`Signing::validate_signatures`] with Kerl.
pub fn validate_signatures<T: AsRef<str>>(
    expected_address: &str,
    signature_fragments: &[T],
    bundle_hash: &str,
) -> Result<bool, SigningError> {
    Signing::<Kerl>::new().validate_signatures(expected_address, signature_fragments, bundle_hash)
}

/// Sign a bundle hash with every fragment of `key`.
///
/// Returns one 2187-tryte signature fragment per key fragment.
pub fn sign_bundle(key: &[Trit], bundle_hash: &str) -> Result<Vec<String>, SigningError> {
    if key.is_empty() || key.len() % KEY_FRAGMENT_TRITS != 0 {
        return Err(SigningError::KeyLength(key.len()));
    }
    let normalized = normalized_fragments(bundle_hash)?;
    let mut signing = Signing::<Kerl>::new();

    key.chunks_exact(KEY_FRAGMENT_TRITS)
        .enumerate()
        .map(|(i, fragment)| -> Result<String, SigningError> {
            let signature = signing.signature_fragment(&normalized[i % normalized.len()], fragment)?;
            Ok(trits_to_trytes(&signature)?)
        })
        .collect()
}

/// Decode digest bytes back into trits.
pub fn digests_from_bytes(bytes: &[u8]) -> Result<Vec<Trit>, SigningError> {
    Ok(bytes_to_trits(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sponge::{Curl, SpongeKind};

    const SEED: &str =
        "ABCDEFGHIJKLMNOPQRSTUVWXYZABCDEFGHIJKLMNOPQRSTUVWXYZABCDEFGHIJKLMNOPQRSTUVWXYZABC";
    const BUNDLE: &str =
        "RHBKYBCLYZCDQDUQPPJDFYPMNXPXDULWVEXOUDQFNTLHZRDHHAAYJLZOTUSBMTPIRATMJRCUWFOTUWGDA";

    fn seed() -> Vec<Trit> {
        trytes_to_trits(SEED).unwrap()
    }

    #[test]
    fn test_key_lengths() {
        for level in SecurityLevel::ALL {
            let key = key(&seed(), 0, level).unwrap();
            assert_eq!(key.len(), level.fragments() * 6561);
        }
    }

    #[test]
    fn test_key_prefix_vector() {
        let key = key(&seed(), 0, SecurityLevel::Medium).unwrap();
        let trytes = trits_to_trytes(&key).unwrap();
        assert_eq!(trytes.len(), 4374);
        assert_eq!(
            &trytes[..81],
            "OEKAWVDFDHFPROQZSPJK9WSCXS9ZZF9SIWVXAOSCQPMCKEEQFHUXMYSG9CPRJVCGIRNBQFJSHPNETLNNX"
        );
    }

    #[test]
    fn test_lower_security_is_prefix() {
        let low = key(&seed(), 0, SecurityLevel::Low).unwrap();
        let high = key(&seed(), 0, SecurityLevel::High).unwrap();
        assert_eq!(&high[..low.len()], low.as_slice());
    }

    #[test]
    fn test_index_changes_key() {
        let a = key(&seed(), 0, SecurityLevel::Low).unwrap();
        let b = key(&seed(), 1, SecurityLevel::Low).unwrap();
        assert_ne!(a, b);
    }

    /// Add one to little-endian balanced trits, on plain integers.
    fn step(trits: &mut [Trit]) {
        for trit in trits.iter_mut() {
            let value = trit.to_i8() + 1;
            if value <= 1 {
                *trit = Trit::from_i8(value);
                return;
            }
            *trit = Trit::N;
        }
    }

    #[test]
    fn test_index_add_matches_repeated_increment() {
        let mut signing = Signing::<Kerl>::new();
        // Leading E (-1, -1, +1) makes the index add hit cancelling carries.
        let seed = trytes_to_trits(&format!("E{}", &SEED[1..])).unwrap();
        let mut stepped = seed.clone();
        for index in 0..=10u64 {
            assert_eq!(
                signing.key(&seed, index, SecurityLevel::Low).unwrap(),
                signing.key(&stepped, 0, SecurityLevel::Low).unwrap(),
                "index {}",
                index
            );
            step(&mut stepped);
        }
    }

    #[test]
    fn test_empty_seed() {
        assert_eq!(key(&[], 0, SecurityLevel::Low), Err(SigningError::EmptySeed));
    }

    #[test]
    fn test_short_seed_is_padded() {
        let short = trytes_to_trits("HELLOWORLD").unwrap();
        let mut padded = short.clone();
        padded.resize(HASH_TRITS, Trit::O);
        assert_eq!(
            key(&short, 0, SecurityLevel::Low).unwrap(),
            key(&padded, 0, SecurityLevel::Low).unwrap()
        );
    }

    #[test]
    fn test_rounds_sum_to_chain_length() {
        for digit in -13..=13 {
            assert_eq!(signing_rounds(digit) + verification_rounds(digit), CHAIN_LENGTH);
        }
        assert_eq!(signing_rounds(13), 0);
        assert_eq!(signing_rounds(-13), 26);
    }

    #[test]
    fn test_signature_digest_matches_key_digest() {
        let key = key(&seed(), 0, SecurityLevel::Low).unwrap();
        let normalized = normalized_fragments(BUNDLE).unwrap();
        let signature = signature_fragment(&normalized[0], &key).unwrap();
        assert_eq!(
            &trits_to_trytes(&signature).unwrap()[..81],
            "YMZXXUDWLJDTLDRZDBKAWJIXAOQXUYFJQIXKTZBYTTTHJMTOVBYXRFJUXQDU9XWWAZVEFPEXYZMBKZUHZ"
        );
        assert_eq!(digest(&normalized[0], &signature).unwrap(), digests(&key).unwrap());
    }

    #[test]
    fn test_sign_and_validate() {
        let key = key(&seed(), 0, SecurityLevel::Medium).unwrap();
        let address = trits_to_trytes(&address(&digests(&key).unwrap()).unwrap()).unwrap();
        let signatures = sign_bundle(&key, BUNDLE).unwrap();
        assert_eq!(signatures.len(), 2);
        assert!(signatures.iter().all(|s| s.len() == KEY_FRAGMENT_TRYTES));
        assert!(validate_signatures(&address, &signatures, BUNDLE).unwrap());

        let other_bundle = "9".repeat(81);
        assert!(!validate_signatures(&address, &signatures, &other_bundle).unwrap());
    }

    #[test]
    fn test_validate_with_checksum_address() {
        let key = key(&seed(), 0, SecurityLevel::Low).unwrap();
        let address = trits_to_trytes(&address(&digests(&key).unwrap()).unwrap()).unwrap();
        let with_checksum = crate::checksum::add(&address).unwrap();
        let signatures = sign_bundle(&key, BUNDLE).unwrap();
        assert!(validate_signatures(&with_checksum, &signatures, BUNDLE).unwrap());
    }

    #[test]
    fn test_validate_errors() {
        let none: [&str; 0] = [];
        let address = "9".repeat(81);
        assert_eq!(validate_signatures(&address, &none, BUNDLE), Err(SigningError::NoSignatures));
        assert_eq!(
            validate_signatures("ABC", &["9"], BUNDLE),
            Err(SigningError::AddressLength(3))
        );
        assert!(matches!(
            validate_signatures(&address, &["9".repeat(10)], BUNDLE),
            Err(SigningError::FragmentLength(30))
        ));
    }

    #[test]
    fn test_length_errors() {
        let mut signing = Signing::<Kerl>::new();
        assert_eq!(signing.digests(&[Trit::O; 100]), Err(SigningError::KeyLength(100)));
        assert_eq!(signing.address(&[]), Err(SigningError::DigestsLength(0)));
        assert_eq!(
            signing.signature_fragment(&[0; 26], &[Trit::O; KEY_FRAGMENT_TRITS]),
            Err(SigningError::NormalizedLength(26))
        );
        assert_eq!(
            signing.signature_fragment(&[14; 27], &[Trit::O; KEY_FRAGMENT_TRITS]),
            Err(SigningError::NormalizedDigit(14))
        );
        assert_eq!(
            signing.digest(&[0; 27], &[Trit::O; 243]),
            Err(SigningError::FragmentLength(243))
        );
    }

    #[test]
    fn test_digests_bytes_roundtrip() {
        let key = key(&seed(), 0, SecurityLevel::Low).unwrap();
        let bytes = Signing::<Kerl>::new().digests_bytes(&key).unwrap();
        assert_eq!(bytes.len(), 48);
        assert_eq!(digests_from_bytes(&bytes).unwrap(), digests(&key).unwrap());
    }

    #[test]
    fn test_curl_signing_roundtrip() {
        let mut signing = Signing::with_sponge(Curl::new());
        let key = signing.key(&seed(), 2, SecurityLevel::Low).unwrap();
        let digests = signing.digests(&key).unwrap();
        let address = trits_to_trytes(&signing.address(&digests).unwrap()).unwrap();

        let normalized = normalized_fragments(BUNDLE).unwrap();
        let signature = signing.signature_fragment(&normalized[0], &key).unwrap();
        let fragments = [trits_to_trytes(&signature).unwrap()];
        assert!(signing.validate_signatures(&address, &fragments, BUNDLE).unwrap());

        // A Kerl verifier rejects a Curl signature.
        assert!(!validate_signatures(&address, &fragments, BUNDLE).unwrap());
    }

    #[test]
    fn test_any_sponge_signing() {
        let mut signing = Signing::with_sponge(SpongeKind::Kerl.sponge());
        let key = signing.key(&seed(), 0, SecurityLevel::Low).unwrap();
        assert_eq!(signing.digests(&key).unwrap(), digests(&key).unwrap());
    }

    #[test]
    fn test_security_level_conversions() {
        assert_eq!(SecurityLevel::try_from(2).unwrap(), SecurityLevel::Medium);
        assert_eq!(SecurityLevel::try_from(0), Err(SigningError::InvalidSecurity(0)));
        assert_eq!(SecurityLevel::try_from(4), Err(SigningError::InvalidSecurity(4)));
        assert_eq!(u8::from(SecurityLevel::High), 3);
        assert_eq!(SecurityLevel::default(), SecurityLevel::Medium);
        assert_eq!(serde_json::to_string(&SecurityLevel::Low).unwrap(), "1");
        assert!(serde_json::from_str::<SecurityLevel>("5").is_err());
    }
}
