//! Kerl: Keccak-384 as a ternary sponge.
//!
//! Every 243-trit chunk crosses the bigint bridge as 48 bytes. After each
//! squeeze the Keccak state is restarted from the complement of the digest
//! it just produced.

use sha3::{Digest, Keccak384};
use tracing::trace;

use crate::sponge::{check_byte_length, check_length, Sponge, SpongeError};
use crate::ternary::{Bigint, Trit, HASH_BYTES, HASH_TRITS};

/// The Kerl sponge.
#[derive(Clone, Default)]
pub struct Kerl {
    keccak: Keccak384,
}

impl Kerl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb raw 48-byte chunks, as produced by [`squeeze_bytes`](Self::squeeze_bytes)
    /// or [`trits_to_bytes`](crate::ternary::trits_to_bytes).
    pub fn absorb_bytes(&mut self, bytes: &[u8]) -> Result<(), SpongeError> {
        check_byte_length(bytes.len())?;
        trace!(chunks = bytes.len() / HASH_BYTES, "kerl absorb bytes");
        self.keccak.update(bytes);
        Ok(())
    }

    /// Squeeze raw 48-byte chunks.
    ///
    /// Each chunk is the big-endian two's complement form of a 243-trit hash
    /// before it is folded into the 242-trit range.
    pub fn squeeze_bytes(&mut self, out: &mut [u8]) -> Result<(), SpongeError> {
        check_byte_length(out.len())?;
        trace!(chunks = out.len() / HASH_BYTES, "kerl squeeze bytes");

        for chunk in out.chunks_exact_mut(HASH_BYTES) {
            self.squeeze_chunk(chunk);
        }
        Ok(())
    }

    fn squeeze_chunk(&mut self, out: &mut [u8]) {
        let digest = self.keccak.finalize_reset();
        out.copy_from_slice(&digest);

        let complement: Vec<u8> = digest.iter().map(|b| !b).collect();
        self.keccak.update(&complement);
    }
}

impl Sponge for Kerl {
    fn reset(&mut self) {
        Digest::reset(&mut self.keccak);
    }

    fn absorb(&mut self, trits: &[Trit]) -> Result<(), SpongeError> {
        check_length(trits.len())?;
        trace!(chunks = trits.len() / HASH_TRITS, "kerl absorb");

        for chunk in trits.chunks_exact(HASH_TRITS) {
            // from_trits ignores the last trit, which is the same as zeroing it.
            let bytes = Bigint::from_trits(chunk).to_bytes();
            self.keccak.update(bytes);
        }
        Ok(())
    }

    fn squeeze(&mut self, out: &mut [Trit]) -> Result<(), SpongeError> {
        check_length(out.len())?;
        trace!(chunks = out.len() / HASH_TRITS, "kerl squeeze");

        let mut bytes = [0u8; HASH_BYTES];
        for chunk in out.chunks_exact_mut(HASH_TRITS) {
            self.squeeze_chunk(&mut bytes);
            Bigint::from_bytes(&bytes).write_trits(chunk);
        }
        Ok(())
    }
}
