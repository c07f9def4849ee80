//! Bulk address generation.
//!
//! Every index gets its own sponge, so indices are independent and can be
//! derived in parallel. Output is in index order either way.

use tracing::debug;

use crate::signing::{SecurityLevel, Signing, SigningError};
use crate::sponge::SpongeKind;
use crate::ternary::Trit;

/// Address (81 trytes, no checksum) of one index.
pub fn address_for(
    seed: &[Trit],
    index: u64,
    security: SecurityLevel,
    kind: SpongeKind,
) -> Result<String, SigningError> {
    let mut signing = Signing::with_sponge(kind.sponge());
    let key = signing.key(seed, index, security)?;
    signing.address_trytes(&key)
}

/// Addresses for `start..start + count`, one sponge per index.
pub fn generate_sequential(
    seed: &[Trit],
    start: u64,
    count: usize,
    security: SecurityLevel,
    kind: SpongeKind,
) -> Result<Vec<String>, SigningError> {
    check_range(start, count)?;
    (0..count as u64)
        .map(|i| address_for(seed, start + i, security, kind))
        .collect()
}

/// Addresses for `start..start + count`, derived on the rayon pool.
#[cfg(feature = "parallel")]
pub fn generate_parallel(
    seed: &[Trit],
    start: u64,
    count: usize,
    security: SecurityLevel,
    kind: SpongeKind,
) -> Result<Vec<String>, SigningError> {
    use rayon::prelude::*;

    check_range(start, count)?;
    (0..count as u64)
        .into_par_iter()
        .map(|i| address_for(seed, start + i, security, kind))
        .collect()
}

/// Addresses for `start..start + count`.
///
/// Runs on rayon with the `parallel` feature, sequentially otherwise.
pub fn generate_addresses(
    seed: &[Trit],
    start: u64,
    count: usize,
    security: SecurityLevel,
    kind: SpongeKind,
) -> Result<Vec<String>, SigningError> {
    debug!(start, count, security = security.as_u8(), sponge = %kind, "generating addresses");

    #[cfg(feature = "parallel")]
    {
        generate_parallel(seed, start, count, security, kind)
    }
    #[cfg(not(feature = "parallel"))]
    {
        generate_sequential(seed, start, count, security, kind)
    }
}

/// The last index, `start + count - 1`, must fit in a `u64`.
fn check_range(start: u64, count: usize) -> Result<(), SigningError> {
    if count == 0 {
        return Ok(());
    }
    match start.checked_add(count as u64 - 1) {
        Some(_) => Ok(()),
        None => Err(SigningError::IndexOverflow { start }),
    }
}
