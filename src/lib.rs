//! # trisign
//!
//! Balanced ternary one-time signatures.
//!
//! Seeds derive Winternitz keys through a ternary sponge (Kerl over
//! Keccak-384, or the native Curl permutation). Keys hash down to 81-tryte
//! addresses, sign normalized bundle hashes, and can be combined across
//! co-signers into multisig addresses. Addresses carry a 9-tryte checksum.

pub mod ternary;
pub mod sponge;
pub mod signing;
pub mod checksum;
pub mod model;
pub mod config;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use ternary::{Trit, Trytes, TrytesError};
pub use sponge::{AnySponge, Curl, Kerl, Sponge, SpongeError, SpongeKind};
pub use signing::{MultiSigningAddress, SecurityLevel, Signing, SigningError};
pub use checksum::ChecksumError;
pub use model::{Address, ModelError, Seed, Signature};
pub use config::{Config, ConfigError};
