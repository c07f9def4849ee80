//! Balanced ternary data model.
//!
//! This module provides the core types for working with balanced ternary:
//! - [`Trit`] - A single balanced ternary digit (-1, 0, +1)
//! - [`Trytes`] - A validated string over the 27-symbol tryte alphabet
//! - [`Bigint`] - The 384-bit integer bridge used by the Keccak sponge
//!
//! plus conversions between trits, trytes, ASCII text and bytes.

mod trit;
pub mod arith;
pub mod bigint;
pub mod trytes;

pub use trit::{InvalidTrit, Trit};
pub use bigint::Bigint;
pub use trytes::{
    ascii_to_trytes, bytes_to_trits, bytes_to_trytes, is_trytes_of_len, is_valid_address,
    is_valid_hash, is_valid_trytes, trits_to_bytes, trits_to_trytes, trytes_to_ascii,
    trytes_to_bytes, trytes_to_trits, tryte_value, value_to_tryte, Trytes, TrytesError,
    ADDRESS_LENGTH, ADDRESS_LENGTH_WITH_CHECKSUM, CHECKSUM_LENGTH, FRAGMENT_LENGTH, HASH_BYTES, HASH_TRITS,
    HASH_TRYTES, TRITS_PER_TRYTE, TRYTE_ALPHABET,
};
pub use arith::{int_to_trits, trits_to_int};
