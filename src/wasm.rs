//! WebAssembly bindings.
//!
//! JavaScript-friendly wrappers around seeds, signing and checksums.
//! Signature fragments cross the boundary as arrays of tryte strings.

use wasm_bindgen::prelude::*;

use crate::checksum;
use crate::signing;
use crate::sponge::{Sponge, SpongeKind};
use crate::ternary::{trits_to_trytes, trytes_to_trits};
use crate::{SecurityLevel, Seed, Signature};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn js_err(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

/// A seed held on the Rust side, with a fixed security level.
#[wasm_bindgen]
pub struct WasmSigner {
    seed: Seed,
    security: SecurityLevel,
}

#[wasm_bindgen]
impl WasmSigner {
    /// Create a signer from seed trytes and a security level (1-3).
    #[wasm_bindgen(constructor)]
    pub fn new(seed: &str, security: u8) -> Result<WasmSigner, JsError> {
        Ok(Self {
            seed: Seed::new(seed).map_err(js_err)?,
            security: SecurityLevel::try_from(security).map_err(js_err)?,
        })
    }

    /// Create a signer with a fresh random seed.
    #[wasm_bindgen]
    pub fn random(security: u8) -> Result<WasmSigner, JsError> {
        Ok(Self {
            seed: Seed::random(),
            security: SecurityLevel::try_from(security).map_err(js_err)?,
        })
    }

    /// The seed trytes.
    #[wasm_bindgen]
    pub fn seed(&self) -> String {
        self.seed.as_str().to_string()
    }

    #[wasm_bindgen]
    pub fn security(&self) -> u8 {
        self.security.as_u8()
    }

    /// Address for `index`, with checksum (90 trytes).
    #[wasm_bindgen]
    pub fn address(&self, index: u32) -> Result<String, JsError> {
        let address = self.seed.new_address(u64::from(index), self.security).map_err(js_err)?;
        address.with_checksum().map_err(js_err)
    }

    /// Sign a bundle hash with key `index`. Returns the fragments.
    #[wasm_bindgen]
    pub fn sign(&self, index: u32, bundle_hash: &str) -> Result<js_sys::Array, JsError> {
        let signature = Signature::sign(&self.seed, u64::from(index), self.security, bundle_hash)
            .map_err(js_err)?;
        Ok(signature
            .fragments()
            .iter()
            .map(|f| JsValue::from_str(f.as_str()))
            .collect())
    }

    /// Key digests as bytes, for multisig coordination.
    #[wasm_bindgen]
    pub fn digests(&self, index: u32) -> Result<Vec<u8>, JsError> {
        let key = self.seed.key(u64::from(index), self.security).map_err(js_err)?;
        signing::Signing::<crate::Kerl>::new().digests_bytes(&key).map_err(js_err)
    }
}

/// Check signature fragments against an address (81 or 90 trytes).
#[wasm_bindgen]
pub fn wasm_validate_signatures(
    address: &str,
    fragments: js_sys::Array,
    bundle_hash: &str,
) -> Result<bool, JsError> {
    let fragments: Vec<String> = fragments
        .iter()
        .map(|v| v.as_string().ok_or_else(|| JsError::new("signature fragments must be strings")))
        .collect::<Result<_, _>>()?;
    signing::validate_signatures(address, &fragments, bundle_hash).map_err(js_err)
}

/// Append the checksum to an 81-tryte address.
#[wasm_bindgen]
pub fn wasm_add_checksum(address: &str) -> Result<String, JsError> {
    checksum::add(address).map_err(js_err)
}

/// Whether a 90-tryte address carries a valid checksum.
#[wasm_bindgen]
pub fn wasm_is_valid_checksum(address: &str) -> bool {
    checksum::is_valid(address)
}

/// Hash trytes (a multiple of 81) with `kerl`, `curl-p27` or `curl-p81`.
#[wasm_bindgen]
pub fn wasm_hash(trytes: &str, sponge: &str) -> Result<String, JsError> {
    let kind: SpongeKind = sponge.parse().map_err(js_err)?;
    let mut sponge = kind.sponge();
    sponge.absorb(&trytes_to_trits(trytes).map_err(js_err)?).map_err(js_err)?;
    let hash = sponge.squeeze_hash().map_err(js_err)?;
    trits_to_trytes(&hash).map_err(js_err)
}

/// Combine co-signer digest byte sets, in order, into a multisig address.
#[wasm_bindgen]
pub fn wasm_multisig_address(digests: js_sys::Array) -> Result<String, JsError> {
    let sets: Vec<Vec<u8>> = digests
        .iter()
        .map(|v| js_sys::Uint8Array::new(&v).to_vec())
        .collect();
    let address = signing::multisig::address_from_digests(&sets).map_err(js_err)?;
    checksum::add(&address).map_err(js_err)
}
