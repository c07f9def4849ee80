use std::fmt;
use std::str::FromStr;

use rand::rngs::OsRng;
use rand::Rng;

use crate::model::{Address, ModelError, SecurityLevel};
use crate::signing::Signing;
use crate::sponge::{Kerl, SpongeKind};
use crate::ternary::{Trit, Trytes, HASH_TRYTES, TRYTE_ALPHABET};

/// Length of a normalized seed in trytes.
pub const SEED_LENGTH: usize = HASH_TRYTES;

/// A private seed.
///
/// Shorter input is right-padded with `9`. The Debug form does not print
/// the seed.
#[derive(Clone, PartialEq, Eq)]
pub struct Seed(Trytes);

impl Seed {
    pub fn new(seed: &str) -> Result<Self, ModelError> {
        if seed.is_empty() || seed.len() > SEED_LENGTH {
            return Err(ModelError::SeedLength(seed.len()));
        }
        let mut padded = Trytes::new(seed)?.into_string();
        padded.extend(std::iter::repeat('9').take(SEED_LENGTH - seed.len()));
        Ok(Seed(Trytes::new(padded)?))
    }

    /// A fresh seed from the operating system RNG.
    pub fn random() -> Self {
        Self::random_with(&mut OsRng)
    }

    pub fn random_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let alphabet = TRYTE_ALPHABET.as_bytes();
        let seed: String = (0..SEED_LENGTH)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
            .collect();
        // Every character comes from the alphabet.
        Seed(Trytes::new(seed).unwrap_or_default())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn to_trits(&self) -> Vec<Trit> {
        self.0.to_trits()
    }

    /// Private key for `index` (Kerl).
    pub fn key(&self, index: u64, security: SecurityLevel) -> Result<Vec<Trit>, ModelError> {
        Ok(Signing::<Kerl>::new().key(&self.to_trits(), index, security)?)
    }

    /// Address for `index`, without checksum.
    pub fn new_address(&self, index: u64, security: SecurityLevel) -> Result<Address, ModelError> {
        self.new_address_with(index, security, SpongeKind::Kerl)
    }

    /// Address for `index` using the given sponge.
    pub fn new_address_with(
        &self,
        index: u64,
        security: SecurityLevel,
        kind: SpongeKind,
    ) -> Result<Address, ModelError> {
        let mut signing = Signing::with_sponge(kind.sponge());
        let key = signing.key(&self.to_trits(), index, security)?;
        let body = signing.address_trytes(&key)?;
        Address::new(&body)
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(..)")
    }
}

impl FromStr for Seed {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Seed::new(s)
    }
}

impl TryFrom<&str> for Seed {
    type Error = ModelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Seed::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ternary::trytes_to_trits;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_padding() {
        let seed = Seed::new("HELLOWORLD").unwrap();
        assert_eq!(seed.as_str().len(), 81);
        assert!(seed.as_str().starts_with("HELLOWORLD9"));
        assert!(seed.as_str()[10..].bytes().all(|c| c == b'9'));
    }

    #[test]
    fn test_padding_does_not_change_addresses() {
        let padded = Seed::new("HELLOWORLD").unwrap();
        let raw = trytes_to_trits("HELLOWORLD").unwrap();
        let key = Signing::<Kerl>::new().key(&raw, 0, SecurityLevel::Low).unwrap();
        assert_eq!(padded.key(0, SecurityLevel::Low).unwrap(), key);
        assert_eq!(
            padded.new_address(0, SecurityLevel::Low).unwrap().as_str(),
            "WKPIFZFMGXIXUBZOOUKXRENHK9IZYYQJFSUB9QJSKJOKTHVMRX9OSRYWKIJJCHZCGHUXDGWXYVNMMEYDC"
        );
    }

    #[test]
    fn test_invalid_seeds() {
        assert_eq!(Seed::new(""), Err(ModelError::SeedLength(0)));
        assert_eq!(Seed::new(&"A".repeat(82)), Err(ModelError::SeedLength(82)));
        assert!(matches!(Seed::new("abc"), Err(ModelError::Trytes(_))));
        assert!("ABC".parse::<Seed>().is_ok());
    }

    #[test]
    fn test_random_seed() {
        let a = Seed::random();
        let b = Seed::random();
        assert_eq!(a.as_str().len(), 81);
        assert_ne!(a, b);

        let mut rng = StdRng::seed_from_u64(7);
        let c = Seed::random_with(&mut rng);
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(Seed::random_with(&mut rng), c);
    }

    #[test]
    fn test_debug_hides_seed() {
        let seed = Seed::new("SECRET").unwrap();
        assert_eq!(format!("{:?}", seed), "Seed(..)");
    }
}
