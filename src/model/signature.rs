use serde::{Deserialize, Serialize};

use crate::model::{Address, ModelError, SecurityLevel, Seed};
use crate::signing::{self, KEY_FRAGMENT_TRYTES};
use crate::ternary::Trytes;

/// The signature fragments of one input, 2187 trytes each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    fragments: Vec<Trytes>,
}

impl Signature {
    /// Sign `bundle_hash` with the key at `index`.
    pub fn sign(
        seed: &Seed,
        index: u64,
        security: SecurityLevel,
        bundle_hash: &str,
    ) -> Result<Self, ModelError> {
        let key = seed.key(index, security)?;
        let fragments = signing::sign_bundle(&key, bundle_hash)?
            .into_iter()
            .map(Trytes::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { fragments })
    }

    /// Wrap fragments received from elsewhere.
    pub fn from_fragments<I, S>(fragments: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fragments = fragments
            .into_iter()
            .map(|f| Trytes::with_len(f, KEY_FRAGMENT_TRYTES))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { fragments })
    }

    pub fn fragments(&self) -> &[Trytes] {
        &self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Check against an address and a bundle hash.
    pub fn validate(&self, address: &Address, bundle_hash: &str) -> Result<bool, ModelError> {
        Ok(signing::validate_signatures(address.as_str(), &self.fragments, bundle_hash)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLE: &str =
        "RHBKYBCLYZCDQDUQPPJDFYPMNXPXDULWVEXOUDQFNTLHZRDHHAAYJLZOTUSBMTPIRATMJRCUWFOTUWGDA";

    #[test]
    fn test_sign_and_validate() {
        let seed = Seed::new("HELLOWORLD").unwrap();
        let address = seed.new_address(4, SecurityLevel::Low).unwrap();
        let signature = Signature::sign(&seed, 4, SecurityLevel::Low, BUNDLE).unwrap();
        assert_eq!(signature.len(), 1);
        assert!(signature.validate(&address, BUNDLE).unwrap());

        let other = seed.new_address(5, SecurityLevel::Low).unwrap();
        assert!(!signature.validate(&other, BUNDLE).unwrap());
    }

    #[test]
    fn test_from_fragments() {
        let seed = Seed::new("HELLOWORLD").unwrap();
        let signature = Signature::sign(&seed, 0, SecurityLevel::Medium, BUNDLE).unwrap();
        let raw: Vec<String> = signature.fragments().iter().map(|f| f.to_string()).collect();
        assert_eq!(Signature::from_fragments(raw).unwrap(), signature);
        assert!(matches!(Signature::from_fragments(["ABC"]), Err(ModelError::Trytes(_))));
    }

    #[test]
    fn test_serde() {
        let seed = Seed::new("HELLOWORLD").unwrap();
        let signature = Signature::sign(&seed, 0, SecurityLevel::Low, BUNDLE).unwrap();
        let json = serde_json::to_string(&signature).unwrap();
        let back: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, signature);
    }
}
