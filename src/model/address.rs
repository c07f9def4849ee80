use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::checksum;
use crate::model::ModelError;
use crate::ternary::{
    trits_to_trytes, trytes_to_trits, Trit, Trytes, ADDRESS_LENGTH, ADDRESS_LENGTH_WITH_CHECKSUM,
    HASH_TRITS,
};

/// An 81-tryte address, optionally carrying a checksum.
///
/// Parsing a 90-tryte string keeps the supplied checksum as is; use
/// [`has_valid_checksum`](Self::has_valid_checksum) to check it.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address {
    body: Trytes,
    checksum: Option<Trytes>,
}

impl Address {
    pub fn new(address: &str) -> Result<Self, ModelError> {
        let trytes = Trytes::new(address)?;
        match address.len() {
            ADDRESS_LENGTH => Ok(Self { body: trytes, checksum: None }),
            ADDRESS_LENGTH_WITH_CHECKSUM => Ok(Self {
                body: Trytes::new(&address[..ADDRESS_LENGTH])?,
                checksum: Some(Trytes::new(&address[ADDRESS_LENGTH..])?),
            }),
            other => Err(ModelError::AddressLength(other)),
        }
    }

    /// Parse a 90-tryte address and reject a wrong checksum.
    pub fn new_checked(address: &str) -> Result<Self, ModelError> {
        let parsed = Self::new(address)?;
        if parsed.checksum.is_none() {
            return Err(ModelError::AddressLength(address.len()));
        }
        if !parsed.has_valid_checksum() {
            return Err(ModelError::BadChecksum);
        }
        Ok(parsed)
    }

    /// Address from 243 trits.
    pub fn from_trits(trits: &[Trit]) -> Result<Self, ModelError> {
        if trits.len() != HASH_TRITS {
            return Err(ModelError::AddressLength(trits.len() / 3));
        }
        Self::new(&trits_to_trytes(trits)?)
    }

    /// The 81-tryte body.
    pub fn as_str(&self) -> &str {
        self.body.as_str()
    }

    pub fn to_trits(&self) -> Vec<Trit> {
        // The body is validated on construction.
        trytes_to_trits(self.body.as_str()).unwrap_or_default()
    }

    /// The checksum carried by this value, if any.
    pub fn checksum(&self) -> Option<&str> {
        self.checksum.as_ref().map(Trytes::as_str)
    }

    /// Body plus freshly computed checksum.
    pub fn with_checksum(&self) -> Result<String, ModelError> {
        Ok(checksum::add(self.body.as_str())?)
    }

    /// Attach the computed checksum.
    pub fn add_checksum(&mut self) -> Result<(), ModelError> {
        let sum = checksum::check(self.body.as_str())?;
        self.checksum = Some(Trytes::new(sum)?);
        Ok(())
    }

    pub fn remove_checksum(&mut self) {
        self.checksum = None;
    }

    /// True when a checksum is present and matches the body.
    pub fn has_valid_checksum(&self) -> bool {
        match &self.checksum {
            Some(sum) => checksum::check(self.body.as_str())
                .map(|expected| expected == sum.as_str())
                .unwrap_or(false),
            None => false,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.body.as_str())?;
        if let Some(sum) = &self.checksum {
            f.write_str(sum.as_str())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::new(s)
    }
}

impl TryFrom<String> for Address {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Address::new(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str =
        "JFHYPLWCMIJDZKQS9TQQIFXVXGXITGPZGVGSSTZDESDHSQVTJABCNGVKOYNITDICSHLQXJMPPMWUSIYFB";

    #[test]
    fn test_parse_body() {
        let address = Address::new(BODY).unwrap();
        assert_eq!(address.as_str(), BODY);
        assert_eq!(address.checksum(), None);
        assert!(!address.has_valid_checksum());
        assert_eq!(address.to_trits().len(), 243);
    }

    #[test]
    fn test_checksum_roundtrip() {
        let mut address = Address::new(BODY).unwrap();
        assert_eq!(address.with_checksum().unwrap(), format!("{}ATXKRPUND", BODY));
        address.add_checksum().unwrap();
        assert_eq!(address.checksum(), Some("ATXKRPUND"));
        assert!(address.has_valid_checksum());

        let parsed = Address::new_checked(&address.to_string()).unwrap();
        assert_eq!(parsed, address);
        address.remove_checksum();
        assert_eq!(address.to_string(), BODY);
    }

    #[test]
    fn test_supplied_checksum_is_kept() {
        let wrong = format!("{}999999999", BODY);
        let address = Address::new(&wrong).unwrap();
        assert_eq!(address.checksum(), Some("999999999"));
        assert!(!address.has_valid_checksum());
        assert_eq!(Address::new_checked(&wrong), Err(ModelError::BadChecksum));
        assert_eq!(Address::new_checked(BODY), Err(ModelError::AddressLength(81)));
    }

    #[test]
    fn test_invalid_addresses() {
        assert_eq!(Address::new("ABC"), Err(ModelError::AddressLength(3)));
        assert!(matches!(Address::new(&"a".repeat(81)), Err(ModelError::Trytes(_))));
        assert_eq!(Address::from_trits(&[Trit::O; 6]), Err(ModelError::AddressLength(2)));
    }

    #[test]
    fn test_serde() {
        let address = Address::new(&format!("{}ATXKRPUND", BODY)).unwrap();
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{}ATXKRPUND\"", BODY));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
    }
}
