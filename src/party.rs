//! Party identities.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// An opaque, case-sensitive identity such as a wallet address.
///
/// The ledger trusts identities handed to it; authenticating them is the
/// caller's concern.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PartyId(String);

impl PartyId {
    pub fn new(id: impl Into<String>) -> Self {
        PartyId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PartyId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("party identity is empty".to_string());
        }
        Ok(PartyId::new(trimmed))
    }
}

impl From<&str> for PartyId {
    fn from(id: &str) -> Self {
        PartyId::new(id)
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let party = PartyId::from_str("  0xabc  ").unwrap();
        assert_eq!(party.as_str(), "0xabc");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(PartyId::from_str("   ").is_err());
    }

    #[test]
    fn test_new_keeps_identity_verbatim() {
        let party = PartyId::new(String::from(" 0xabc "));
        assert_eq!(party.as_str(), " 0xabc ");
        assert_eq!(party.to_string(), " 0xabc ");
    }

    #[test]
    fn test_identities_are_case_sensitive() {
        assert_ne!(PartyId::from("0xABC"), PartyId::from("0xabc"));
    }
}
