//! Chain identifiers and the chain → contract mapping.
//!
//! Callers name chains with CAIP-2 strings such as `eip155:2741`. The
//! resolver never trusts them: [`ContractRegistry::contract_for`] parses the
//! string and treats anything it cannot parse, or cannot find, as a chain
//! without an ANS deployment.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Key of the contract registry: a `namespace:reference` pair.
///
/// Only the shape is checked. `eip155:2741` and `cosmos:hub` both parse;
/// whether a chain is served is up to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChainId {
    namespace: String,
    reference: String,
}

impl ChainId {
    /// Builds a key from already separated parts.
    pub fn new(namespace: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            reference: reference.into(),
        }
    }

    /// Key of an EVM chain by its numeric id.
    #[must_use]
    pub fn eip155(chain_id: u64) -> Self {
        Self::new("eip155", chain_id.to_string())
    }

    /// Chain family, e.g. `eip155`.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Chain within the family, e.g. `2741`.
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.reference)
    }
}

/// A chain string without a non-empty part on each side of the first `:`.
#[derive(Debug, thiserror::Error)]
#[error("malformed chain id {0:?}, expected namespace:reference")]
pub struct InvalidChainId(String);

impl FromStr for ChainId {
    type Err = InvalidChainId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_once(':')
            .filter(|(namespace, reference)| !namespace.is_empty() && !reference.is_empty())
            .map(|(namespace, reference)| Self::new(namespace, reference))
            .ok_or_else(|| InvalidChainId(s.to_owned()))
    }
}

impl TryFrom<String> for ChainId {
    type Error = InvalidChainId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ChainId> for String {
    fn from(value: ChainId) -> Self {
        value.to_string()
    }
}

/// Read-only registry of ANS contract deployments indexed by chain ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractRegistry(HashMap<ChainId, Address>);

impl ContractRegistry {
    /// Creates a new registry from the given deployment map.
    #[must_use]
    pub const fn new(contracts: HashMap<ChainId, Address>) -> Self {
        Self(contracts)
    }

    /// Builder-style method: adds a deployment and returns `self`.
    #[must_use]
    pub fn with_contract(mut self, chain_id: ChainId, contract: Address) -> Self {
        self.0.insert(chain_id, contract);
        self
    }

    /// Looks up the contract deployed on `chain_id`.
    ///
    /// Returns `None` if the chain is not configured.
    #[must_use]
    pub fn by_chain_id(&self, chain_id: &ChainId) -> Option<Address> {
        self.0.get(chain_id).copied()
    }

    /// Looks up the contract for a raw chain identifier string.
    ///
    /// Unparseable identifiers are treated like unsupported chains.
    #[must_use]
    pub fn contract_for(&self, chain_id: &str) -> Option<Address> {
        chain_id
            .parse::<ChainId>()
            .ok()
            .and_then(|id| self.by_chain_id(&id))
    }

    /// Iterates over the configured chains.
    pub fn chain_ids(&self) -> impl Iterator<Item = &ChainId> {
        self.0.keys()
    }

    /// Returns the number of configured chains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no chain is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(ChainId, Address)> for ContractRegistry {
    fn from_iter<T: IntoIterator<Item = (ChainId, Address)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_chain_id_json_is_a_plain_string() {
        let chain_id = ChainId::eip155(2741);
        assert_eq!(serde_json::to_value(&chain_id).unwrap(), "eip155:2741");
        let back: ChainId = serde_json::from_str("\"eip155:2741\"").unwrap();
        assert_eq!(back, chain_id);
        assert_eq!((back.namespace(), back.reference()), ("eip155", "2741"));
    }

    #[test]
    fn test_chain_id_requires_both_parts() {
        for bad in ["abstract", ":2741", "eip155:", ""] {
            assert!(bad.parse::<ChainId>().is_err(), "{bad:?}");
            assert!(serde_json::from_value::<ChainId>(serde_json::json!(bad)).is_err());
        }
    }

    #[test]
    fn test_chain_id_accepts_any_namespace() {
        let chain_id: ChainId = "cosmos:hub".parse().unwrap();
        assert_eq!(chain_id.to_string(), "cosmos:hub");
    }

    #[test]
    fn test_contract_for_known_chain() {
        let contract = address!("86a282845a61302Ba4735d111b1a1417f6e617Ad");
        let registry = ContractRegistry::default().with_contract(ChainId::eip155(2741), contract);
        assert_eq!(registry.contract_for("eip155:2741"), Some(contract));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_contract_for_fails_closed() {
        let registry = ContractRegistry::default().with_contract(
            ChainId::eip155(2741),
            address!("86a282845a61302Ba4735d111b1a1417f6e617Ad"),
        );
        assert_eq!(registry.contract_for("eip155:1"), None);
        assert_eq!(registry.contract_for("solana:2741"), None);
        assert_eq!(registry.contract_for("2741"), None);
        assert_eq!(registry.contract_for(""), None);
        assert!(ContractRegistry::default().is_empty());
    }
}
