//! Forward and reverse ANS resolution.
//!
//! [`NameResolver`] composes the name normalizer, the contract registry, the
//! ABI codec and the `eth_call` dispatcher:
//!
//! - **Forward**: `domains(name)` yields the owner. A zero or burned owner
//!   means the name does not exist. Otherwise `records(name)` is read, and if
//!   the record is itself an address it takes precedence over the owner.
//! - **Reverse**: `getNameByAddress(address)` yields the primary name.
//!
//! Every "no answer" outcome is `Ok(None)`. Decode and transport failures are
//! errors.

use alloy_primitives::{Address, Selector, address};
use serde::Serialize;
#[cfg(feature = "telemetry")]
use tracing::instrument;

use crate::abi::{
    self, DOMAINS_SELECTOR, GET_NAME_BY_ADDRESS_SELECTOR, RECORDS_SELECTOR, decode_address_return,
    decode_string_return, encode_address_arg, encode_call, encode_string_arg, is_hex_address,
};
use crate::chain::ContractRegistry;
use crate::error::ResolveError;
use crate::name::{TLD, normalize_name_part, with_tld};
use crate::networks::default_contracts;
use crate::transport::{CallTransport, eth_call};

/// Owner returned for names that were deliberately disabled.
pub const BURNED_ADDRESS: Address = address!("000000000000000000000000000000000000dead");

/// Function selectors of the three contract calls the resolver issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selectors {
    /// `domains(string)`: owner of a name.
    pub owner: Selector,
    /// `records(string)`: free-form record of a name.
    pub record: Selector,
    /// `getNameByAddress(address)`: primary name of an address.
    pub reverse_name: Selector,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            owner: DOMAINS_SELECTOR,
            record: RECORDS_SELECTOR,
            reverse_name: GET_NAME_BY_ADDRESS_SELECTOR,
        }
    }
}

/// Immutable configuration of a [`NameResolver`].
///
/// The default targets the known deployments with the `abs` label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Top-level label, without the leading dot.
    pub tld: String,
    /// Contract deployment per chain.
    pub contracts: ContractRegistry,
    /// Function selectors.
    pub selectors: Selectors,
    /// Non-zero owner that marks a name as burned.
    pub burned_address: Address,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            tld: TLD.to_owned(),
            contracts: default_contracts(),
            selectors: Selectors::default(),
            burned_address: BURNED_ADDRESS,
        }
    }
}

impl ResolverConfig {
    /// Replaces the contract registry.
    #[must_use]
    pub fn with_contracts(mut self, contracts: ContractRegistry) -> Self {
        self.contracts = contracts;
        self
    }

    /// Replaces the top-level label, stored lowercase.
    #[must_use]
    pub fn with_tld(mut self, tld: impl Into<String>) -> Self {
        self.tld = tld.into().to_lowercase();
        self
    }

    /// Replaces the function selectors.
    #[must_use]
    pub fn with_selectors(mut self, selectors: Selectors) -> Self {
        self.selectors = selectors;
        self
    }
}

/// Result of a successful forward resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    /// Address the name resolves to, lowercase.
    pub address: String,
    /// Canonical domain name including the label.
    pub domain_name: String,
}

/// Everything known about a registered name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainInfo {
    /// Canonical domain name including the label.
    pub domain_name: String,
    /// Registered owner, lowercase.
    pub owner: String,
    /// Trimmed record, if set.
    pub record: Option<String>,
    /// Resolved address: the record if it is an address, the owner otherwise.
    pub address: String,
}

impl From<DomainInfo> for Resolution {
    fn from(info: DomainInfo) -> Self {
        Self {
            address: info.address,
            domain_name: info.domain_name,
        }
    }
}

/// Resolves ANS names through a [`CallTransport`].
///
/// The resolver holds no mutable state; concurrent lookups need no
/// coordination.
#[derive(Debug, Clone)]
pub struct NameResolver<T> {
    transport: T,
    config: ResolverConfig,
}

impl<T> NameResolver<T> {
    /// Creates a resolver from a transport and configuration.
    pub const fn new(transport: T, config: ResolverConfig) -> Self {
        Self { transport, config }
    }

    /// Returns the resolver configuration.
    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Returns the underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: CallTransport> NameResolver<T> {
    /// Resolves `domain` on `chain_id` to an address.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if a contract call fails or returns malformed data.
    pub async fn resolve(
        &self,
        chain_id: &str,
        domain: &str,
    ) -> Result<Option<Resolution>, ResolveError<T::Error>> {
        Ok(self.domain_info(chain_id, domain).await?.map(Resolution::from))
    }

    /// Looks up owner, record and resolved address of `domain` on `chain_id`.
    ///
    /// Returns `None` for unsupported chains, malformed names, and names whose
    /// owner is the zero or burned address. In the latter case the record is
    /// not fetched.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if a contract call fails or returns malformed data.
    #[cfg_attr(feature = "telemetry", instrument(name = "ans.domain_info", skip(self), err))]
    pub async fn domain_info(
        &self,
        chain_id: &str,
        domain: &str,
    ) -> Result<Option<DomainInfo>, ResolveError<T::Error>> {
        let Some((contract, name_part)) = self.target(chain_id, domain) else {
            return Ok(None);
        };

        let owner = self.owner_of(&contract, &name_part).await?;
        if owner.is_zero() || owner == self.config.burned_address {
            #[cfg(feature = "telemetry")]
            tracing::debug!(name = %name_part, owner = %owner, "Name is unregistered or burned");
            return Ok(None);
        }

        let record = self.record_of(&contract, &name_part).await?;
        let owner = abi::to_lower_hex(&owner);
        let address = if is_hex_address(&record) {
            record.to_ascii_lowercase()
        } else {
            owner.clone()
        };

        Ok(Some(DomainInfo {
            domain_name: with_tld(&name_part, &self.config.tld),
            owner,
            record: (!record.is_empty()).then_some(record),
            address,
        }))
    }

    /// Reads the trimmed record of `domain` on `chain_id`.
    ///
    /// Returns `None` for unsupported chains, malformed names and empty records.
    /// The owner is not consulted.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if the contract call fails or returns malformed data.
    #[cfg_attr(feature = "telemetry", instrument(name = "ans.record", skip(self), err))]
    pub async fn record(
        &self,
        chain_id: &str,
        domain: &str,
    ) -> Result<Option<String>, ResolveError<T::Error>> {
        let Some((contract, name_part)) = self.target(chain_id, domain) else {
            return Ok(None);
        };
        let record = self.record_of(&contract, &name_part).await?;
        Ok((!record.is_empty()).then_some(record))
    }

    /// Resolves `address` on `chain_id` to its primary domain name.
    ///
    /// Returns `None` for unsupported chains, inputs that are not
    /// `0x`-prefixed 40 digit hex, and addresses without a primary name.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if the contract call fails or returns malformed data.
    #[cfg_attr(feature = "telemetry", instrument(name = "ans.reverse_lookup", skip(self), err))]
    pub async fn reverse_lookup(
        &self,
        chain_id: &str,
        address: &str,
    ) -> Result<Option<String>, ResolveError<T::Error>> {
        let Some(contract) = self.config.contracts.contract_for(chain_id) else {
            return Ok(None);
        };
        if !is_hex_address(address) {
            return Ok(None);
        }

        let data = encode_call(self.config.selectors.reverse_name, &encode_address_arg(address)?);
        let raw = eth_call(&self.transport, &contract, &data).await?;
        let name_part = decode_string_return(&raw)?.trim().to_lowercase();

        Ok((!name_part.is_empty()).then(|| with_tld(&name_part, &self.config.tld)))
    }

    /// Contract and name part for a forward lookup, if both are valid.
    fn target(&self, chain_id: &str, domain: &str) -> Option<(Address, String)> {
        let Some(contract) = self.config.contracts.contract_for(chain_id) else {
            #[cfg(feature = "telemetry")]
            tracing::debug!(chain = chain_id, "No ANS contract for chain");
            return None;
        };
        let name_part = normalize_name_part(domain, &self.config.tld)?;
        Some((contract, name_part))
    }

    async fn owner_of(
        &self,
        contract: &Address,
        name_part: &str,
    ) -> Result<Address, ResolveError<T::Error>> {
        let data = encode_call(self.config.selectors.owner, &encode_string_arg(name_part));
        let raw = eth_call(&self.transport, contract, &data).await?;
        Ok(decode_address_return(&raw)?)
    }

    async fn record_of(
        &self,
        contract: &Address,
        name_part: &str,
    ) -> Result<String, ResolveError<T::Error>> {
        let data = encode_call(self.config.selectors.record, &encode_string_arg(name_part));
        let raw = eth_call(&self.transport, contract, &data).await?;
        Ok(decode_string_return(&raw)?.trim().to_owned())
    }
}
