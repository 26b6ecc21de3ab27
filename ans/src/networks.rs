//! Known ANS deployments.
//!
//! Applications that resolve against Abstract mainnet can start from
//! [`known_networks`] or [`default_contracts`]; everything else can be
//! registered through [`ContractRegistry::with_contract`].

use alloy_primitives::{Address, address};

use crate::chain::{ChainId, ContractRegistry};

/// Abstract Mainnet chain ID.
pub const ABSTRACT_MAINNET: u64 = 2741;

/// ANS v2 proxy contract on Abstract Mainnet.
pub const ANS_ABSTRACT_MAINNET: Address = address!("86a282845a61302Ba4735d111b1a1417f6e617Ad");

/// Public JSON-RPC endpoint for Abstract Mainnet.
pub const ABSTRACT_MAINNET_RPC: &str = "https://api.mainnet.abs.xyz/";

/// A known ANS deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkInfo {
    /// Human-readable network name.
    pub name: &'static str,
    /// EIP-155 chain id.
    pub chain_id: u64,
    /// ANS contract address.
    pub contract: Address,
    /// Public RPC endpoint.
    pub rpc_url: &'static str,
}

impl NetworkInfo {
    /// Returns the CAIP-2 identifier of this network.
    #[must_use]
    pub fn caip2(&self) -> ChainId {
        ChainId::eip155(self.chain_id)
    }
}

const KNOWN_NETWORKS: &[NetworkInfo] = &[NetworkInfo {
    name: "abstract",
    chain_id: ABSTRACT_MAINNET,
    contract: ANS_ABSTRACT_MAINNET,
    rpc_url: ABSTRACT_MAINNET_RPC,
}];

/// Returns all known ANS deployments.
#[must_use]
pub const fn known_networks() -> &'static [NetworkInfo] {
    KNOWN_NETWORKS
}

/// Returns the known network for a CAIP-2 identifier, if any.
#[must_use]
pub fn network_by_chain_id(chain_id: &ChainId) -> Option<&'static NetworkInfo> {
    known_networks().iter().find(|n| &n.caip2() == chain_id)
}

/// Builds a [`ContractRegistry`] containing every known deployment.
#[must_use]
pub fn default_contracts() -> ContractRegistry {
    known_networks()
        .iter()
        .map(|n| (n.caip2(), n.contract))
        .collect()
}
