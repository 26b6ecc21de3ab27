//! ANS server configuration.
//!
//! Loads configuration from a TOML file with support for environment variable
//! expansion in string values. Variables use `$VAR` or `${VAR}` syntax.
//!
//! # Example Configuration
//!
//! ```toml
//! host = "0.0.0.0"
//! port = 3741
//! default_chain = "eip155:2741"
//!
//! [chains."eip155:2741"]
//! rpc_url = "${ABSTRACT_RPC_URL}"
//! rpc_rate_limit = 25
//!
//! [chains."eip155:11124"]
//! rpc_url = "https://api.testnet.abs.xyz"
//! contract = "0x0000000000000000000000000000000000000000"
//! ```
//!
//! Chains from the known network table may omit `rpc_url` and `contract`;
//! the public endpoint and the known deployment are used instead.
//!
//! # Environment Variables
//!
//! - `HOST` - Override server bind address
//! - `PORT` - Override server port
//! - Any variable referenced by `$VAR` in the config file

use std::collections::HashMap;
use std::net::IpAddr;
use std::path::Path;

use alloy_primitives::Address;
use ans::chain::ChainId;
use ans::networks::{ABSTRACT_MAINNET, network_by_chain_id};
use serde::{Deserialize, Serialize};

/// Top-level server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (default: `0.0.0.0`).
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Server port (default: `3741`).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Chain used when a request does not name one (default: `eip155:2741`).
    #[serde(default = "default_chain")]
    pub default_chain: ChainId,

    /// Chain configurations keyed by CAIP-2 network identifier.
    #[serde(default)]
    pub chains: HashMap<ChainId, ChainConfig>,
}

/// Per-chain configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// HTTP RPC endpoint URL. Falls back to the known public endpoint.
    pub rpc_url: Option<String>,

    /// Maximum requests per second sent to `rpc_url`.
    pub rpc_rate_limit: Option<u32>,

    /// ANS contract address. Falls back to the known deployment.
    pub contract: Option<Address>,
}

/// A chain ready to be connected: endpoint and contract are both known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChain {
    /// CAIP-2 identifier.
    pub chain_id: ChainId,
    /// HTTP RPC endpoint URL.
    pub rpc_url: String,
    /// Maximum requests per second, if limited.
    pub rpc_rate_limit: Option<u32>,
    /// ANS contract address.
    pub contract: Address,
}

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path that was read.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`ServerConfig`].
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

fn default_host() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0))
}

const fn default_port() -> u16 {
    3741
}

fn default_chain() -> ChainId {
    ChainId::eip155(ABSTRACT_MAINNET)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            default_chain: default_chain(),
            chains: HashMap::new(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a specific file path.
    ///
    /// A missing file yields the defaults. After loading, `HOST` and `PORT`
    /// env vars override the file values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = if path.exists() {
            std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?
        } else {
            String::new()
        };

        let mut config = Self::from_toml(&content)?;

        if let Ok(host) = std::env::var("HOST")
            && let Ok(addr) = host.parse()
        {
            config.host = addr;
        }
        if let Ok(port) = std::env::var("PORT")
            && let Ok(p) = port.parse()
        {
            config.port = p;
        }

        Ok(config)
    }

    /// Parses configuration from TOML, expanding environment variables first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is invalid.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(&expand_env_vars(content))?)
    }

    /// Returns every chain that has both an RPC endpoint and a contract.
    ///
    /// The default chain is included even when it has no explicit entry, as
    /// long as it is a known network. Chains that cannot be completed are
    /// skipped with a warning.
    #[must_use]
    pub fn resolved_chains(&self) -> Vec<ResolvedChain> {
        let mut chains = self.chains.clone();
        chains.entry(self.default_chain.clone()).or_default();

        let mut resolved: Vec<_> = chains
            .into_iter()
            .filter_map(|(chain_id, chain)| {
                let known = network_by_chain_id(&chain_id);
                let rpc_url = chain
                    .rpc_url
                    .filter(|url| !url.trim().is_empty() && !url.starts_with('$'))
                    .or_else(|| known.map(|n| n.rpc_url.to_owned()));
                let contract = chain.contract.or_else(|| known.map(|n| n.contract));
                match (rpc_url, contract) {
                    (Some(rpc_url), Some(contract)) => Some(ResolvedChain {
                        chain_id,
                        rpc_url,
                        rpc_rate_limit: chain.rpc_rate_limit,
                        contract,
                    }),
                    (None, _) => {
                        tracing::warn!(chain = %chain_id, "Skipping chain: rpc_url not resolved (missing env var?)");
                        None
                    }
                    (_, None) => {
                        tracing::warn!(chain = %chain_id, "Skipping chain: no known ANS contract");
                        None
                    }
                }
            })
            .collect();
        resolved.sort_by_key(|c| c.chain_id.to_string());
        resolved
    }
}

/// Expands `$VAR` and `${VAR}` patterns in a string from environment variables.
///
/// Unresolved variables are left as-is.
fn expand_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            result.push(ch);
            continue;
        }

        let braced = chars.next_if_eq(&'{').is_some();
        let mut var_name = String::new();
        let mut closed = false;
        while let Some(&c) = chars.peek() {
            if braced {
                if c == '}' {
                    chars.next();
                    closed = true;
                    break;
                }
            } else if !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            var_name.push(c);
            chars.next();
        }

        match std::env::var(&var_name) {
            Ok(val) if !var_name.is_empty() && braced == closed => result.push_str(&val),
            _ => {
                result.push('$');
                if braced {
                    result.push('{');
                }
                result.push_str(&var_name);
                if closed {
                    result.push('}');
                }
            }
        }
    }

    result
}
