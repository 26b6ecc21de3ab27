//! Host-facing handlers built on top of [`NameResolver`].
//!
//! These are the JSON shapes a wallet host or HTTP service exchanges with
//! callers: name lookup in both directions, a small set of RPC methods, and
//! recipient insight for outgoing transactions. Each handler is a plain async
//! function so it can be mounted on any transport.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ResolveError;
use crate::name::is_ans_domain;
use crate::resolver::NameResolver;
use crate::transport::CallTransport;

/// Protocol tag attached to every name-lookup answer.
pub const PROTOCOL: &str = "ANS";

/// Errors returned by [`handle_rpc`].
#[derive(Debug, thiserror::Error)]
pub enum HostError<E> {
    /// The method name is not served.
    #[error("method not found: {0}")]
    MethodNotFound(String),

    /// Params are missing or malformed.
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// The lookup itself failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError<E>),
}

/// A name-lookup request in either direction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum NameLookupRequest {
    /// Forward lookup of a domain.
    Domain {
        /// CAIP-2 chain id.
        #[serde(rename = "chainId")]
        chain_id: String,
        /// Domain to resolve.
        domain: String,
    },
    /// Reverse lookup of an address.
    Address {
        /// CAIP-2 chain id.
        #[serde(rename = "chainId")]
        chain_id: String,
        /// Address to resolve.
        address: String,
    },
}

/// A resolved address in a forward name-lookup answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAddress {
    /// Always [`PROTOCOL`].
    pub protocol: &'static str,
    /// Resolved address, lowercase.
    pub resolved_address: String,
    /// Canonical domain name.
    pub domain_name: String,
}

/// A resolved domain in a reverse name-lookup answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDomain {
    /// Always [`PROTOCOL`].
    pub protocol: &'static str,
    /// Primary domain name.
    pub resolved_domain: String,
}

/// Answer to a [`NameLookupRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NameLookupResponse {
    /// Forward answer.
    #[serde(rename_all = "camelCase")]
    Addresses {
        /// Resolved addresses; holds exactly one entry.
        resolved_addresses: Vec<ResolvedAddress>,
    },
    /// Reverse answer.
    #[serde(rename_all = "camelCase")]
    Domains {
        /// Resolved domains; holds exactly one entry.
        resolved_domains: Vec<ResolvedDomain>,
    },
}

/// Answers a name-lookup request. `None` means nothing was found.
///
/// # Errors
///
/// Returns [`ResolveError`] if a contract call fails or returns malformed data.
pub async fn name_lookup<T: CallTransport>(
    resolver: &NameResolver<T>,
    request: &NameLookupRequest,
) -> Result<Option<NameLookupResponse>, ResolveError<T::Error>> {
    match request {
        NameLookupRequest::Domain { chain_id, domain } => {
            let resolution = resolver.resolve(chain_id, domain).await?;
            Ok(resolution.map(|r| NameLookupResponse::Addresses {
                resolved_addresses: vec![ResolvedAddress {
                    protocol: PROTOCOL,
                    resolved_address: r.address,
                    domain_name: r.domain_name,
                }],
            }))
        }
        NameLookupRequest::Address { chain_id, address } => {
            let domain = resolver.reverse_lookup(chain_id, address).await?;
            Ok(domain.map(|resolved_domain| NameLookupResponse::Domains {
                resolved_domains: vec![ResolvedDomain {
                    protocol: PROTOCOL,
                    resolved_domain,
                }],
            }))
        }
    }
}

/// A method call on the RPC surface.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RpcRequest {
    /// Method name.
    pub method: String,
    /// Method params; absent params deserialize as `null`.
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DomainInfoParams {
    domain_name: String,
    chain_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResolveDomainParams {
    domain: String,
    chain_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReverseLookupParams {
    address: String,
    chain_id: Option<String>,
}

/// `get_domain_info` answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainInfoResponse {
    /// Resolved address, if the domain exists.
    pub address: Option<String>,
    /// Record, if the domain exists and has one.
    pub record: Option<String>,
    /// Whether the domain resolved.
    pub exists: bool,
}

/// `resolve_domain` answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolveDomainResponse {
    /// Canonical domain name.
    pub domain: String,
    /// Resolved address.
    pub address: String,
    /// Record, if set.
    pub record: Option<String>,
}

/// `reverse_lookup` answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReverseLookupResponse {
    /// Primary domain name.
    pub domain: String,
}

/// Result of [`handle_rpc`]. The `Option` variants serialize `None` as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RpcResponse {
    /// `get_domain_info`.
    DomainInfo(DomainInfoResponse),
    /// `resolve_domain`.
    ResolveDomain(Option<ResolveDomainResponse>),
    /// `reverse_lookup`.
    ReverseLookup(Option<ReverseLookupResponse>),
}

/// Dispatches an RPC request.
///
/// Methods resolve against `default_chain` unless their params carry a
/// `chainId`.
///
/// # Errors
///
/// Returns [`HostError::MethodNotFound`] for unknown methods,
/// [`HostError::InvalidParams`] for missing or empty params, and
/// [`HostError::Resolve`] if the lookup fails.
pub async fn handle_rpc<T: CallTransport>(
    resolver: &NameResolver<T>,
    default_chain: &str,
    request: RpcRequest,
) -> Result<RpcResponse, HostError<T::Error>> {
    #[cfg(feature = "telemetry")]
    tracing::debug!(method = %request.method, "Handling RPC request");

    match request.method.as_str() {
        "get_domain_info" => {
            let params: DomainInfoParams = parse_params(request.params)?;
            require(&params.domain_name, "domainName")?;
            let chain_id = params.chain_id.as_deref().unwrap_or(default_chain);
            let info = resolver.domain_info(chain_id, &params.domain_name).await?;
            Ok(RpcResponse::DomainInfo(info.map_or(
                DomainInfoResponse {
                    address: None,
                    record: None,
                    exists: false,
                },
                |info| DomainInfoResponse {
                    address: Some(info.address),
                    record: info.record,
                    exists: true,
                },
            )))
        }
        "resolve_domain" => {
            let params: ResolveDomainParams = parse_params(request.params)?;
            require(&params.domain, "domain")?;
            let chain_id = params.chain_id.as_deref().unwrap_or(default_chain);
            let info = resolver.domain_info(chain_id, &params.domain).await?;
            Ok(RpcResponse::ResolveDomain(info.map(|info| {
                ResolveDomainResponse {
                    domain: info.domain_name,
                    address: info.address,
                    record: info.record,
                }
            })))
        }
        "reverse_lookup" => {
            let params: ReverseLookupParams = parse_params(request.params)?;
            require(&params.address, "address")?;
            let chain_id = params.chain_id.as_deref().unwrap_or(default_chain);
            let domain = resolver.reverse_lookup(chain_id, &params.address).await?;
            Ok(RpcResponse::ReverseLookup(
                domain.map(|domain| ReverseLookupResponse { domain }),
            ))
        }
        other => Err(HostError::MethodNotFound(other.to_owned())),
    }
}

fn parse_params<P, E>(params: Value) -> Result<P, HostError<E>>
where
    P: for<'de> Deserialize<'de>,
{
    serde_json::from_value(params).map_err(|e| HostError::InvalidParams(e.to_string()))
}

fn require<E>(value: &str, field: &str) -> Result<(), HostError<E>> {
    if value.trim().is_empty() {
        return Err(HostError::InvalidParams(format!("{field} is required")));
    }
    Ok(())
}

/// Recipient of a transaction to inspect.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInsightRequest {
    /// CAIP-2 chain id.
    pub chain_id: String,
    /// Transaction recipient as entered by the user.
    pub to: Option<String>,
}

/// What an ANS recipient resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInsight {
    /// Canonical domain name.
    pub domain_name: String,
    /// Address the funds will go to.
    pub resolved_address: String,
    /// Record, if set.
    pub record: Option<String>,
}

/// Explains an ANS domain in a transaction recipient.
///
/// Returns `None` when there is no recipient, it is not an ANS domain, or it
/// does not resolve.
///
/// # Errors
///
/// Returns [`ResolveError`] if a contract call fails or returns malformed data.
pub async fn transaction_insight<T: CallTransport>(
    resolver: &NameResolver<T>,
    request: &TransactionInsightRequest,
) -> Result<Option<TransactionInsight>, ResolveError<T::Error>> {
    let Some(to) = request.to.as_deref() else {
        return Ok(None);
    };
    if !is_ans_domain(to, &resolver.config().tld) {
        return Ok(None);
    }
    let info = resolver.domain_info(&request.chain_id, to).await?;
    Ok(info.map(|info| TransactionInsight {
        domain_name: info.domain_name,
        resolved_address: info.address,
        record: info.record,
    }))
}
