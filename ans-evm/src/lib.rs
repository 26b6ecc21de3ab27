#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Alloy-backed transport for Abstract Name Service resolution.
//!
//! The `ans` crate resolves names through any [`CallTransport`]. This crate
//! supplies one built on an alloy [`Provider`](alloy_provider::Provider):
//! HTTP endpoints are wrapped in per-endpoint rate limiting and combined
//! behind a fallback layer, mirroring how a production RPC setup is usually
//! wired.
//!
//! ```no_run
//! use ans::{NameResolver, ResolverConfig};
//! use ans::networks::{ABSTRACT_MAINNET, ABSTRACT_MAINNET_RPC};
//! use ans::chain::ChainId;
//! use ans_evm::ProviderTransport;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let chain = ChainId::eip155(ABSTRACT_MAINNET);
//! let transport = ProviderTransport::connect(&chain, &[(ABSTRACT_MAINNET_RPC.parse()?, None)])?;
//! let resolver = NameResolver::new(transport, ResolverConfig::default());
//! let resolution = resolver.resolve(&chain.to_string(), "vitalik.abs").await?;
//! # let _ = resolution;
//! # Ok(())
//! # }
//! ```
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation for debugging and monitoring
//!
//! [`CallTransport`]: ans::transport::CallTransport

pub mod provider;

pub use provider::{HttpTransport, ProviderTransport, RpcClientError, rpc_client};
