#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Resolution of Abstract Name Service (`.abs`) domains.
//!
//! This crate turns human-readable `.abs` names into EVM addresses and back by
//! reading the ANS registry contract with plain `eth_call` requests. It carries
//! its own minimal ABI codec for the three contract functions it needs and is
//! transport-agnostic: any JSON-RPC `request` function can back it through
//! [`transport::CallTransport`]. An alloy-based transport lives in `ans-evm`.
//!
//! # Overview
//!
//! A forward lookup reads the owner of a name, treats the zero and burned
//! addresses as "not registered", and then prefers the name's record when that
//! record is itself an address. A reverse lookup asks the contract for the
//! primary name of an address. Anything that simply has no answer yields
//! `None`; malformed contract output and transport failures are errors.
//!
//! # Modules
//!
//! - [`abi`] - Selectors, call data encoding and return data decoding
//! - [`chain`] - CAIP-2 chain IDs and the per-chain contract registry
//! - [`error`] - Codec and resolution errors
//! - [`hex`] - Hex and 32-byte word helpers
//! - [`host`] - JSON handlers for name lookup, RPC methods and transaction insight
//! - [`name`] - Domain normalization
//! - [`networks`] - Known ANS deployments
//! - [`resolver`] - Forward and reverse resolution engine
//! - [`transport`] - The `eth_call` seam
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation for debugging and monitoring

pub mod abi;
pub mod chain;
pub mod error;
pub mod hex;
pub mod host;
pub mod name;
pub mod networks;
pub mod resolver;
pub mod transport;

pub use error::{CodecError, ResolveError};
pub use resolver::{NameResolver, ResolverConfig};
