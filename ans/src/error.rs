//! Error types for ANS encoding, decoding and resolution.
//!
//! Two layers are distinguished:
//!
//! - [`CodecError`] covers everything that can go wrong while building call
//!   data or decoding raw `eth_call` output.
//! - [`ResolveError`] wraps codec failures together with the shape check on
//!   transport responses and the transport's own error type, which is carried
//!   through untouched.
//!
//! Expected "no answer" outcomes (unsupported chain, malformed domain,
//! unregistered name) are never errors; resolution returns `None` for them.

use alloy_primitives::hex::FromHexError;

/// Failures of the hex utilities and the ABI codec.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Input had odd length or non-hex characters.
    #[error("invalid hex string: {0}")]
    InvalidHex(#[from] FromHexError),

    /// Input does not match the `0x` + 40 hex digit address shape.
    #[error("invalid address: {0:?}")]
    InvalidAddress(String),

    /// Raw call output is truncated or points outside its own buffer.
    #[error("invalid ABI-encoded return: {0}")]
    InvalidAbiReturn(&'static str),
}

/// Errors surfaced by the resolution engine.
///
/// # Type Parameters
///
/// - `E` - The error type of the underlying [`CallTransport`](crate::transport::CallTransport)
#[derive(Debug, thiserror::Error)]
pub enum ResolveError<E> {
    /// Call data could not be built or the return data could not be decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The transport answered `eth_call` with something other than a string.
    #[error("unexpected eth_call response shape: expected hex string, got {0}")]
    UnexpectedResponseShape(String),

    /// The transport itself failed.
    #[error("transport error: {0}")]
    Transport(#[source] E),
}

impl<E> ResolveError<E> {
    /// Returns `true` if this error originated in the transport.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
