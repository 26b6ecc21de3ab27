//! The `eth_call` seam between the resolver and a JSON-RPC provider.
//!
//! The resolver never talks to the network itself. It issues requests through
//! a [`CallTransport`], which may be an alloy provider (see `ans-evm`), a
//! wallet's injected provider, or a test double. [`eth_call`] is the only
//! dispatcher built on top of it and enforces that the response is a string.

use std::future::Future;
use std::sync::Arc;

use alloy_primitives::Address;
use serde_json::{Value, json};
#[cfg(feature = "telemetry")]
use tracing::instrument;

use crate::abi::to_lower_hex;
use crate::error::ResolveError;

/// JSON-RPC method name of a read-only contract call.
pub const ETH_CALL: &str = "eth_call";

/// Block tag every call is evaluated against.
pub const LATEST_BLOCK: &str = "latest";

/// A JSON-RPC request function, in the shape of an EIP-1193 `request`.
///
/// Implementations forward `method` and `params` verbatim and return the raw
/// `result` member. They must not retry; failures are returned as-is.
pub trait CallTransport: Send + Sync {
    /// Error type of the underlying transport.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sends a single JSON-RPC request.
    fn request(
        &self,
        method: &'static str,
        params: Value,
    ) -> impl Future<Output = Result<Value, Self::Error>> + Send;
}

impl<T: CallTransport> CallTransport for Arc<T> {
    type Error = T::Error;

    fn request(
        &self,
        method: &'static str,
        params: Value,
    ) -> impl Future<Output = Result<Value, Self::Error>> + Send {
        (**self).request(method, params)
    }
}

impl<T: CallTransport> CallTransport for &T {
    type Error = T::Error;

    fn request(
        &self,
        method: &'static str,
        params: Value,
    ) -> impl Future<Output = Result<Value, Self::Error>> + Send {
        (**self).request(method, params)
    }
}

/// Executes `eth_call` against `to` with the given call data at `latest`.
///
/// # Errors
///
/// Returns [`ResolveError::Transport`] if the transport fails and
/// [`ResolveError::UnexpectedResponseShape`] if it answers with anything
/// other than a JSON string.
#[cfg_attr(feature = "telemetry", instrument(name = "ans.eth_call", skip_all, fields(to = %to), err))]
pub async fn eth_call<T: CallTransport>(
    transport: &T,
    to: &Address,
    data: &str,
) -> Result<String, ResolveError<T::Error>> {
    let params = json!([{ "to": to_lower_hex(to), "data": data }, LATEST_BLOCK]);
    let result = transport
        .request(ETH_CALL, params)
        .await
        .map_err(ResolveError::Transport)?;
    match result {
        Value::String(hex) => Ok(hex),
        other => Err(ResolveError::UnexpectedResponseShape(json_kind(&other).to_owned())),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use serde_json::Value;

    use super::CallTransport;

    #[derive(Debug, thiserror::Error)]
    #[error("mock transport: {0}")]
    pub struct MockError(pub String);

    /// Answers `eth_call` by exact call data and records every request.
    #[derive(Debug, Default)]
    pub struct MockTransport {
        responses: HashMap<String, Result<Value, String>>,
        calls: Mutex<Vec<(String, Value)>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(mut self, data: impl Into<String>, result: Value) -> Self {
            self.responses.insert(data.into(), Ok(result));
            self
        }

        pub fn fail(mut self, data: impl Into<String>, message: &str) -> Self {
            self.responses.insert(data.into(), Err(message.to_owned()));
            self
        }

        pub fn calls(&self) -> Vec<(String, Value)> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl CallTransport for MockTransport {
        type Error = MockError;

        async fn request(&self, method: &'static str, params: Value) -> Result<Value, MockError> {
            self.calls
                .lock()
                .unwrap()
                .push((method.to_owned(), params.clone()));
            let data = params[0]["data"].as_str().unwrap_or_default();
            match self.responses.get(data) {
                Some(Ok(value)) => Ok(value.clone()),
                Some(Err(message)) => Err(MockError(message.clone())),
                None => Err(MockError(format!("no response for {data}"))),
            }
        }
    }
}
