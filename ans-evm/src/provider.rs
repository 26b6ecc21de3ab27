//! RPC client construction and the provider-backed [`CallTransport`].

use std::borrow::Cow;
use std::future::Future;
use std::num::NonZeroUsize;

use alloy_provider::{Provider, RootProvider};
use alloy_rpc_client::RpcClient;
use alloy_transport::TransportError;
use alloy_transport::layers::{FallbackLayer, ThrottleLayer};
use alloy_transport_http::Http;
use ans::chain::ChainId;
use ans::transport::CallTransport;
use serde_json::Value;
use tower::ServiceBuilder;
use url::Url;

/// Errors raised while assembling an RPC client.
#[derive(Debug, thiserror::Error)]
pub enum RpcClientError {
    /// None of the configured endpoints uses HTTP or HTTPS.
    #[error("no HTTP(S) RPC endpoint configured for {0}")]
    NoHttpEndpoint(ChainId),
}

/// Creates an RPC client from HTTP endpoint URLs with optional per-endpoint rate limits.
///
/// Each entry in `endpoints` is a `(url, optional_rate_limit)` pair, the limit
/// being requests per second. Non-HTTP(S) URLs are skipped. Requests are
/// spread over all remaining endpoints by a fallback layer.
///
/// # Errors
///
/// Returns [`RpcClientError::NoHttpEndpoint`] if no HTTP(S) endpoint remains.
pub fn rpc_client(
    chain_id: &ChainId,
    endpoints: &[(Url, Option<u32>)],
) -> Result<RpcClient, RpcClientError> {
    let transports = endpoints
        .iter()
        .filter_map(|(url, rate_limit)| {
            let scheme = url.scheme();
            if scheme != "http" && scheme != "https" {
                return None;
            }
            #[cfg(feature = "telemetry")]
            tracing::info!(chain=%chain_id, rpc_url=%url, rate_limit=?rate_limit, "Using HTTP transport");
            let limit = rate_limit.unwrap_or(u32::MAX);
            let service = ServiceBuilder::new()
                .layer(ThrottleLayer::new(limit))
                .service(Http::new(url.clone()));
            Some(service)
        })
        .collect::<Vec<_>>();
    let active = NonZeroUsize::new(transports.len())
        .ok_or_else(|| RpcClientError::NoHttpEndpoint(chain_id.clone()))?;
    let fallback = ServiceBuilder::new()
        .layer(FallbackLayer::default().with_active_transport_count(active))
        .service(transports);
    Ok(RpcClient::new(fallback, false))
}

/// A [`CallTransport`] that forwards requests to an alloy [`Provider`].
///
/// Requests are sent as raw JSON-RPC calls, so the `eth_call` result reaches
/// the resolver exactly as the node returned it.
#[derive(Debug, Clone)]
pub struct ProviderTransport<P> {
    provider: P,
}

/// [`ProviderTransport`] over the fallback HTTP client built by [`rpc_client`].
pub type HttpTransport = ProviderTransport<RootProvider>;

impl<P> ProviderTransport<P> {
    /// Wraps an existing provider.
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Returns the wrapped provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }
}

impl HttpTransport {
    /// Connects to `endpoints` through [`rpc_client`].
    ///
    /// # Errors
    ///
    /// Returns [`RpcClientError`] if no usable endpoint is configured.
    pub fn connect(
        chain_id: &ChainId,
        endpoints: &[(Url, Option<u32>)],
    ) -> Result<Self, RpcClientError> {
        let client = rpc_client(chain_id, endpoints)?;
        #[cfg(feature = "telemetry")]
        tracing::info!(chain=%chain_id, "Using ANS provider");
        Ok(Self::new(RootProvider::new(client)))
    }
}

impl<P: Provider + Send + Sync> CallTransport for ProviderTransport<P> {
    type Error = TransportError;

    fn request(
        &self,
        method: &'static str,
        params: Value,
    ) -> impl Future<Output = Result<Value, Self::Error>> + Send {
        self.provider
            .raw_request::<Value, Value>(Cow::Borrowed(method), params)
    }
}

#[cfg(test)]
mod tests {
    use ans::abi::{DOMAINS_SELECTOR, RECORDS_SELECTOR, encode_call, encode_string_arg};
    use ans::hex::pad_word;
    use ans::networks::{ABSTRACT_MAINNET, ANS_ABSTRACT_MAINNET};
    use ans::transport::eth_call;
    use ans::{NameResolver, ResolveError, ResolverConfig};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

    use super::*;

    const OWNER: &str = "ab5801a7d398351b8be11c439e05c5b3259aec9b";

    /// Answers JSON-RPC requests with a fixed result or error, echoing the id.
    struct JsonRpc(Value);

    impl Respond for JsonRpc {
        fn respond(&self, request: &Request) -> ResponseTemplate {
            let body: Value = request.body_json().unwrap();
            let mut reply = json!({ "jsonrpc": "2.0", "id": body["id"] });
            match &self.0 {
                Value::Object(error) if error.contains_key("code") => {
                    reply["error"] = self.0.clone();
                }
                result => reply["result"] = result.clone(),
            }
            ResponseTemplate::new(200).set_body_json(reply)
        }
    }

    fn chain() -> ChainId {
        ChainId::eip155(ABSTRACT_MAINNET)
    }

    fn endpoint(server: &MockServer) -> Vec<(Url, Option<u32>)> {
        vec![(Url::parse(&server.uri()).unwrap(), None)]
    }

    #[test]
    fn test_rpc_client_requires_http_endpoint() {
        let endpoints = vec![(Url::parse("wss://rpc.example.com").unwrap(), None)];
        let err = rpc_client(&chain(), &endpoints).unwrap_err();
        assert!(matches!(err, RpcClientError::NoHttpEndpoint(ref c) if c == &chain()));
        assert!(rpc_client(&chain(), &[]).is_err());
    }

    #[tokio::test]
    async fn test_eth_call_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "eth_call",
                "params": [{ "data": "0x1234" }, "latest"]
            })))
            .respond_with(JsonRpc(json!("0xabcd")))
            .expect(1)
            .mount(&server)
            .await;

        let transport = ProviderTransport::connect(&chain(), &endpoint(&server)).unwrap();
        let result = eth_call(&transport, &ANS_ABSTRACT_MAINNET, "0x1234")
            .await
            .unwrap();
        assert_eq!(result, "0xabcd");
    }

    #[tokio::test]
    async fn test_eth_call_surfaces_rpc_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(JsonRpc(json!({ "code": 3, "message": "execution reverted" })))
            .mount(&server)
            .await;

        let transport = ProviderTransport::connect(&chain(), &endpoint(&server)).unwrap();
        let err = eth_call(&transport, &ANS_ABSTRACT_MAINNET, "0x1234")
            .await
            .unwrap_err();
        match err {
            ResolveError::Transport(inner) => {
                let payload = inner.as_error_resp().unwrap();
                assert_eq!(payload.message, "execution reverted");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_through_provider() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "params": [{ "data": encode_call(DOMAINS_SELECTOR, &encode_string_arg("foo")) }]
            })))
            .respond_with(JsonRpc(json!(format!("0x{}", pad_word(OWNER)))))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "params": [{ "data": encode_call(RECORDS_SELECTOR, &encode_string_arg("foo")) }]
            })))
            .respond_with(JsonRpc(json!(format!("0x{}", encode_string_arg("")))))
            .mount(&server)
            .await;

        let transport = ProviderTransport::connect(&chain(), &endpoint(&server)).unwrap();
        let resolver = NameResolver::new(transport, ResolverConfig::default());
        let resolution = resolver
            .resolve(&chain().to_string(), "foo.abs")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolution.address, format!("0x{OWNER}"));
        assert_eq!(resolution.domain_name, "foo.abs");
    }
}
