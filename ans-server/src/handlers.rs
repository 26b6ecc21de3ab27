//! Axum route handlers for the ANS service.
//!
//! Each endpoint deserializes a host request, picks the resolver for the
//! requested chain and forwards to the matching handler in [`ans::host`].

use std::collections::HashMap;
use std::sync::Arc;

use ans::chain::ChainId;
use ans::host::{
    self, NameLookupRequest, NameLookupResponse, RpcRequest, RpcResponse, TransactionInsight,
    TransactionInsightRequest,
};
use ans::NameResolver;
use ans::transport::CallTransport;
use axum::Json;
use axum::extract::State;

use crate::error::ServerError;

/// One resolver per configured chain plus the chain used by default.
#[derive(Debug)]
pub struct AnsService<T> {
    default_chain: ChainId,
    resolvers: HashMap<ChainId, NameResolver<T>>,
}

/// Shared application state for the service.
pub type AnsState<T> = Arc<AnsService<T>>;

impl<T> AnsService<T> {
    /// Creates a service whose default chain is served by `resolver`.
    pub fn new(default_chain: ChainId, resolver: NameResolver<T>) -> Self {
        let resolvers = HashMap::from([(default_chain.clone(), resolver)]);
        Self {
            default_chain,
            resolvers,
        }
    }

    /// Adds the resolver for another chain.
    #[must_use]
    pub fn with_resolver(mut self, chain_id: ChainId, resolver: NameResolver<T>) -> Self {
        self.resolvers.insert(chain_id, resolver);
        self
    }

    /// Returns the default chain.
    pub const fn default_chain(&self) -> &ChainId {
        &self.default_chain
    }

    /// Returns the configured chains.
    pub fn chains(&self) -> impl Iterator<Item = &ChainId> {
        self.resolvers.keys()
    }

    /// Returns the resolver for `chain_id`.
    ///
    /// Unconfigured or malformed chain ids fall back to the default chain's
    /// resolver, which answers `None` for them without calling out.
    pub fn resolver_for(&self, chain_id: &str) -> &NameResolver<T> {
        chain_id
            .parse::<ChainId>()
            .ok()
            .and_then(|id| self.resolvers.get(&id))
            .unwrap_or_else(|| self.default_resolver())
    }

    fn default_resolver(&self) -> &NameResolver<T> {
        // `new` always registers the default chain and nothing removes it.
        &self.resolvers[&self.default_chain]
    }
}

/// `POST /name-lookup` - Forward or reverse lookup.
///
/// # Errors
///
/// Returns 502 if the upstream node fails, or 500 on malformed contract data.
pub async fn post_name_lookup<T: CallTransport>(
    State(service): State<AnsState<T>>,
    Json(request): Json<NameLookupRequest>,
) -> Result<Json<Option<NameLookupResponse>>, ServerError> {
    let chain_id = match &request {
        NameLookupRequest::Domain { chain_id, .. } | NameLookupRequest::Address { chain_id, .. } => {
            chain_id
        }
    };
    let resolver = service.resolver_for(chain_id);
    Ok(Json(host::name_lookup(resolver, &request).await?))
}

/// `POST /rpc` - RPC-style methods.
///
/// # Errors
///
/// Returns 400 for unknown methods or bad params, 502 if the upstream node
/// fails, or 500 on malformed contract data.
pub async fn post_rpc<T: CallTransport>(
    State(service): State<AnsState<T>>,
    Json(request): Json<RpcRequest>,
) -> Result<Json<RpcResponse>, ServerError> {
    let default_chain = service.default_chain().to_string();
    let chain_id = request
        .params
        .get("chainId")
        .and_then(serde_json::Value::as_str)
        .unwrap_or(&default_chain);
    let resolver = service.resolver_for(chain_id);
    Ok(Json(host::handle_rpc(resolver, &default_chain, request).await?))
}

/// `POST /transaction-insight` - Explain an ANS recipient.
///
/// # Errors
///
/// Returns 502 if the upstream node fails, or 500 on malformed contract data.
pub async fn post_transaction_insight<T: CallTransport>(
    State(service): State<AnsState<T>>,
    Json(request): Json<TransactionInsightRequest>,
) -> Result<Json<Option<TransactionInsight>>, ServerError> {
    let resolver = service.resolver_for(&request.chain_id);
    Ok(Json(host::transaction_insight(resolver, &request).await?))
}

/// Creates an Axum [`axum::Router`] with all lookup endpoints.
///
/// Endpoints:
/// - `POST /name-lookup` - forward or reverse name lookup
/// - `POST /rpc` - `get_domain_info`, `resolve_domain`, `reverse_lookup`
/// - `POST /transaction-insight` - recipient insight
pub fn ans_router<T: CallTransport + 'static>(state: AnsState<T>) -> axum::Router {
    axum::Router::new()
        .route("/name-lookup", axum::routing::post(post_name_lookup::<T>))
        .route("/rpc", axum::routing::post(post_rpc::<T>))
        .route(
            "/transaction-insight",
            axum::routing::post(post_transaction_insight::<T>),
        )
        .with_state(state)
}
