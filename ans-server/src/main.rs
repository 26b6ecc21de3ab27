//! Abstract Name Service HTTP server.
//!
//! # Usage
//!
//! ```bash
//! # Run with default config (config.toml in current directory)
//! cargo run -p ans-server --release
//!
//! # Run with custom config path
//! cargo run -p ans-server -- --config /path/to/config.toml
//!
//! # Configure logging level
//! RUST_LOG=debug cargo run -p ans-server
//! ```
//!
//! # Environment Variables
//!
//! - `CONFIG` - Path to TOML configuration file (default: `config.toml`)
//! - `HOST` - Override bind address (default: `0.0.0.0`)
//! - `PORT` - Override port (default: `3741`)
//! - `RUST_LOG` - Log level filter (default: `info`)
//!
//! A `.env` file in the working directory is loaded first, if present.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use ans::chain::ContractRegistry;
use ans::{NameResolver, ResolverConfig};
use ans_evm::HttpTransport;
use axum::http::Method;
use axum::{Json, Router};
use clap::Parser;
use tower_http::cors;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use url::Url;

use ans_server::config::{ResolvedChain, ServerConfig};
use ans_server::handlers::{AnsService, ans_router};

/// Abstract Name Service lookup server.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, short, env = "CONFIG", default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        tracing::error!("ANS server failed: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::load_from(&args.config)?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        default_chain = %config.default_chain,
        chains = config.chains.len(),
        "Loaded configuration"
    );

    let mut resolved = config.resolved_chains();
    let default_index = resolved
        .iter()
        .position(|c| c.chain_id == config.default_chain)
        .ok_or_else(|| {
            format!(
                "default chain {} has no RPC endpoint or ANS contract",
                config.default_chain
            )
        })?;
    let default = resolved.swap_remove(default_index);

    let mut service = AnsService::new(default.chain_id.clone(), connect(&default)?);
    for chain in &resolved {
        service = service.with_resolver(chain.chain_id.clone(), connect(chain)?);
    }
    tracing::info!(
        default_chain = %service.default_chain(),
        chains = ?service.chains().map(ToString::to_string).collect::<Vec<_>>(),
        "Serving ANS lookups"
    );

    let app = Router::new()
        .merge(ans_router(Arc::new(service)))
        .route("/health", axum::routing::get(health))
        .layer(TraceLayer::new_for_http())
        .layer(
            cors::CorsLayer::new()
                .allow_origin(cors::Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers(cors::Any),
        );

    let addr = SocketAddr::new(config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("ANS server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("ANS server shut down gracefully");
    Ok(())
}

/// Builds the resolver for one chain, scoped to that chain's contract.
fn connect(chain: &ResolvedChain) -> Result<NameResolver<HttpTransport>, Box<dyn std::error::Error>> {
    let rpc_url: Url = chain
        .rpc_url
        .parse()
        .map_err(|e| format!("Invalid RPC URL for {}: {e}", chain.chain_id))?;
    let transport = HttpTransport::connect(&chain.chain_id, &[(rpc_url, chain.rpc_rate_limit)])?;
    let contracts =
        ContractRegistry::default().with_contract(chain.chain_id.clone(), chain.contract);
    tracing::info!(chain = %chain.chain_id, contract = %chain.contract, "Registered ANS resolver");
    Ok(NameResolver::new(
        transport,
        ResolverConfig::default().with_contracts(contracts),
    ))
}

/// Health check endpoint.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Waits for Ctrl-C or SIGTERM (Unix) to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => tracing::info!("Received Ctrl-C, shutting down..."),
            _ = sigterm.recv() => tracing::info!("Received SIGTERM, shutting down..."),
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.expect("failed to listen for Ctrl-C");
        tracing::info!("Received Ctrl-C, shutting down...");
    }
}
