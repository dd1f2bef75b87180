//! Paid API server demonstrating x402 flash payments.
//!
//! ```bash
//! # Run with default config (config.toml in current directory)
//! PAY_TO=0x... cargo run -p flash402-server
//!
//! # Custom config path and logging level
//! CONFIG=/path/to/config.toml RUST_LOG=debug cargo run -p flash402-server
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Json, Router};
use rand::Rng;
use tracing_subscriber::EnvFilter;
use url::Url;

use flash402::chain::ChainClient;
use flash402_evm::HttpChainClient;
use flash402_http::server::{FlashPaymentMiddleware, RouteConfig, RouteTable};
use flash402_server::config::ServerConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("server failed: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::load()?;
    if config.pay_to.is_empty() {
        return Err("pay_to is not configured (set it in config.toml or via PAY_TO)".into());
    }
    tracing::info!(
        host = %config.host,
        port = config.port,
        network = %config.network,
        pay_to = %config.pay_to,
        routes = config.routes.len(),
        "loaded configuration"
    );

    let rpc_url: Url = config.rpc_url.parse()?;
    let chain: Arc<dyn ChainClient> = Arc::new(HttpChainClient::new(rpc_url));

    let routes = route_table(&config);
    let app = Router::new()
        .route("/hello/exact", axum::routing::get(hello))
        .route("/random/number", axum::routing::get(random_number))
        .route("/health", axum::routing::get(health))
        .layer(FlashPaymentMiddleware::new(routes, chain));

    let addr = SocketAddr::new(config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shut down gracefully");
    Ok(())
}

/// Prices routes from the config. With no `[routes]` section the two demo
/// routes get default prices.
fn route_table(config: &ServerConfig) -> RouteTable {
    let mut table = RouteTable::new();
    if config.routes.is_empty() {
        for (key, amount, description) in [
            ("GET /hello/exact", "1000", "A paid greeting"),
            ("GET /random/number", "10000", "A paid random number"),
        ] {
            table = table.route(
                key,
                RouteConfig {
                    network: config.network.clone(),
                    max_amount_required: amount.to_owned(),
                    pay_to: config.pay_to.clone(),
                    asset: None,
                    description: Some(description.to_owned()),
                },
            );
        }
        return table;
    }
    for (key, entry) in &config.routes {
        table = table.route(
            key.clone(),
            RouteConfig {
                network: config.network.clone(),
                max_amount_required: entry.max_amount_required.clone(),
                pay_to: config.pay_to.clone(),
                asset: None,
                description: entry.description.clone(),
            },
        );
    }
    table
}

async fn hello() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Hello, world!" }))
}

async fn random_number() -> Json<serde_json::Value> {
    let number: u32 = rand::rng().random_range(1..=1_000_000);
    Json(serde_json::json!({ "number": number }))
}

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
            _ = ctrl_c => tracing::info!("received Ctrl-C, shutting down..."),
            _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down..."),
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.expect("failed to listen for Ctrl-C");
        tracing::info!("received Ctrl-C, shutting down...");
    }
}
