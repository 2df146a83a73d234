//! Registry (CRM) service entry point.
//!
//! Serves the record listing and get-by-id endpoints over the read-only
//! registry documents.

use std::sync::Arc;

use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use nexo_gateway::api;
use nexo_gateway::app_state::RegistryState;
use nexo_gateway::config::RegistryConfig;
use nexo_gateway::contract::{ContractGate, SchemaStore};
use nexo_gateway::domain::RegistryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = RegistryConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting registry service");

    // Build the read-only store and the schema gate
    let store = Arc::new(RegistryStore::load(&config.data_dir)?);
    let gate = ContractGate::new(SchemaStore::new(config.schemas_dir.clone()));
    tracing::info!(records = store.records().len(), "registry documents loaded");

    let state = RegistryState { store, gate };

    // Build router
    let app = api::registry_router()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
