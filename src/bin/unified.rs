//! Aggregation (unified API) service entry point.
//!
//! Composes the registry and sensor services into schema-validated
//! envelopes.

use std::sync::Arc;
use std::time::Duration;

use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use nexo_gateway::api;
use nexo_gateway::app_state::AggregationState;
use nexo_gateway::config::AggregationConfig;
use nexo_gateway::contract::{ContractGate, SchemaStore};
use nexo_gateway::service::{AggregationService, UpstreamClient};

/// Outer guard for a whole aggregation request; individual upstream
/// calls are bounded by the configured upstream timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = AggregationConfig::from_env()?;
    tracing::info!(
        addr = %config.listen_addr,
        crm = %config.crm_url,
        iot = %config.iot_url,
        "starting aggregation service"
    );

    // Build upstream clients and the composition service
    let crm = UpstreamClient::new(config.crm_url.clone(), config.upstream_timeout)?;
    let iot = UpstreamClient::new(config.iot_url.clone(), config.upstream_timeout)?;
    let gate = ContractGate::new(SchemaStore::new(config.schemas_dir.clone()));
    let service = Arc::new(AggregationService::new(crm, iot, gate));

    let state = AggregationState { service };

    // Build router
    let app = api::aggregation_router()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(TimeoutLayer::new(REQUEST_TIMEOUT)),
        )
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
