//! Sensor (IoT) service entry point.
//!
//! Serves the sensor listing and readings query endpoints over the
//! read-only telemetry documents.

use std::sync::Arc;

use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use nexo_gateway::api;
use nexo_gateway::app_state::SensorState;
use nexo_gateway::config::SensorConfig;
use nexo_gateway::contract::{ContractGate, SchemaStore};
use nexo_gateway::domain::TelemetryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = SensorConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting sensor service");

    // Build the read-only store and the schema gate
    let store = Arc::new(TelemetryStore::load(&config.data_dir)?);
    let gate = ContractGate::new(SchemaStore::new(config.schemas_dir.clone()));
    tracing::info!(
        sensors = store.sensors().len(),
        readings = store.readings().len(),
        "telemetry documents loaded"
    );

    let state = SensorState { store, gate };

    // Build router
    let app = api::sensor_router()
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
