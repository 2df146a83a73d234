//! REST API layer: route handlers, DTOs, and router composition.
//!
//! One router per service, all mounted at the root path. Each includes
//! the shared `/health` endpoint.

pub mod dto;
pub mod handlers;

use axum::Router;

use crate::app_state::{AggregationState, RegistryState, SensorState};

/// Builds the registry (CRM) service router.
pub fn registry_router() -> Router<RegistryState> {
    Router::new()
        .merge(handlers::registry::routes())
        .merge(handlers::system::routes())
}

/// Builds the sensor (IoT) service router.
pub fn sensor_router() -> Router<SensorState> {
    Router::new()
        .merge(handlers::sensors::routes())
        .merge(handlers::system::routes())
}

/// Builds the aggregation (unified API) service router.
pub fn aggregation_router() -> Router<AggregationState> {
    Router::new()
        .merge(handlers::aggregation::routes())
        .merge(handlers::system::routes())
}
