//! Shared application state injected into Axum handlers.
//!
//! One state struct per service. Stores are built once at startup and
//! shared read-only; the contract gate re-reads its schema documents per
//! validation.

use std::sync::Arc;

use crate::contract::ContractGate;
use crate::domain::{RegistryStore, TelemetryStore};
use crate::service::AggregationService;

/// State for the registry (CRM) service handlers.
#[derive(Debug, Clone)]
pub struct RegistryState {
    /// Record collection loaded at startup.
    pub store: Arc<RegistryStore>,
    /// Schema gate for stored-record validation.
    pub gate: ContractGate,
}

/// State for the sensor (IoT) service handlers.
#[derive(Debug, Clone)]
pub struct SensorState {
    /// Sensor and reading collections loaded at startup.
    pub store: Arc<TelemetryStore>,
    /// Schema gate for stored-record validation.
    pub gate: ContractGate,
}

/// State for the aggregation (unified API) handlers.
#[derive(Debug, Clone)]
pub struct AggregationState {
    /// Composition service owning the upstream clients and the gate.
    pub service: Arc<AggregationService>,
}
