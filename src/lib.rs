//! # nexo-gateway
//!
//! Unified REST gateway merging a CRM registry and an IoT telemetry
//! service behind one schema-validated API.
//!
//! Three services live in this crate, composed over HTTP: the registry
//! service owns customer/provider records, the sensor service owns
//! sensor metadata and readings, and the aggregation service joins both
//! into tagged envelopes that must pass the unified schema contract
//! before leaving the boundary.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── Aggregation Service (bin/unified) ──► UpstreamClient ──┐
//!     │       AggregationService (service/)                      │
//!     │       ContractGate (contract/)                           │
//!     │                                                          ▼
//!     ├── Registry Service (bin/crm) ◄───────────────────── HTTP calls
//!     │       registry_service (service/) + RegistryStore        │
//!     │                                                          ▼
//!     └── Sensor Service (bin/iot) ◄──────────────────────── HTTP calls
//!             sensor_service (service/) + TelemetryStore
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod contract;
pub mod domain;
pub mod error;
pub mod service;
