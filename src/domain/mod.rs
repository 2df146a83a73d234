//! Domain layer: records, the unified envelope, and read-only stores.
//!
//! This module contains the data model shared by the three services:
//! registry entities, sensors and readings, the tagged response envelope,
//! instant parsing, and the startup-loaded document stores.

pub mod entity;
pub mod envelope;
pub mod instant;
pub mod sensor;
pub mod store;

pub use entity::{EntityCard, EntityKind, EntityRecord};
pub use envelope::{ProviderDetail, SensorSummary, UnifiedPayload};
pub use sensor::{Reading, Sensor};
pub use store::{RegistryStore, TelemetryStore};
