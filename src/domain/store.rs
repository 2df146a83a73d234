//! Read-only JSON document stores.
//!
//! Each service loads its documents once at startup and hands the store to
//! handlers through its `AppState`. Nothing mutates a store after load,
//! which is what makes sharing it across requests safe.

use std::path::Path;

use serde::de::DeserializeOwned;

use super::entity::EntityRecord;
use super::sensor::{Reading, Sensor};
use crate::error::ApiError;

/// Reads and deserializes one JSON document.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] naming the path on read or parse failure.
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, ApiError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ApiError::Internal(format!("error reading {}: {e}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|e| ApiError::Internal(format!("error parsing {}: {e}", path.display())))
}

/// The registry's record collection, loaded from `clientes.json`.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    records: Vec<EntityRecord>,
}

impl RegistryStore {
    /// Loads the registry documents from `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] when the document cannot be read or
    /// parsed.
    pub fn load(data_dir: &Path) -> Result<Self, ApiError> {
        let records = load_json_file(&data_dir.join("clientes.json"))?;
        Ok(Self { records })
    }

    /// Builds a store from records already in memory.
    #[must_use]
    pub fn from_records(records: Vec<EntityRecord>) -> Self {
        Self { records }
    }

    /// All records, in document order.
    #[must_use]
    pub fn records(&self) -> &[EntityRecord] {
        &self.records
    }
}

/// The sensor service's document pair, loaded from `sensores.json` and
/// `lecturas.json`.
#[derive(Debug, Clone)]
pub struct TelemetryStore {
    sensors: Vec<Sensor>,
    readings: Vec<Reading>,
}

impl TelemetryStore {
    /// Loads the sensor and reading documents from `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] when a document cannot be read or
    /// parsed.
    pub fn load(data_dir: &Path) -> Result<Self, ApiError> {
        let sensors = load_json_file(&data_dir.join("sensores.json"))?;
        let readings = load_json_file(&data_dir.join("lecturas.json"))?;
        Ok(Self { sensors, readings })
    }

    /// Builds a store from collections already in memory.
    #[must_use]
    pub fn from_parts(sensors: Vec<Sensor>, readings: Vec<Reading>) -> Self {
        Self { sensors, readings }
    }

    /// All sensors, in document order.
    #[must_use]
    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    /// All readings, in document (insertion) order.
    #[must_use]
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn repo_data_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
    }

    #[test]
    fn registry_documents_load() {
        let Ok(store) = RegistryStore::load(&repo_data_dir()) else {
            panic!("bundled registry documents should load");
        };
        assert!(!store.records().is_empty());
    }

    #[test]
    fn telemetry_documents_load() {
        let Ok(store) = TelemetryStore::load(&repo_data_dir()) else {
            panic!("bundled telemetry documents should load");
        };
        assert!(!store.sensors().is_empty());
        assert!(!store.readings().is_empty());
    }

    #[test]
    fn missing_document_names_the_path() {
        let result = RegistryStore::load(Path::new("/nonexistent"));
        let Err(ApiError::Internal(message)) = result else {
            panic!("missing document should be an internal error");
        };
        assert!(message.contains("clientes.json"));
    }
}
