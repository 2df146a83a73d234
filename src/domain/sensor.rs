//! Sensor and reading records owned by the IoT service.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An IoT sensor tied to a location.
///
/// Older documents spell the identifier `id_sensor`; the alias is accepted
/// on input and normalized to `id` everywhere downstream.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Sensor {
    /// Sensor identifier.
    #[serde(alias = "id_sensor")]
    pub id: String,
    /// Sensor kind (e.g. `temperatura`, `humedad`).
    pub tipo: String,
    /// Location identifier the sensor is installed at.
    pub ubicacion: String,
}

/// A single timestamped measurement belonging to one sensor.
///
/// `timestamp` is kept as the stored ISO-8601 text and parsed on demand:
/// a malformed stored value must surface as a data-integrity fault at the
/// comparison that needs it, not as a load failure.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Reading {
    /// Reading identifier, used to name offending rows in fault messages.
    pub id_lectura: String,
    /// Identifier of the owning sensor.
    pub id_sensor: String,
    /// ISO-8601 instant the measurement was taken at.
    pub timestamp: String,
    /// Measured value.
    pub valor: f64,
    /// Measurement unit, when the sensor reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unidad: Option<String>,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn legacy_id_sensor_alias_is_accepted() {
        let json = r#"{"id_sensor": "s1", "tipo": "temperatura", "ubicacion": "u1"}"#;
        let Ok(sensor) = serde_json::from_str::<Sensor>(json) else {
            panic!("legacy document should deserialize");
        };
        assert_eq!(sensor.id, "s1");
    }

    #[test]
    fn serialization_normalizes_to_id() {
        let sensor = Sensor {
            id: "s1".into(),
            tipo: "temperatura".into(),
            ubicacion: "u1".into(),
        };
        let Ok(value) = serde_json::to_value(&sensor) else {
            panic!("sensor should serialize");
        };
        assert!(value.get("id").is_some());
        assert!(value.get("id_sensor").is_none());
    }
}
