//! The unified response envelope: a closed tagged union of every shape
//! the aggregation service can emit.
//!
//! Serialized as `{"type": <tag>, "data": <body>}`. The unified schema
//! document selects the sub-schema for each `type` tag; the gate in
//! [`crate::contract`] enforces it before any response leaves the service.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::entity::{EntityCard, EntityRecord};
use super::sensor::{Reading, Sensor};

/// A sensor together with the readings selected for it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SensorSummary {
    /// The sensor record.
    pub sensor: Sensor,
    /// Readings selected for this sensor; empty when the readings fetch
    /// was degraded.
    pub lecturas: Vec<Reading>,
}

/// A provider record enriched with its associated sensors.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProviderDetail {
    /// The resolved provider record.
    pub proveedor: EntityRecord,
    /// Sensors whose `id` appears in the provider's
    /// `transacciones_detalladas` set.
    pub sensores_asociados: Vec<Sensor>,
}

/// Every response shape the aggregation service can emit.
///
/// One variant per `type` tag. Adding a shape means adding a variant here
/// and a matching branch to the unified schema document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum UnifiedPayload {
    /// Bulk sensor summary: every sensor with its readings.
    #[serde(rename = "resumen")]
    Resumen(Vec<SensorSummary>),
    /// Summary for a single sensor, readings most recent first.
    #[serde(rename = "resumen_sensor")]
    ResumenSensor(SensorSummary),
    /// Customer listing, narrowed to name and email.
    #[serde(rename = "clientes")]
    Clientes(Vec<EntityCard>),
    /// Provider listing, narrowed to name and email.
    #[serde(rename = "proveedores")]
    Proveedores(Vec<EntityCard>),
    /// Full record for one customer resolved by name.
    #[serde(rename = "cliente_detalle")]
    ClienteDetalle(EntityRecord),
    /// Full record for one provider plus its associated sensors.
    #[serde(rename = "proveedor_detalle_con_sensores")]
    ProveedorDetalleConSensores(ProviderDetail),
}

impl UnifiedPayload {
    /// The wire `type` tag of this variant.
    #[must_use]
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::Resumen(_) => "resumen",
            Self::ResumenSensor(_) => "resumen_sensor",
            Self::Clientes(_) => "clientes",
            Self::Proveedores(_) => "proveedores",
            Self::ClienteDetalle(_) => "cliente_detalle",
            Self::ProveedorDetalleConSensores(_) => "proveedor_detalle_con_sensores",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn envelope_serializes_as_type_and_data() {
        let payload = UnifiedPayload::Resumen(Vec::new());
        let Ok(value) = serde_json::to_value(&payload) else {
            panic!("envelope should serialize");
        };
        assert_eq!(value, serde_json::json!({"type": "resumen", "data": []}));
    }

    #[test]
    fn listing_envelope_carries_projected_cards() {
        let payload = UnifiedPayload::Clientes(vec![EntityCard {
            nombre: "Acme".into(),
            correo_electronico: "ventas@acme.example".into(),
        }]);
        let Ok(value) = serde_json::to_value(&payload) else {
            panic!("envelope should serialize");
        };
        assert_eq!(
            value,
            serde_json::json!({
                "type": "clientes",
                "data": [{"nombre": "Acme", "correo_electronico": "ventas@acme.example"}]
            })
        );
    }

    #[test]
    fn type_tag_matches_serialized_tag() {
        let payload = UnifiedPayload::Proveedores(Vec::new());
        let Ok(value) = serde_json::to_value(&payload) else {
            panic!("envelope should serialize");
        };
        assert_eq!(
            value.get("type").and_then(|t| t.as_str()),
            Some(payload.type_tag())
        );
    }
}
