//! Aggregation composition: joins the registry and sensor services into
//! unified envelopes and enforces the per-endpoint failure policy.
//!
//! Failure policy in one place: calls whose result is the primary data of
//! an endpoint propagate upstream failures; supplementary enrichment calls
//! degrade to an empty contribution instead. Every composed envelope goes
//! through the contract gate before it is returned.

use futures_util::future::join_all;
use serde::Deserialize;

use crate::contract::ContractGate;
use crate::domain::instant::parse_instant;
use crate::domain::{
    EntityCard, EntityKind, EntityRecord, ProviderDetail, Reading, Sensor, SensorSummary,
    UnifiedPayload,
};
use crate::error::ApiError;
use crate::service::upstream::UpstreamClient;

/// Upstream page size used when walking the full registry.
const REGISTRY_PAGE_SIZE: u32 = 100;

/// Readings cap requested per sensor; the sensor service's maximum.
const READINGS_FETCH_LIMIT: u32 = 1000;

/// Minimal view of the sensor service's listing envelope.
#[derive(Debug, Deserialize)]
struct SensorListView {
    sensores: Vec<Sensor>,
}

/// Minimal view of the sensor service's readings envelope.
#[derive(Debug, Deserialize)]
struct ReadingListView {
    lecturas: Vec<Reading>,
}

/// Minimal view of one registry listing page.
#[derive(Debug, Deserialize)]
struct RegistryPageView {
    total: usize,
    data: Vec<EntityRecord>,
}

/// Composes unified responses from the two upstream services.
#[derive(Debug, Clone)]
pub struct AggregationService {
    crm: UpstreamClient,
    iot: UpstreamClient,
    gate: ContractGate,
}

impl AggregationService {
    /// Creates the service over its two upstream clients and the gate.
    #[must_use]
    pub fn new(crm: UpstreamClient, iot: UpstreamClient, gate: ContractGate) -> Self {
        Self { crm, iot, gate }
    }

    /// Builds the bulk sensor summary (`type = resumen`).
    ///
    /// A failed sensor listing degrades to an empty summary; a failed
    /// per-sensor readings fetch degrades that sensor's readings to empty.
    /// Per-sensor fetches run concurrently; each result is accumulated
    /// independently.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ContractViolation`] when the composed envelope
    /// does not conform to the unified schema.
    pub async fn sensor_summary(&self) -> Result<UnifiedPayload, ApiError> {
        let sensors = match self.fetch_sensors().await {
            Ok(sensors) => sensors,
            Err(e) => {
                tracing::warn!(upstream = self.iot.base_url(), error = %e, "sensor listing degraded to empty");
                Vec::new()
            }
        };

        let entries = join_all(sensors.into_iter().map(|sensor| async move {
            let lecturas = match self.fetch_readings(&sensor.id).await {
                Ok(readings) => readings,
                Err(e) => {
                    tracing::warn!(sensor = %sensor.id, error = %e, "readings degraded to empty");
                    Vec::new()
                }
            };
            SensorSummary { sensor, lecturas }
        }))
        .await;

        let payload = UnifiedPayload::Resumen(entries);
        self.gate.validate_envelope(&payload)?;
        Ok(payload)
    }

    /// Builds the single-sensor summary (`type = resumen_sensor`):
    /// readings sorted most recent first, truncated to `q` (1–100).
    ///
    /// Unlike the bulk summary, an unknown sensor is a not-found error,
    /// and upstream failures propagate: both calls are the primary data
    /// of this endpoint.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidParameter`] for `q` outside `[1, 100]`,
    ///   checked before any upstream call.
    /// - [`ApiError::NotFound`] when no sensor matches `sensor_id`.
    /// - Upstream failures from either fetch.
    /// - [`ApiError::ContractViolation`] from the gate.
    pub async fn sensor_summary_for(
        &self,
        sensor_id: &str,
        q: i64,
    ) -> Result<UnifiedPayload, ApiError> {
        if !(1..=100).contains(&q) {
            return Err(ApiError::InvalidParameter(
                "'q' must be an integer between 1 and 100".to_string(),
            ));
        }

        let sensor = self
            .fetch_sensors()
            .await?
            .into_iter()
            .find(|s| s.id == sensor_id)
            .ok_or_else(|| ApiError::NotFound(format!("sensor '{sensor_id}' not found")))?;

        let mut lecturas = sort_readings_desc(self.fetch_readings(sensor_id).await?);
        #[allow(clippy::cast_sign_loss)]
        lecturas.truncate(q as usize);

        let payload = UnifiedPayload::ResumenSensor(SensorSummary { sensor, lecturas });
        self.gate.validate_envelope(&payload)?;
        Ok(payload)
    }

    /// Builds a typed entity listing (`type = clientes` or `proveedores`),
    /// narrowing each match to name and email.
    ///
    /// # Errors
    ///
    /// Propagates registry failures (the registry is the primary source
    /// here) and gate violations.
    pub async fn entity_listing(&self, kind: EntityKind) -> Result<UnifiedPayload, ApiError> {
        let records = self.fetch_all_records().await?;
        let cards: Vec<EntityCard> = records
            .iter()
            .filter(|r| r.kind() == Some(kind))
            .map(EntityCard::from)
            .collect();

        let payload = match kind {
            EntityKind::Cliente => UnifiedPayload::Clientes(cards),
            EntityKind::Proveedor => UnifiedPayload::Proveedores(cards),
        };
        self.gate.validate_envelope(&payload)?;
        Ok(payload)
    }

    /// Resolves one customer by name (`type = cliente_detalle`).
    /// Case-insensitive exact match; first match wins.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] when no record matches; registry failures
    /// propagate; gate violations.
    pub async fn customer_detail(&self, nombre: &str) -> Result<UnifiedPayload, ApiError> {
        let records = self.fetch_all_records().await?;
        let record = records
            .into_iter()
            .find(|r| r.name_matches(nombre))
            .ok_or_else(|| ApiError::NotFound(format!("cliente '{nombre}' not found")))?;

        let payload = UnifiedPayload::ClienteDetalle(record);
        self.gate.validate_envelope(&payload)?;
        Ok(payload)
    }

    /// Resolves one provider by name and enriches it with its associated
    /// sensors (`type = proveedor_detalle_con_sensores`).
    ///
    /// The association is a membership join: sensor `id` against the
    /// provider's `transacciones_detalladas` set, independent of sensor
    /// location. The sensor fetch is supplementary enrichment and
    /// degrades to an empty association on upstream failure; the registry
    /// fetch is mandatory.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] when no provider matches; registry failures
    /// propagate; gate violations.
    pub async fn provider_detail_with_sensors(
        &self,
        nombre: &str,
    ) -> Result<UnifiedPayload, ApiError> {
        let records = self.fetch_all_records().await?;
        let proveedor = records
            .into_iter()
            .find(|r| r.kind() == Some(EntityKind::Proveedor) && r.name_matches(nombre))
            .ok_or_else(|| ApiError::NotFound(format!("proveedor '{nombre}' not found")))?;

        let sensors = match self.fetch_sensors().await {
            Ok(sensors) => sensors,
            Err(e) => {
                tracing::warn!(upstream = self.iot.base_url(), error = %e, "sensor association degraded to empty");
                Vec::new()
            }
        };
        let sensores_asociados: Vec<Sensor> = sensors
            .into_iter()
            .filter(|s| proveedor.transacciones_detalladas.contains(&s.id))
            .collect();

        let payload = UnifiedPayload::ProveedorDetalleConSensores(ProviderDetail {
            proveedor,
            sensores_asociados,
        });
        self.gate.validate_envelope(&payload)?;
        Ok(payload)
    }

    /// Lists every sensor from the sensor service.
    async fn fetch_sensors(&self) -> Result<Vec<Sensor>, ApiError> {
        let view: SensorListView = self.iot.get_json("/sensores", &[]).await?;
        Ok(view.sensores)
    }

    /// Fetches readings for one sensor, capped at the service maximum.
    async fn fetch_readings(&self, sensor_id: &str) -> Result<Vec<Reading>, ApiError> {
        let view: ReadingListView = self
            .iot
            .get_json(
                "/lecturas",
                &[
                    ("sensorId", sensor_id.to_string()),
                    ("limit", READINGS_FETCH_LIMIT.to_string()),
                ],
            )
            .await?;
        Ok(view.lecturas)
    }

    /// Walks the registry listing page by page until `total` is covered.
    async fn fetch_all_records(&self) -> Result<Vec<EntityRecord>, ApiError> {
        let mut records: Vec<EntityRecord> = Vec::new();
        let mut page: u32 = 1;
        loop {
            let view: RegistryPageView = self
                .crm
                .get_json(
                    "/clientes",
                    &[
                        ("page", page.to_string()),
                        ("pageSize", REGISTRY_PAGE_SIZE.to_string()),
                    ],
                )
                .await?;
            let batch = view.data.len();
            records.extend(view.data);
            if batch == 0 || records.len() >= view.total {
                return Ok(records);
            }
            page = page.saturating_add(1);
        }
    }
}

/// Sorts readings by parsed timestamp, most recent first.
///
/// If any timestamp fails to parse the whole operation falls back to the
/// original (unsorted) order; a partial sort is never attempted and the
/// request is never aborted over it.
fn sort_readings_desc(readings: Vec<Reading>) -> Vec<Reading> {
    let keys: Result<Vec<_>, _> = readings
        .iter()
        .map(|r| parse_instant(&r.timestamp))
        .collect();
    match keys {
        Ok(keys) => {
            let mut keyed: Vec<_> = keys.into_iter().zip(readings).collect();
            keyed.sort_by(|a, b| b.0.cmp(&a.0));
            keyed.into_iter().map(|(_, reading)| reading).collect()
        }
        Err(_) => readings,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::api;
    use crate::app_state::{RegistryState, SensorState};
    use crate::contract::SchemaStore;
    use crate::domain::{RegistryStore, TelemetryStore};
    use std::net::SocketAddr;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;

    const TEST_TIMEOUT: Duration = Duration::from_secs(2);

    fn schemas_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("schemas")
    }

    fn gate() -> ContractGate {
        ContractGate::new(SchemaStore::new(schemas_dir()))
    }

    fn reading(id: &str, sensor_id: &str, timestamp: &str) -> Reading {
        Reading {
            id_lectura: id.into(),
            id_sensor: sensor_id.into(),
            timestamp: timestamp.into(),
            valor: 21.0,
            unidad: Some("C".into()),
        }
    }

    fn sensor(id: &str) -> Sensor {
        Sensor {
            id: id.into(),
            tipo: "temperatura".into(),
            ubicacion: "u1".into(),
        }
    }

    fn registry_fixture() -> Vec<EntityRecord> {
        vec![
            EntityRecord {
                id: "1".into(),
                nombre: "Acme".into(),
                correo_electronico: "ventas@acme.example".into(),
                tipo: "proveedor".into(),
                direccion: "u1".into(),
                transacciones_detalladas: vec!["s1".into(), "s2".into()],
            },
            EntityRecord {
                id: "2".into(),
                nombre: "Beta SL".into(),
                correo_electronico: "info@beta.example".into(),
                tipo: "cliente".into(),
                direccion: "u2".into(),
                transacciones_detalladas: Vec::new(),
            },
            EntityRecord {
                id: "3".into(),
                nombre: "Gamma".into(),
                correo_electronico: "gamma@gamma.example".into(),
                tipo: "partner".into(),
                direccion: "u1".into(),
                transacciones_detalladas: Vec::new(),
            },
        ]
    }

    fn telemetry_fixture() -> TelemetryStore {
        TelemetryStore::from_parts(
            vec![sensor("s1"), sensor("s2"), sensor("s3")],
            vec![
                reading("l1", "s1", "2025-11-20T08:00:00Z"),
                reading("l2", "s1", "2025-11-20T10:00:00Z"),
                reading("l3", "s1", "2025-11-20T09:00:00Z"),
                reading("l4", "s2", "2025-11-20T11:00:00Z"),
            ],
        )
    }

    async fn spawn(router: axum::Router) -> SocketAddr {
        let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
            panic!("ephemeral bind should succeed");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("listener should report its address");
        };
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        addr
    }

    async fn spawn_registry() -> SocketAddr {
        let state = RegistryState {
            store: Arc::new(RegistryStore::from_records(registry_fixture())),
            gate: gate(),
        };
        spawn(api::registry_router().with_state(state)).await
    }

    async fn spawn_sensors() -> SocketAddr {
        let state = SensorState {
            store: Arc::new(telemetry_fixture()),
            gate: gate(),
        };
        spawn(api::sensor_router().with_state(state)).await
    }

    fn service(crm: Option<SocketAddr>, iot: Option<SocketAddr>) -> AggregationService {
        // Port 1 is reserved and closed; calls against it fail fast.
        let crm_url = crm.map_or_else(|| "http://127.0.0.1:1".to_string(), |a| format!("http://{a}"));
        let iot_url = iot.map_or_else(|| "http://127.0.0.1:1".to_string(), |a| format!("http://{a}"));
        let Ok(crm) = UpstreamClient::new(crm_url, TEST_TIMEOUT) else {
            panic!("crm client should build");
        };
        let Ok(iot) = UpstreamClient::new(iot_url, TEST_TIMEOUT) else {
            panic!("iot client should build");
        };
        AggregationService::new(crm, iot, gate())
    }

    #[test]
    fn sort_is_descending_when_all_timestamps_parse() {
        let sorted = sort_readings_desc(vec![
            reading("l1", "s1", "2025-11-20T08:00:00Z"),
            reading("l2", "s1", "2025-11-20T10:00:00Z"),
            reading("l3", "s1", "2025-11-20T09:00:00Z"),
        ]);
        let ids: Vec<&str> = sorted.iter().map(|r| r.id_lectura.as_str()).collect();
        assert_eq!(ids, vec!["l2", "l3", "l1"]);
    }

    #[test]
    fn sort_falls_back_to_stored_order_on_any_malformed_timestamp() {
        let sorted = sort_readings_desc(vec![
            reading("l1", "s1", "2025-11-20T08:00:00Z"),
            reading("l2", "s1", "no es una fecha"),
            reading("l3", "s1", "2025-11-20T09:00:00Z"),
        ]);
        let ids: Vec<&str> = sorted.iter().map(|r| r.id_lectura.as_str()).collect();
        assert_eq!(ids, vec!["l1", "l2", "l3"]);
    }

    #[tokio::test]
    async fn resumen_degrades_to_empty_when_sensor_service_is_down() {
        let service = service(None, None);
        let Ok(payload) = service.sensor_summary().await else {
            panic!("summary must not fail on a down upstream");
        };
        let Ok(value) = serde_json::to_value(&payload) else {
            panic!("payload should serialize");
        };
        assert_eq!(value, serde_json::json!({"type": "resumen", "data": []}));
    }

    #[tokio::test]
    async fn resumen_collects_readings_per_sensor() {
        let iot = spawn_sensors().await;
        let service = service(None, Some(iot));
        let Ok(UnifiedPayload::Resumen(entries)) = service.sensor_summary().await else {
            panic!("summary should compose");
        };
        assert_eq!(entries.len(), 3);
        let by_sensor: Vec<(&str, usize)> = entries
            .iter()
            .map(|e| (e.sensor.id.as_str(), e.lecturas.len()))
            .collect();
        assert!(by_sensor.contains(&("s1", 3)));
        assert!(by_sensor.contains(&("s2", 1)));
        assert!(by_sensor.contains(&("s3", 0)));
    }

    #[tokio::test]
    async fn per_sensor_summary_sorts_descending_and_truncates() {
        let iot = spawn_sensors().await;
        let service = service(None, Some(iot));
        let Ok(UnifiedPayload::ResumenSensor(summary)) =
            service.sensor_summary_for("s1", 2).await
        else {
            panic!("per-sensor summary should compose");
        };
        let ids: Vec<&str> = summary.lecturas.iter().map(|r| r.id_lectura.as_str()).collect();
        assert_eq!(ids, vec!["l2", "l3"]);
    }

    #[tokio::test]
    async fn per_sensor_summary_unknown_sensor_is_not_found() {
        let iot = spawn_sensors().await;
        let service = service(None, Some(iot));
        let result = service.sensor_summary_for("s99", 10).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn per_sensor_summary_q_is_checked_before_any_upstream_call() {
        // Both upstreams are down; an out-of-range q must still be the
        // reported failure.
        let service = service(None, None);
        for q in [0, -3, 101] {
            let result = service.sensor_summary_for("s1", q).await;
            assert!(matches!(result, Err(ApiError::InvalidParameter(_))));
        }
    }

    #[tokio::test]
    async fn listing_projects_typed_records_to_cards() {
        let crm = spawn_registry().await;
        let service = service(Some(crm), None);
        let Ok(UnifiedPayload::Clientes(cards)) =
            service.entity_listing(EntityKind::Cliente).await
        else {
            panic!("listing should compose");
        };
        // The unrecognized "partner" record drops out of typed views.
        assert_eq!(cards.len(), 1);
        assert_eq!(
            cards.first().map(|c| c.nombre.as_str()),
            Some("Beta SL")
        );
    }

    #[tokio::test]
    async fn listing_fails_when_registry_is_down() {
        let service = service(None, None);
        let result = service.entity_listing(EntityKind::Cliente).await;
        let Err(err) = result else {
            panic!("registry is mandatory for listings");
        };
        assert!(err.is_upstream_failure());
    }

    #[tokio::test]
    async fn customer_detail_matches_name_case_insensitively() {
        let crm = spawn_registry().await;
        let service = service(Some(crm), None);
        let Ok(UnifiedPayload::ClienteDetalle(record)) =
            service.customer_detail("beta sl").await
        else {
            panic!("detail should resolve");
        };
        assert_eq!(record.id, "2");
    }

    #[tokio::test]
    async fn customer_detail_unknown_name_is_not_found() {
        let crm = spawn_registry().await;
        let service = service(Some(crm), None);
        let result = service.customer_detail("Omega").await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn provider_detail_joins_sensors_by_membership() {
        let crm = spawn_registry().await;
        let iot = spawn_sensors().await;
        let service = service(Some(crm), Some(iot));
        let Ok(UnifiedPayload::ProveedorDetalleConSensores(detail)) =
            service.provider_detail_with_sensors("Acme").await
        else {
            panic!("provider detail should compose");
        };
        let ids: Vec<&str> = detail
            .sensores_asociados
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["s1", "s2"]);
    }

    #[tokio::test]
    async fn provider_detail_requires_provider_tipo() {
        let crm = spawn_registry().await;
        let iot = spawn_sensors().await;
        let service = service(Some(crm), Some(iot));
        // "Beta SL" exists but is a cliente.
        let result = service.provider_detail_with_sensors("Beta SL").await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn provider_detail_degrades_sensor_association_when_iot_is_down() {
        let crm = spawn_registry().await;
        let service = service(Some(crm), None);
        let Ok(UnifiedPayload::ProveedorDetalleConSensores(detail)) =
            service.provider_detail_with_sensors("Acme").await
        else {
            panic!("provider detail must tolerate a down sensor service");
        };
        assert!(detail.sensores_asociados.is_empty());
    }
}
