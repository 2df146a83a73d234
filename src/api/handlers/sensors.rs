//! Sensor (IoT) handlers: sensor listing and readings queries.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{
    ReadingListParams, ReadingListResponse, SensorListParams, SensorListResponse,
};
use crate::app_state::SensorState;
use crate::contract::SchemaDoc;
use crate::error::{ApiError, ErrorDetail};
use crate::service::sensor_service::{self, ReadingQuery, SensorFilter};

/// `GET /sensores` — List sensors filtered by kind and location.
///
/// Both filters are exact, case-sensitive, with AND semantics. Every
/// returned sensor is validated against the sensor schema (fail-closed).
///
/// # Errors
///
/// Returns [`ApiError::DataIntegrity`] when a matched sensor violates
/// its schema.
#[utoipa::path(
    get,
    path = "/sensores",
    tag = "Sensores",
    summary = "List sensors",
    params(SensorListParams),
    responses(
        (status = 200, description = "Matched sensors; an empty set is valid", body = SensorListResponse),
        (status = 500, description = "Stored sensor violates its schema", body = ErrorDetail),
    )
)]
pub async fn list_sensores(
    State(state): State<SensorState>,
    Query(params): Query<SensorListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = SensorFilter {
        tipo: params.tipo.clone(),
        ubicacion_id: params.ubicacion_id.clone(),
    };
    let matched = sensor_service::filter_sensors(state.store.sensors(), &filter);
    state.gate.validate_records(SchemaDoc::Sensor, &matched)?;

    Ok(Json(SensorListResponse {
        status: "success".to_string(),
        message: "Sensores recuperados correctamente".to_string(),
        params,
        total: matched.len(),
        sensores: matched.into_iter().cloned().collect(),
    }))
}

/// `GET /lecturas` — Query readings by sensor, location, and time range.
///
/// `total` counts the filtered set; the body is truncated to `limit`.
/// Every returned reading is validated against the reading schema
/// (fail-closed).
///
/// # Errors
///
/// Returns [`ApiError::InvalidParameter`] for an out-of-range `limit`,
/// malformed bounds, or `from` later than `to`;
/// [`ApiError::DataIntegrity`] for an unparseable stored timestamp or a
/// non-conforming reading.
#[utoipa::path(
    get,
    path = "/lecturas",
    tag = "Sensores",
    summary = "Query readings",
    params(ReadingListParams),
    responses(
        (status = 200, description = "Filtered readings, truncated to `limit`", body = ReadingListResponse),
        (status = 400, description = "Malformed or out-of-range query parameter", body = ErrorDetail),
        (status = 500, description = "Data-integrity fault in the stored readings", body = ErrorDetail),
    )
)]
pub async fn list_lecturas(
    State(state): State<SensorState>,
    Query(params): Query<ReadingListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = ReadingQuery {
        sensor_id: params.sensor_id.clone(),
        ubicacion_id: params.ubicacion_id.clone(),
        from: params.from.clone(),
        to: params.to.clone(),
        limit: params.limit,
    };
    let slice = sensor_service::filter_readings(state.store.sensors(), state.store.readings(), &query)?;
    state.gate.validate_records(SchemaDoc::Reading, &slice.readings)?;

    Ok(Json(ReadingListResponse {
        status: "success".to_string(),
        message: "Lecturas recuperadas correctamente".to_string(),
        params,
        total: slice.total,
        lecturas: slice.readings.into_iter().cloned().collect(),
    }))
}

/// Sensor service routes.
pub fn routes() -> Router<SensorState> {
    Router::new()
        .route("/sensores", get(list_sensores))
        .route("/lecturas", get(list_lecturas))
}
