//! Aggregation (unified API) handlers.
//!
//! Thin wrappers over [`crate::service::AggregationService`]; every body
//! returned here has already passed the contract gate.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::SummaryParams;
use crate::app_state::AggregationState;
use crate::domain::EntityKind;
use crate::error::{ApiError, ErrorDetail};

/// `GET /resumen` — Bulk sensor summary.
///
/// Upstream failures degrade to empty contributions; the response is
/// always a well-formed `resumen` envelope.
///
/// # Errors
///
/// Returns [`ApiError::ContractViolation`] when the composed envelope
/// fails the unified schema.
#[utoipa::path(
    get,
    path = "/resumen",
    tag = "Unificada",
    summary = "Summary of every sensor with its readings",
    responses(
        (status = 200, description = "`resumen` envelope", body = serde_json::Value),
        (status = 500, description = "Composed envelope failed the unified schema", body = ErrorDetail),
    )
)]
pub async fn resumen(State(state): State<AggregationState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.service.sensor_summary().await?))
}

/// `GET /resumen/{sensorId}` — Most recent readings for one sensor.
///
/// # Errors
///
/// Returns [`ApiError::InvalidParameter`] for `q` outside `[1, 100]`,
/// [`ApiError::NotFound`] for an unknown sensor, and upstream or
/// contract failures otherwise.
#[utoipa::path(
    get,
    path = "/resumen/{sensorId}",
    tag = "Unificada",
    summary = "Most recent readings for one sensor",
    params(
        ("sensorId" = String, Path, description = "Sensor identifier"),
        SummaryParams,
    ),
    responses(
        (status = 200, description = "`resumen_sensor` envelope", body = serde_json::Value),
        (status = 400, description = "`q` outside [1, 100]", body = ErrorDetail),
        (status = 404, description = "Unknown sensor", body = ErrorDetail),
    )
)]
pub async fn resumen_sensor(
    State(state): State<AggregationState>,
    Path(sensor_id): Path<String>,
    Query(params): Query<SummaryParams>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(
        state.service.sensor_summary_for(&sensor_id, params.q).await?,
    ))
}

/// `GET /clientes` — Customer listing narrowed to name and email.
///
/// # Errors
///
/// Propagates registry failures and contract violations.
#[utoipa::path(
    get,
    path = "/clientes",
    tag = "Unificada",
    summary = "Customer listing",
    responses(
        (status = 200, description = "`clientes` envelope", body = serde_json::Value),
        (status = 502, description = "Registry unavailable", body = ErrorDetail),
    )
)]
pub async fn clientes(State(state): State<AggregationState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.service.entity_listing(EntityKind::Cliente).await?))
}

/// `GET /proveedores` — Provider listing narrowed to name and email.
///
/// # Errors
///
/// Propagates registry failures and contract violations.
#[utoipa::path(
    get,
    path = "/proveedores",
    tag = "Unificada",
    summary = "Provider listing",
    responses(
        (status = 200, description = "`proveedores` envelope", body = serde_json::Value),
        (status = 502, description = "Registry unavailable", body = ErrorDetail),
    )
)]
pub async fn proveedores(
    State(state): State<AggregationState>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(
        state.service.entity_listing(EntityKind::Proveedor).await?,
    ))
}

/// `GET /clientes/detalles/{nombre}` — Full record for one customer,
/// resolved by case-insensitive name match (first match wins).
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] when no record matches; propagates
/// registry and contract failures.
#[utoipa::path(
    get,
    path = "/clientes/detalles/{nombre}",
    tag = "Unificada",
    summary = "Customer detail by name",
    params(
        ("nombre" = String, Path, description = "Record name, matched ignoring case"),
    ),
    responses(
        (status = 200, description = "`cliente_detalle` envelope", body = serde_json::Value),
        (status = 404, description = "No record with this name", body = ErrorDetail),
    )
)]
pub async fn cliente_detalle(
    State(state): State<AggregationState>,
    Path(nombre): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.service.customer_detail(&nombre).await?))
}

/// `GET /proveedores/detalles/{nombre}` — Provider detail enriched with
/// its associated sensors.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] when no provider matches; propagates
/// registry and contract failures. A failed sensor fetch degrades the
/// association to empty instead of failing.
#[utoipa::path(
    get,
    path = "/proveedores/detalles/{nombre}",
    tag = "Unificada",
    summary = "Provider detail with associated sensors",
    params(
        ("nombre" = String, Path, description = "Provider name, matched ignoring case"),
    ),
    responses(
        (status = 200, description = "`proveedor_detalle_con_sensores` envelope", body = serde_json::Value),
        (status = 404, description = "No provider with this name", body = ErrorDetail),
    )
)]
pub async fn proveedor_detalle(
    State(state): State<AggregationState>,
    Path(nombre): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(
        state.service.provider_detail_with_sensors(&nombre).await?,
    ))
}

/// Aggregation routes.
pub fn routes() -> Router<AggregationState> {
    Router::new()
        .route("/resumen", get(resumen))
        .route("/resumen/{sensorId}", get(resumen_sensor))
        .route("/clientes", get(clientes))
        .route("/clientes/detalles/{nombre}", get(cliente_detalle))
        .route("/proveedores", get(proveedores))
        .route("/proveedores/detalles/{nombre}", get(proveedor_detalle))
}
