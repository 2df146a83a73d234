//! Registry (CRM) handlers: list with search and pagination, get by id.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{RegistryListParams, RegistryListResponse};
use crate::app_state::RegistryState;
use crate::contract::SchemaDoc;
use crate::domain::EntityRecord;
use crate::error::{ApiError, ErrorDetail};
use crate::service::registry_service::{self, RegistrySearch};

/// `GET /clientes` — List records with search, location filter, and
/// pagination.
///
/// Every record on the returned page is validated against the entity
/// schema (strict mode) before the response is built.
///
/// # Errors
///
/// Returns [`ApiError`] on out-of-range pagination or a non-conforming
/// stored record.
#[utoipa::path(
    get,
    path = "/clientes",
    tag = "Clientes",
    summary = "List registry records",
    description = "Returns one page of records. `q` searches name and email case-insensitively; `ubicacionId` filters by location; `total` counts the filtered set.",
    params(RegistryListParams),
    responses(
        (status = 200, description = "One page of the filtered set", body = RegistryListResponse),
        (status = 400, description = "Out-of-range pagination parameter", body = ErrorDetail),
        (status = 500, description = "Stored record violates its schema", body = ErrorDetail),
    )
)]
pub async fn list_clientes(
    State(state): State<RegistryState>,
    Query(params): Query<RegistryListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (page, page_size) = registry_service::validate_pagination(params.page, params.page_size)?;

    let search = RegistrySearch {
        q: params.q,
        ubicacion_id: params.ubicacion_id,
        page,
        page_size,
    };
    let result = registry_service::search(state.store.records(), &search);
    state.gate.validate_records(SchemaDoc::Entity, &result.records)?;

    Ok(Json(RegistryListResponse {
        total: result.total,
        page: result.page,
        page_size: result.page_size,
        data: result.records.into_iter().cloned().collect(),
    }))
}

/// `GET /clientes/{id}` — Get a single record by id.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] when no record matches, or a server
/// error when the stored record violates its schema.
#[utoipa::path(
    get,
    path = "/clientes/{id}",
    tag = "Clientes",
    summary = "Get one registry record",
    params(
        ("id" = String, Path, description = "Record identifier"),
    ),
    responses(
        (status = 200, description = "The matching record", body = EntityRecord),
        (status = 404, description = "No record with this id", body = ErrorDetail),
        (status = 500, description = "Stored record violates its schema", body = ErrorDetail),
    )
)]
pub async fn get_cliente(
    State(state): State<RegistryState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let record = registry_service::find_by_id(state.store.records(), &id)
        .ok_or_else(|| ApiError::NotFound(format!("cliente '{id}' not found")))?;
    state.gate.validate_records(SchemaDoc::Entity, &[record])?;
    Ok(Json(record.clone()))
}

/// Registry routes.
pub fn routes() -> Router<RegistryState> {
    Router::new()
        .route("/clientes", get(list_clientes))
        .route("/clientes/{id}", get(get_cliente))
}
