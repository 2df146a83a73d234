//! DTOs for the registry (CRM) endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::EntityRecord;

/// Query parameters for `GET /clientes`.
///
/// Bounds are checked by the handler, not clamped: out-of-range values
/// are client errors.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct RegistryListParams {
    /// Free-text search over name and email, case-insensitive.
    pub q: Option<String>,
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Page size (1 to 100). Defaults to 25.
    #[serde(rename = "pageSize", default = "default_page_size")]
    pub page_size: i64,
    /// Exact-match location filter against `direccion`.
    #[serde(rename = "ubicacionId")]
    pub ubicacion_id: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    25
}

/// Response body for `GET /clientes`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegistryListResponse {
    /// Size of the filtered set, before pagination.
    pub total: usize,
    /// Echo of the requested page number.
    pub page: u32,
    /// Echo of the requested page size.
    #[serde(rename = "pageSize")]
    pub page_size: u32,
    /// Records on this page.
    pub data: Vec<EntityRecord>,
}
