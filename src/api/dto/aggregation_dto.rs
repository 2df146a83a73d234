//! DTOs for the aggregation (unified API) endpoints.
//!
//! Response bodies are [`crate::domain::UnifiedPayload`] envelopes; only
//! the query parameters live here.

use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters for `GET /resumen/{sensorId}`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct SummaryParams {
    /// Number of most-recent readings to return (1 to 100). Defaults
    /// to 10.
    #[serde(default = "default_q")]
    pub q: i64,
}

fn default_q() -> i64 {
    10
}
