//! DTOs for the sensor (IoT) endpoints.
//!
//! List responses carry a `status`/`message`/`params` envelope echoing
//! the received query, plus the filtered-set `total`.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Reading, Sensor};

/// Query parameters for `GET /sensores`. Exact, case-sensitive matches.
#[derive(Debug, Clone, Serialize, Deserialize, IntoParams, ToSchema)]
pub struct SensorListParams {
    /// Sensor kind filter.
    pub tipo: Option<String>,
    /// Location filter.
    #[serde(rename = "ubicacionId")]
    pub ubicacion_id: Option<String>,
}

/// Response body for `GET /sensores`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SensorListResponse {
    /// Always `"success"` for a delivered response.
    pub status: String,
    /// Human-readable outcome message.
    pub message: String,
    /// Echo of the received query parameters.
    pub params: SensorListParams,
    /// Number of sensors matched.
    pub total: usize,
    /// Matched sensors.
    pub sensores: Vec<Sensor>,
}

/// Query parameters for `GET /lecturas`.
#[derive(Debug, Clone, Serialize, Deserialize, IntoParams, ToSchema)]
pub struct ReadingListParams {
    /// Owning sensor filter.
    #[serde(rename = "sensorId")]
    pub sensor_id: Option<String>,
    /// Location filter, resolved through the sensor table.
    #[serde(rename = "ubicacionId")]
    pub ubicacion_id: Option<String>,
    /// Inclusive ISO-8601 lower bound.
    pub from: Option<String>,
    /// Inclusive ISO-8601 upper bound.
    pub to: Option<String>,
    /// Maximum readings returned (1 to 1000). Defaults to 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

/// Response body for `GET /lecturas`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadingListResponse {
    /// Always `"success"` for a delivered response.
    pub status: String,
    /// Human-readable outcome message.
    pub message: String,
    /// Echo of the received query parameters.
    pub params: ReadingListParams,
    /// Size of the filtered set, before the `limit` cut.
    pub total: usize,
    /// Filtered readings, truncated to `limit`.
    pub lecturas: Vec<Reading>,
}
