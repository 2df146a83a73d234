//! Gateway error types with HTTP status code mapping.
//!
//! [`ApiError`] is the central error type shared by all three services.
//! Each variant maps to a specific HTTP status code; every error response
//! carries the same JSON body shape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// { "detail": "'limit' must be an integer between 1 and 1000" }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Human-readable error message.
    pub detail: String,
}

/// Central error enum with HTTP status code mapping.
///
/// # Failure Classes
///
/// | Variant                     | Class               | HTTP Status |
/// |-----------------------------|---------------------|-------------|
/// | `InvalidParameter`          | client error        | 400         |
/// | `NotFound`                  | not found           | 404         |
/// | `BadGateway` / `Upstream`   | upstream unavailable| 502 / as-is |
/// | `GatewayTimeout`            | upstream unavailable| 504         |
/// | `DataIntegrity`             | data integrity fault| 500         |
/// | `ContractViolation`         | contract violation  | 500         |
/// | `Internal`                  | server fault        | 500         |
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or out-of-range query parameter.
    #[error("{0}")]
    InvalidParameter(String),

    /// No matching entity, sensor, or record.
    #[error("{0}")]
    NotFound(String),

    /// Upstream service could not be reached.
    #[error("error contacting {0}")]
    BadGateway(String),

    /// Upstream service did not answer within the configured timeout.
    #[error("timeout contacting {0}")]
    GatewayTimeout(String),

    /// Upstream service answered with an error status; propagated verbatim
    /// for calls whose result is mandatory.
    #[error("{message}")]
    Upstream {
        /// Status code reported by the upstream service.
        status: StatusCode,
        /// Detail message forwarded from the upstream response.
        message: String,
    },

    /// A stored record violates its declared contract, or a stored
    /// timestamp failed to parse during a mandatory comparison.
    #[error("{0}")]
    DataIntegrity(String),

    /// A composed response failed validation against the unified schema.
    #[error("response does not conform to the unified schema: {0}")]
    ContractViolation(String),

    /// I/O, serialization, or other internal fault.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadGateway(_) => StatusCode::BAD_GATEWAY,
            Self::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Upstream { status, .. } => *status,
            Self::DataIntegrity(_) | Self::ContractViolation(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// True for the upstream-unavailable failure class. Supplementary
    /// aggregation calls degrade on these instead of failing.
    #[must_use]
    pub fn is_upstream_failure(&self) -> bool {
        matches!(
            self,
            Self::BadGateway(_) | Self::GatewayTimeout(_) | Self::Upstream { .. }
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorDetail {
            detail: self.to_string(),
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
