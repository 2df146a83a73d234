//! HTTP client for upstream service calls.
//!
//! One client per upstream, holding the base URL and the configured
//! per-call timeout. Failures map onto the gateway taxonomy: timeouts to
//! 504, connection-level failures to 502, and upstream error statuses are
//! carried verbatim so mandatory calls can propagate them.

use axum::http::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::{ApiError, ErrorDetail};

/// JSON GET client bound to one upstream base URL.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    /// Creates a client for `base_url` with a per-call `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] when the underlying HTTP client
    /// cannot be constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Internal(format!("error building HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// The configured base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issues a GET and deserializes the JSON response body.
    ///
    /// # Errors
    ///
    /// - [`ApiError::GatewayTimeout`] when the call exceeds the timeout.
    /// - [`ApiError::BadGateway`] on connection failures or an
    ///   undecodable success body.
    /// - [`ApiError::Upstream`] carrying the upstream status and its
    ///   `detail` message when the upstream answers with an error.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| classify_send_error(&e, &url))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorDetail>()
                .await
                .map(|d| d.detail)
                .unwrap_or_else(|_| format!("status {status}"));
            return Err(ApiError::Upstream {
                status: StatusCode::from_u16(status.as_u16())
                    .unwrap_or(StatusCode::BAD_GATEWAY),
                message: format!("error from {url}: {message}"),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::BadGateway(format!("{url}: undecodable body: {e}")))
    }
}

/// Maps a transport-level failure onto the gateway taxonomy.
fn classify_send_error(error: &reqwest::Error, url: &str) -> ApiError {
    if error.is_timeout() {
        ApiError::GatewayTimeout(url.to_string())
    } else {
        ApiError::BadGateway(format!("{url}: {error}"))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let Ok(client) = UpstreamClient::new("http://localhost:8002/", Duration::from_secs(3))
        else {
            panic!("client should build");
        };
        assert_eq!(client.base_url(), "http://localhost:8002");
    }

    #[test]
    fn unreachable_upstream_is_bad_gateway() {
        let Ok(client) = UpstreamClient::new("http://127.0.0.1:1", Duration::from_secs(1)) else {
            panic!("client should build");
        };
        let result: Result<serde_json::Value, ApiError> =
            tokio_test::block_on(client.get_json("/sensores", &[]));
        let Err(err) = result else {
            panic!("closed port should fail");
        };
        assert!(err.is_upstream_failure());
    }
}
