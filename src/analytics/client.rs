//! Client for the App Store Connect analytics API.
//!
//! Wraps an authenticated [`AuthSession`] and exposes the two data
//! operations the service offers: account settings metadata and time-series
//! metric queries. Every call re-checks authentication locally before
//! touching the network.

use serde_json::Value;
use tracing::debug;

use crate::auth::AuthSession;

use super::error::ApiError;
use super::query::{MetricQuery, TimeSeriesRequest};

/// Default analytics API base URL.
const DEFAULT_BASE_URL: &str = "https://appstoreconnect.apple.com/analytics/api/v1";

/// Routing header the time-series endpoint requires.
const REQUESTED_BY_HEADER: &str = "X-Requested-By";
const REQUESTED_BY_VALUE: &str = "dev.apple.com";

/// Analytics API client over an authenticated session.
///
/// Operations borrow the session read-only, so a client is safe to share
/// across tasks once login has completed.
#[derive(Debug)]
pub struct AnalyticsClient {
    session: AuthSession,
    base_url: String,
}

impl AnalyticsClient {
    /// Creates a client against the production API.
    #[must_use]
    pub fn new(session: AuthSession) -> Self {
        Self::with_base_url(session, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    #[must_use]
    pub fn with_base_url(session: AuthSession, base_url: impl Into<String>) -> Self {
        Self {
            session,
            base_url: base_url.into(),
        }
    }

    /// The underlying session.
    #[must_use]
    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    /// Retrieves API metadata: the available measures and dimensions, data
    /// date ranges, and the apps visible to the account.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::AuthenticationRequired`] without issuing any
    /// request when the session is not logged in, and [`ApiError::Status`],
    /// [`ApiError::Transport`] or [`ApiError::Decode`] for request
    /// failures.
    #[tracing::instrument(skip(self))]
    pub async fn get_metadata(&self) -> Result<Value, ApiError> {
        self.require_authenticated("get_metadata")?;

        let url = format!("{}/settings/all", self.base_url);
        let response = self
            .session
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::transport("analytics settings request", e))?;

        decode_response(response, "analytics settings request").await
    }

    /// Runs a time-series query for the metrics described by `query`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::AuthenticationRequired`] without issuing any
    /// request when the session is not logged in,
    /// [`ApiError::InvalidQuery`] when the query names no metrics, and
    /// [`ApiError::Status`], [`ApiError::Transport`] or
    /// [`ApiError::Decode`] for request failures. A rejection body with an
    /// `errors` field has that field pretty-printed into the error message.
    #[tracing::instrument(skip(self, query), fields(app_id = %query.app_id))]
    pub async fn get_metric_series(&self, query: &MetricQuery) -> Result<Value, ApiError> {
        self.require_authenticated("get_metric_series")?;

        let body = TimeSeriesRequest::from_query(query)?;
        let url = format!("{}/data/time-series", self.base_url);
        let response = self
            .session
            .post(&url)
            .header(REQUESTED_BY_HEADER, REQUESTED_BY_VALUE)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::transport("time-series query", e))?;

        decode_response(response, "time-series query").await
    }

    fn require_authenticated(&self, operation: &'static str) -> Result<(), ApiError> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(ApiError::authentication_required(operation))
        }
    }
}

/// Reads the body, then either decodes it (success) or turns it into a
/// status error carrying any embedded service errors.
async fn decode_response(response: reqwest::Response, context: &'static str) -> Result<Value, ApiError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::transport(context, e))?;

    debug!(status = status.as_u16(), "analytics response received");

    if !status.is_success() {
        return Err(ApiError::status(
            context,
            status.as_u16(),
            status.canonical_reason().unwrap_or("unknown status"),
            extract_error_detail(&body),
        ));
    }

    serde_json::from_str(&body).map_err(|e| ApiError::decode(context, e))
}

/// Pretty-prints the `errors` field of a rejection body, prefixed with a
/// newline so it reads as a block under the status line. Returns an empty
/// string when the body is not JSON or has no `errors` field.
fn extract_error_detail(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return String::new();
    };
    let Some(errors) = value.get("errors") else {
        return String::new();
    };
    match serde_json::to_string_pretty(errors) {
        Ok(pretty) => format!("\n{pretty}"),
        Err(_) => String::new(),
    }
}
