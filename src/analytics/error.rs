//! Error types for analytics API operations.

use thiserror::Error;

/// Errors surfaced by [`AnalyticsClient`](super::AnalyticsClient)
/// operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The operation was attempted before a successful login.
    #[error("{operation} requires an authenticated session; call login first")]
    AuthenticationRequired {
        /// Name of the rejected operation.
        operation: &'static str,
    },

    /// The API answered with a non-success status.
    ///
    /// `detail` carries the service's own error list, pretty-printed, when
    /// the body contained one; otherwise it is empty.
    #[error("{context}: HTTP {status} {reason}{detail}")]
    Status {
        /// Which request failed.
        context: &'static str,
        /// The HTTP status code.
        status: u16,
        /// Reason phrase for the status.
        reason: String,
        /// Embedded service errors, or empty.
        detail: String,
    },

    /// The query was rejected before any request was sent.
    #[error("invalid metric query: {reason}")]
    InvalidQuery {
        /// Why the query cannot be submitted.
        reason: String,
    },

    /// A network-level failure before any response arrived.
    #[error("network error during {context}: {source}")]
    Transport {
        /// Which request failed.
        context: &'static str,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a success status but an undecodable body.
    #[error("could not decode {context} response: {source}")]
    Decode {
        /// Which response failed to decode.
        context: &'static str,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub(crate) fn authentication_required(operation: &'static str) -> Self {
        Self::AuthenticationRequired { operation }
    }

    pub(crate) fn status(
        context: &'static str,
        status: u16,
        reason: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::Status {
            context,
            status,
            reason: reason.into(),
            detail: detail.into(),
        }
    }

    pub(crate) fn invalid_query(reason: impl Into<String>) -> Self {
        Self::InvalidQuery {
            reason: reason.into(),
        }
    }

    pub(crate) fn transport(context: &'static str, source: reqwest::Error) -> Self {
        Self::Transport { context, source }
    }

    pub(crate) fn decode(context: &'static str, source: serde_json::Error) -> Self {
        Self::Decode { context, source }
    }

    /// The HTTP status of an API rejection, when there is one.
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// Note: deliberately no `From<reqwest::Error>`. Every transport failure is
// wrapped with the request context at the call site so messages name the
// operation that failed.

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_required_names_the_operation() {
        let err = ApiError::authentication_required("get_metadata");
        assert_eq!(
            err.to_string(),
            "get_metadata requires an authenticated session; call login first"
        );
    }

    #[test]
    fn test_status_error_embeds_detail_verbatim() {
        let err = ApiError::status(
            "time-series query",
            400,
            "Bad Request",
            "\n[\n  \"bad measure\"\n]",
        );
        let message = err.to_string();

        assert!(
            message.starts_with("time-series query: HTTP 400 Bad Request"),
            "unexpected prefix: {message}"
        );
        assert!(
            message.contains("bad measure"),
            "service detail should survive verbatim: {message}"
        );
    }

    #[test]
    fn test_status_error_without_detail_has_no_trailing_text() {
        let err = ApiError::status("analytics settings request", 503, "Service Unavailable", "");
        assert_eq!(
            err.to_string(),
            "analytics settings request: HTTP 503 Service Unavailable"
        );
    }

    #[test]
    fn test_invalid_query_display() {
        let err = ApiError::invalid_query("at least one metric is required");
        assert_eq!(
            err.to_string(),
            "invalid metric query: at least one metric is required"
        );
    }

    #[test]
    fn test_http_status_accessor() {
        let rejected = ApiError::status("time-series query", 429, "Too Many Requests", "");
        assert_eq!(rejected.http_status(), Some(429));

        let local = ApiError::invalid_query("empty");
        assert_eq!(local.http_status(), None);
    }

    #[test]
    fn test_decode_error_names_the_context() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = ApiError::decode("analytics settings request", json_err);
        assert!(
            err.to_string()
                .starts_with("could not decode analytics settings request response:"),
            "unexpected message: {err}"
        );
    }
}
