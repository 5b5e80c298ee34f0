//! Error types for the login flow.
//!
//! Every variant classifies one way the multi-step login protocol can fail,
//! carrying the HTTP status where one is involved so callers can distinguish
//! bad credentials from service trouble.

use thiserror::Error;

use super::jar::CookieError;

/// Errors that can occur while establishing an authenticated session.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The identity provider rejected the credentials (HTTP 401 at any
    /// final-status check).
    #[error("could not log in: invalid username or password (HTTP {status})")]
    InvalidCredentials {
        /// The HTTP status code that carried the rejection.
        status: u16,
    },

    /// The identity provider answered with a status the flow does not
    /// recognize.
    #[error("could not log in: unrecognized error (HTTP {status} {reason})")]
    Unrecognized {
        /// The unexpected HTTP status code.
        status: u16,
        /// Reason phrase or classification detail.
        reason: String,
    },

    /// Asking the service to send a verification code failed.
    ///
    /// A 423 (too many codes requested) never produces this error; it is
    /// reported as a warning and the flow continues.
    #[error("could not request a verification code (HTTP {status} {reason})")]
    CodeRequest {
        /// The HTTP status code of the failed code request.
        status: u16,
        /// Reason phrase.
        reason: String,
    },

    /// The verification exchange answered with another challenge.
    ///
    /// The second-factor exchange runs at most once; a 409 or 412 in reply
    /// to a submitted code is a hard failure, never a loop.
    #[error("verification was answered with another challenge (HTTP {status}); giving up")]
    RepeatedChallenge {
        /// Status code of the repeated challenge (409 or 412).
        status: u16,
    },

    /// The code provider returned an empty or blank code.
    #[error("no verification code given")]
    EmptyCode,

    /// The analytics session endpoint refused to issue a session.
    #[error("could not establish the analytics session (HTTP {status} {reason})")]
    Session {
        /// The HTTP status code from the session endpoint.
        status: u16,
        /// Reason phrase.
        reason: String,
    },

    /// A required session cookie was missing from a successful response.
    #[error(transparent)]
    Cookie(#[from] CookieError),

    /// Network-level failure while talking to the identity provider.
    #[error("network error during {step}: {source}")]
    Transport {
        /// Which protocol step was in flight.
        step: &'static str,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },
}

impl AuthError {
    /// Creates an invalid-credentials error.
    pub(crate) fn invalid_credentials(status: u16) -> Self {
        Self::InvalidCredentials { status }
    }

    /// Creates an unrecognized-status error.
    pub(crate) fn unrecognized(status: u16, reason: impl Into<String>) -> Self {
        Self::Unrecognized {
            status,
            reason: reason.into(),
        }
    }

    /// Creates a code-request failure.
    pub(crate) fn code_request(status: u16, reason: impl Into<String>) -> Self {
        Self::CodeRequest {
            status,
            reason: reason.into(),
        }
    }

    /// Creates a repeated-challenge failure.
    pub(crate) fn repeated_challenge(status: u16) -> Self {
        Self::RepeatedChallenge { status }
    }

    /// Creates a session-endpoint failure.
    pub(crate) fn session(status: u16, reason: impl Into<String>) -> Self {
        Self::Session {
            status,
            reason: reason.into(),
        }
    }

    /// Creates a transport error with the protocol step as context.
    pub(crate) fn transport(step: &'static str, source: reqwest::Error) -> Self {
        Self::Transport { step, source }
    }

    /// The HTTP status carried by this error, when one is involved.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidCredentials { status }
            | Self::Unrecognized { status, .. }
            | Self::CodeRequest { status, .. }
            | Self::RepeatedChallenge { status }
            | Self::Session { status, .. } => Some(*status),
            Self::EmptyCode | Self::Cookie(_) | Self::Transport { .. } => None,
        }
    }
}

// Transport deliberately has no `From<reqwest::Error>`: the variant needs the
// protocol step for a useful message, which the source error cannot provide.
// CookieError converts directly since it already names the missing cookie.
