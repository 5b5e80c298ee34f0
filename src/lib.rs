//! App Store Connect Analytics Client Library
//!
//! This library scripts the cookie-session login that App Store Connect's
//! private analytics API requires (Apple ID credentials, second-factor and
//! device-trust step-ups) and exposes the two data operations built on top
//! of it: settings metadata and time-series metric queries.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`auth`] - Scripted Apple ID login and the session cookie jar
//! - [`analytics`] - Metadata and time-series queries over the session
//!
//! Secrets never leak: passwords, verification codes, cookie values and
//! correlation headers are redacted from all Debug output and never logged.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod analytics;
pub mod auth;
#[cfg(test)]
pub mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use analytics::{AnalyticsClient, ApiError, MetricQuery};
pub use auth::{
    ACCOUNT_COOKIE, AuthError, AuthSession, CodeProvider, CookieError, CookieJar,
    CorrelationHeaders, Credentials, LoginOutcome, SESSION_COOKIE, classify_login_response,
};
