//! App Store Connect analytics API access.
//!
//! [`AnalyticsClient`] layers the two data operations (settings metadata
//! and time-series metrics) over an authenticated
//! [`AuthSession`](crate::auth::AuthSession).

mod client;
mod error;
mod query;

pub use client::AnalyticsClient;
pub use error::ApiError;
pub use query::MetricQuery;
