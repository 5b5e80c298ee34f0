//! Shared User-Agent string for all HTTP traffic.
//!
//! Single source for project URL and UA format so identity and analytics
//! traffic stay consistent and easy to update.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/asc-analytics";

/// Default User-Agent (identifies the tool and its version).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("asc-analytics/{version} (+{PROJECT_UA_URL})")
}
