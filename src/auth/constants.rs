//! Protocol constants for the Apple identity endpoints.

/// Cookie carrying the account identity, issued by the sign-in flow.
pub const ACCOUNT_COOKIE: &str = "myacinfo";

/// Cookie carrying the analytics session token, issued by the session
/// endpoint once the account cookie is established.
pub const SESSION_COOKIE: &str = "itctx";

/// Client-identification header required on every identity-provider request.
pub(crate) const WIDGET_KEY_HEADER: &str = "X-Apple-Widget-Key";

/// Fixed widget key identifying the App Store Connect web client.
pub(crate) const WIDGET_KEY: &str =
    "e0b80c3bf78523bfe80974d320935bfa30add02e1bff88ec2166c6bd5a706c42";

/// Correlation header binding a multi-request login exchange together.
pub(crate) const SESSION_ID_HEADER: &str = "X-Apple-ID-Session-Id";

/// Second correlation header; lower-case name is what the service sends.
pub(crate) const SCNT_HEADER: &str = "scnt";
