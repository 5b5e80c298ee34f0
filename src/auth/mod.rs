//! Authentication against the Apple identity provider.
//!
//! This module owns the scripted login flow: credential submission,
//! second-factor and device-trust step-ups, and the cookie jar that carries
//! the resulting session identity into the analytics API.

mod code;
mod constants;
mod error;
mod jar;
mod session;

pub use code::CodeProvider;
pub use constants::{ACCOUNT_COOKIE, SESSION_COOKIE};
pub use error::AuthError;
pub use jar::{CookieError, CookieJar};
pub use session::{
    AuthSession, CorrelationHeaders, Credentials, LoginOutcome, classify_login_response,
};
