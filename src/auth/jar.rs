//! Session cookie jar: captures named cookies from `Set-Cookie` response
//! headers and renders them back into a single `Cookie` request header.
//!
//! Apple's identity and analytics endpoints hand out their session tokens as
//! plain cookies. The jar stores only the cookies this client is told to
//! capture, in insertion order, so the rendered header is deterministic.

use std::fmt;

use reqwest::header::{HeaderMap, SET_COOKIE};
use tracing::debug;

/// Errors that can occur while capturing session cookies.
#[derive(Debug, thiserror::Error)]
pub enum CookieError {
    /// A required cookie was absent from the response's `Set-Cookie` headers.
    ///
    /// Raised even when the HTTP status was successful: a 2xx login response
    /// without the expected cookie still cannot authenticate the session.
    #[error("required cookie '{name}' was not issued by the server")]
    MissingCookie {
        /// Name of the cookie that was expected.
        name: String,
    },
}

impl CookieError {
    /// Creates a missing-cookie error.
    pub(crate) fn missing(name: impl Into<String>) -> Self {
        Self::MissingCookie { name: name.into() }
    }
}

/// Ordered collection of named session cookies.
///
/// Values are stored without attribute text (`Path`, `Expires`, ...) and
/// re-extraction of a known name overwrites the stored value in place, so
/// insertion order is stable across a whole login flow.
///
/// Cookie values are session credentials; the `Debug` representation lists
/// only the stored names.
#[derive(Clone, Default)]
pub struct CookieJar {
    cookies: Vec<(String, String)>,
}

impl CookieJar {
    /// Creates an empty jar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the value of `name` from the response headers into the jar.
    ///
    /// All `Set-Cookie` headers are scanned; when the same name appears more
    /// than once, the last occurrence wins. The jar is left unchanged for
    /// `name` when no value is found.
    ///
    /// # Errors
    ///
    /// Returns [`CookieError::MissingCookie`] when no `Set-Cookie` header
    /// carries a non-empty value for `name`.
    pub fn extract(&mut self, headers: &HeaderMap, name: &str) -> Result<(), CookieError> {
        let mut found = None;

        for header in headers.get_all(SET_COOKIE) {
            let Ok(header) = header.to_str() else {
                continue;
            };
            if let Some(value) = find_cookie_value(header, name) {
                found = Some(value);
            }
        }

        let Some(value) = found else {
            return Err(CookieError::missing(name));
        };

        debug!(cookie = name, "captured session cookie");
        self.insert(name, value);
        Ok(())
    }

    /// Renders all stored cookies as a `Cookie` header value, insertion
    /// order, `"; "`-joined.
    #[must_use]
    pub fn render(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Returns true when a cookie with this name is stored.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.cookies.iter().any(|(stored, _)| stored == name)
    }

    /// Number of stored cookies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Returns true when no cookies are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    fn insert(&mut self, name: &str, value: String) {
        if let Some(entry) = self
            .cookies
            .iter_mut()
            .find(|(stored, _)| stored == name)
        {
            entry.1 = value;
        } else {
            self.cookies.push((name.to_string(), value));
        }
    }
}

// Custom Debug impl that lists cookie names but never values.
impl fmt::Debug for CookieJar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.cookies.iter().map(|(name, _)| name.as_str()).collect();
        f.debug_struct("CookieJar").field("names", &names).finish()
    }
}

/// Finds the value for `name` in one `Set-Cookie` header value.
///
/// Pairs are delimited by `;`, and additionally by `,` so that headers folded
/// together by an intermediary still yield every cookie. Attribute pairs
/// (`Path=/`, `Expires=...`) fall out naturally because their names never
/// match a session cookie name. An empty value counts as no match.
fn find_cookie_value(header: &str, name: &str) -> Option<String> {
    let mut found = None;
    for segment in header.split([';', ',']) {
        if let Some((key, value)) = segment.split_once('=') {
            if key.trim() == name && !value.is_empty() {
                found = Some(value.to_string());
            }
        }
    }
    found
}
