//! Login state machine for the Apple identity provider.
//!
//! The provider overloads one sign-in endpoint with three outcomes (direct
//! success, second-factor step-up, device-trust step-up) distinguished only
//! by HTTP status code. [`classify_login_response`] turns a response into an
//! explicit [`LoginOutcome`] so every branch is testable without a server,
//! and [`AuthSession::login`] drives the protocol until both session cookies
//! are in the jar.

use std::fmt;

use reqwest::header::{self, HeaderMap};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::user_agent;

use super::code::CodeProvider;
use super::constants::{
    ACCOUNT_COOKIE, SCNT_HEADER, SESSION_COOKIE, SESSION_ID_HEADER, WIDGET_KEY, WIDGET_KEY_HEADER,
};
use super::error::AuthError;
use super::jar::CookieJar;

/// Default identity-provider base URL.
const DEFAULT_AUTH_BASE_URL: &str = "https://idmsa.apple.com/appleauth/auth";

/// Default analytics session endpoint.
const DEFAULT_SESSION_URL: &str = "https://appstoreconnect.apple.com/olympus/v1/session";

/// Prompt shown when a second-factor code is needed.
const CODE_PROMPT: &str = "Enter 2SV code: ";

// ==================== Credentials ====================

/// Apple ID credentials for one login attempt.
///
/// The password is redacted from Debug output and only reachable through
/// [`Credentials::password`].
#[derive(Clone)]
pub struct Credentials {
    /// Apple ID (account email).
    pub username: String,
    /// Account password. Sensitive; never logged.
    password: String,
}

impl Credentials {
    /// Creates credentials for a login attempt.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the password.
    ///
    /// The value is sensitive; avoid logging the return value.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

// Custom Debug impl that redacts the password.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

// ==================== Correlation Headers ====================

/// The per-attempt header pair binding a multi-request login exchange.
///
/// Copied from a 409/412 response and attached to every subsequent identity
/// request of that attempt; never stored on the session itself.
#[derive(Clone)]
pub struct CorrelationHeaders {
    session_id: String,
    scnt: String,
}

impl CorrelationHeaders {
    /// Reads both correlation headers from a challenge response.
    ///
    /// Returns `None` when either header is missing or not valid text; a
    /// challenge without usable correlation headers cannot be answered.
    fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let session_id = headers.get(SESSION_ID_HEADER)?.to_str().ok()?.to_string();
        let scnt = headers.get(SCNT_HEADER)?.to_str().ok()?.to_string();
        Some(Self { session_id, scnt })
    }

    /// Returns the identity session id. Sensitive; avoid logging.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Returns the `scnt` value. Sensitive; avoid logging.
    #[must_use]
    pub fn scnt(&self) -> &str {
        &self.scnt
    }

    /// Attaches both headers to an outgoing identity request.
    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(SESSION_ID_HEADER, &self.session_id)
            .header(SCNT_HEADER, &self.scnt)
    }
}

// Custom Debug impl that redacts both header values.
impl fmt::Debug for CorrelationHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CorrelationHeaders")
            .field("session_id", &"[REDACTED]")
            .field("scnt", &"[REDACTED]")
            .finish()
    }
}

// ==================== Outcome Classification ====================

/// How the identity provider answered a sign-in (or code-verification)
/// request.
#[derive(Debug)]
pub enum LoginOutcome {
    /// 2xx: proceed to cookie extraction.
    Success,
    /// 409: a one-time code must be verified, using these correlation
    /// headers.
    NeedsSecondFactor(CorrelationHeaders),
    /// 412: device trust must be repaired (skippable without a code), using
    /// these correlation headers.
    NeedsDeviceTrust(CorrelationHeaders),
    /// 401: the credentials were rejected.
    InvalidCredentials {
        /// The rejecting status code.
        status: u16,
    },
    /// Anything else, including challenges missing their correlation
    /// headers.
    Unrecognized {
        /// The unexpected status code.
        status: u16,
        /// Reason phrase or classification detail.
        reason: String,
    },
}

/// Classifies a login-shaped response by status code and headers.
///
/// Pure function over the response metadata so every branch of the state
/// machine is unit-testable. A 409/412 without both correlation headers is
/// classified as unrecognized since the challenge cannot be answered.
#[must_use]
pub fn classify_login_response(status: StatusCode, headers: &HeaderMap) -> LoginOutcome {
    if status.is_success() {
        return LoginOutcome::Success;
    }

    match status.as_u16() {
        409 => match CorrelationHeaders::from_headers(headers) {
            Some(context) => LoginOutcome::NeedsSecondFactor(context),
            None => LoginOutcome::Unrecognized {
                status: 409,
                reason: "challenge response is missing correlation headers".to_string(),
            },
        },
        412 => match CorrelationHeaders::from_headers(headers) {
            Some(context) => LoginOutcome::NeedsDeviceTrust(context),
            None => LoginOutcome::Unrecognized {
                status: 412,
                reason: "challenge response is missing correlation headers".to_string(),
            },
        },
        401 => LoginOutcome::InvalidCredentials { status: 401 },
        status_code => LoginOutcome::Unrecognized {
            status: status_code,
            reason: reason_phrase(status),
        },
    }
}

/// Canonical reason phrase for a status, for error messages.
fn reason_phrase(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("unknown status").to_string()
}

// ==================== Identity Request Bodies ====================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    account_name: &'a str,
    password: &'a str,
    remember_me: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyCodeRequest<'a> {
    mode: &'static str,
    phone_number: PhoneId,
    security_code: SecurityCode<'a>,
}

#[derive(Serialize)]
struct PhoneId {
    id: u32,
}

#[derive(Serialize)]
struct SecurityCode<'a> {
    code: &'a str,
}

impl<'a> VerifyCodeRequest<'a> {
    /// Builds the SMS verification body; the phone identifier is the fixed
    /// placeholder the service expects.
    fn sms(code: &'a str) -> Self {
        Self {
            mode: "sms",
            phone_number: PhoneId { id: 1 },
            security_code: SecurityCode { code },
        }
    }
}

// ==================== AuthSession ====================

/// Cookie-session authentication against the Apple identity provider.
///
/// Created empty; [`login`](AuthSession::login) drives the protocol and the
/// session counts as authenticated only once both the account cookie
/// (`myacinfo`) and the analytics session cookie (`itctx`) are present.
///
/// `login` takes `&mut self`, so one session can never run two login
/// attempts concurrently. Read-only use after authentication is freely
/// shareable.
pub struct AuthSession {
    http: Client,
    jar: CookieJar,
    auth_base_url: String,
    session_url: String,
}

impl AuthSession {
    /// Creates a session against the production endpoints.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::build(
            DEFAULT_AUTH_BASE_URL.to_string(),
            DEFAULT_SESSION_URL.to_string(),
        )
        .expect("failed to build HTTP client with static configuration")
    }

    /// Creates a session with custom endpoints (for testing with wiremock).
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_endpoints(
        auth_base_url: impl Into<String>,
        session_url: impl Into<String>,
    ) -> Self {
        Self::build(auth_base_url.into(), session_url.into())
            .expect("failed to build HTTP client with static configuration")
    }

    fn build(auth_base_url: String, session_url: String) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: build_http_client()?,
            jar: CookieJar::new(),
            auth_base_url,
            session_url,
        })
    }

    /// True once both required session cookies are present.
    ///
    /// There is no partial state: a session either holds `myacinfo` and
    /// `itctx` or it is not authenticated.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.jar.has(ACCOUNT_COOKIE) && self.jar.has(SESSION_COOKIE)
    }

    /// The stored cookies, for inspection.
    #[must_use]
    pub fn cookies(&self) -> &CookieJar {
        &self.jar
    }

    /// Runs the full login protocol.
    ///
    /// Submits the credentials, answers a second-factor or device-trust
    /// step-up when the provider demands one (the `code_provider` is
    /// consulted only on the second-factor path), then captures the account
    /// and analytics session cookies.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] on a 401 at any
    /// final-status check, [`AuthError::EmptyCode`] when the provider
    /// returns a blank code, [`AuthError::RepeatedChallenge`] when the
    /// verification reply is itself another challenge, and classified
    /// [`AuthError`] variants for every other failure. Any failure leaves
    /// the session unauthenticated.
    #[tracing::instrument(skip_all, fields(username = %credentials.username))]
    pub async fn login(
        &mut self,
        credentials: &Credentials,
        code_provider: &dyn CodeProvider,
    ) -> Result<(), AuthError> {
        info!("signing in to App Store Connect");

        let sign_in_url = format!("{}/signin?isRememberMeEnabled=true", self.auth_base_url);
        let body = SignInRequest {
            account_name: &credentials.username,
            password: credentials.password(),
            remember_me: false,
        };
        let response = self
            .identity_request(self.http.post(&sign_in_url), None)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::transport("sign-in", e))?;

        let outcome = classify_login_response(response.status(), response.headers());
        debug!(status = response.status().as_u16(), "sign-in response classified");

        let final_response = match outcome {
            LoginOutcome::Success => response,
            LoginOutcome::NeedsSecondFactor(context) => {
                self.run_second_factor(code_provider, &context).await?
            }
            LoginOutcome::NeedsDeviceTrust(context) => {
                self.complete_device_trust(&context).await?
            }
            LoginOutcome::InvalidCredentials { status } => {
                return Err(AuthError::invalid_credentials(status));
            }
            LoginOutcome::Unrecognized { status, reason } => {
                return Err(AuthError::unrecognized(status, reason));
            }
        };

        self.jar.extract(final_response.headers(), ACCOUNT_COOKIE)?;
        self.fetch_session_cookie().await?;

        info!("login complete; session authenticated");
        Ok(())
    }

    /// Runs the second-factor exchange, returning the verification response
    /// to be treated as the final login response.
    async fn run_second_factor(
        &self,
        code_provider: &dyn CodeProvider,
        context: &CorrelationHeaders,
    ) -> Result<Response, AuthError> {
        info!("second-factor challenge received; requesting a verification code");

        // Ask the service to send a code to the account's trusted number.
        let code_request = self
            .identity_request(self.http.get(&self.auth_base_url), Some(context))
            .send()
            .await
            .map_err(|e| AuthError::transport("verification-code request", e))?;

        let status = code_request.status();
        if !status.is_success() {
            if status.as_u16() == 423 {
                // Rate-limited, not fatal: a previously issued code may
                // still be valid.
                warn!("too many verification codes requested; an earlier code may still work");
            } else {
                return Err(AuthError::code_request(
                    status.as_u16(),
                    reason_phrase(status),
                ));
            }
        }

        let code = code_provider.provide(CODE_PROMPT);
        let code = code.trim();
        if code.is_empty() {
            return Err(AuthError::EmptyCode);
        }

        let verify_url = format!("{}/verify/phone/securitycode", self.auth_base_url);
        let response = self
            .identity_request(self.http.post(&verify_url), Some(context))
            .json(&VerifyCodeRequest::sms(code))
            .send()
            .await
            .map_err(|e| AuthError::transport("verification-code submit", e))?;

        // The verification response is branched exactly like the original
        // sign-in response, except that the exchange runs at most once.
        match classify_login_response(response.status(), response.headers()) {
            LoginOutcome::Success => Ok(response),
            LoginOutcome::NeedsSecondFactor(_) | LoginOutcome::NeedsDeviceTrust(_) => {
                Err(AuthError::repeated_challenge(response.status().as_u16()))
            }
            LoginOutcome::InvalidCredentials { status } => {
                Err(AuthError::invalid_credentials(status))
            }
            LoginOutcome::Unrecognized { status, reason } => {
                Err(AuthError::unrecognized(status, reason))
            }
        }
    }

    /// Completes the device-trust step-up without a code, returning the
    /// repair response to be treated as the final login response.
    async fn complete_device_trust(
        &self,
        context: &CorrelationHeaders,
    ) -> Result<Response, AuthError> {
        info!("device-trust step-up received; completing without a code");

        let repair_url = format!("{}/repair/complete", self.auth_base_url);
        let response = self
            .identity_request(self.http.post(&repair_url), Some(context))
            .send()
            .await
            .map_err(|e| AuthError::transport("repair completion", e))?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else if status.as_u16() == 401 {
            Err(AuthError::invalid_credentials(401))
        } else {
            Err(AuthError::unrecognized(status.as_u16(), reason_phrase(status)))
        }
    }

    /// Retrieves the analytics session cookie using the account cookie.
    async fn fetch_session_cookie(&mut self) -> Result<(), AuthError> {
        let response = self
            .cookie_request(self.http.get(&self.session_url))
            .send()
            .await
            .map_err(|e| AuthError::transport("session retrieval", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::session(status.as_u16(), reason_phrase(status)));
        }

        self.jar.extract(response.headers(), SESSION_COOKIE)?;
        debug!("analytics session cookie captured");
        Ok(())
    }

    /// Attaches the widget key, stored cookies, and optional correlation
    /// headers. Every identity-provider request goes through here.
    fn identity_request(
        &self,
        request: RequestBuilder,
        context: Option<&CorrelationHeaders>,
    ) -> RequestBuilder {
        let mut request = self
            .cookie_request(request)
            .header(WIDGET_KEY_HEADER, WIDGET_KEY);
        if let Some(context) = context {
            request = context.apply(request);
        }
        request
    }

    /// Attaches the stored cookies. Session and analytics requests carry
    /// cookies only, never the widget key or correlation headers.
    fn cookie_request(&self, request: RequestBuilder) -> RequestBuilder {
        if self.jar.is_empty() {
            request
        } else {
            request.header(header::COOKIE, self.jar.render())
        }
    }

    /// Builds a GET request to `url` carrying the session cookies.
    pub(crate) fn get(&self, url: &str) -> RequestBuilder {
        self.cookie_request(self.http.get(url))
    }

    /// Builds a POST request to `url` carrying the session cookies.
    pub(crate) fn post(&self, url: &str) -> RequestBuilder {
        self.cookie_request(self.http.post(url))
    }
}

impl Default for AuthSession {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("auth_base_url", &self.auth_base_url)
            .field("session_url", &self.session_url)
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

/// Builds the session HTTP client: JSON accept header, gzip, shared
/// user agent, no request timeouts (callers impose their own bounds).
fn build_http_client() -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json, text/javascript, */*"),
    );

    Client::builder()
        .default_headers(default_headers)
        .gzip(true)
        .user_agent(user_agent::default_user_agent())
        .build()
}
