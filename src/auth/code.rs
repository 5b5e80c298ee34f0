//! Verification-code acquisition capability.

/// Supplies a one-time verification code when login hits a second-factor
/// challenge.
///
/// The login flow calls this at most once per attempt, directly on the login
/// task. Implementations may block for as long as they need (an interactive
/// prompt waiting on a person is the normal production case); the flow never
/// imposes a timeout of its own. Test implementations usually return a fixed
/// value.
///
/// A blank return value is treated by the login flow as a fatal input error,
/// distinct from any network failure.
pub trait CodeProvider: Send + Sync {
    /// Returns the code entered in response to `prompt`.
    fn provide(&self, prompt: &str) -> String;
}
