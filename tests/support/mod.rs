//! Shared helpers for integration tests.

pub mod socket_guard;

use asc_analytics_core::CodeProvider;

/// Always supplies the same verification code.
#[allow(dead_code)]
pub struct FixedCode(pub &'static str);

impl CodeProvider for FixedCode {
    fn provide(&self, _prompt: &str) -> String {
        self.0.to_string()
    }
}

/// Panics if a verification code is ever requested.
#[allow(dead_code)]
pub struct NoCodeExpected;

impl CodeProvider for NoCodeExpected {
    fn provide(&self, _prompt: &str) -> String {
        panic!("no verification code should be requested in this test")
    }
}
