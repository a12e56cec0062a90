//! Redaction wrapper for secrets
//!
//! The GitHub token and the Discord webhook URL (which embeds its own token)
//! are carried as `Sensitive<String>` so that neither `Debug` nor `Display`
//! can leak them into logs or error messages.

use std::fmt;

const REDACTED: &str = "***REDACTED***";

/// Wrapper for secret values that redacts itself in Debug and Display
///
/// # Example
///
/// ```
/// use chlog_core_types::Sensitive;
///
/// let token = Sensitive::new("ghp_secret".to_string());
/// assert_eq!(format!("{:?}", token), "***REDACTED***");
/// assert_eq!(token.expose(), "ghp_secret");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Expose the underlying value
    ///
    /// Only call this at the point the secret is handed to the HTTP client.
    pub fn expose(&self) -> &T {
        &self.0
    }
}

impl Sensitive<String> {
    /// Wrap an optional environment value, treating blank strings as absent
    pub fn from_optional(value: Option<String>) -> Option<Self> {
        value.filter(|v| !v.trim().is_empty()).map(Self)
    }
}

impl<T> From<T> for Sensitive<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}
