//! Target URL checks applied at the request boundary.
//!
//! URLs are stored exactly as submitted. Parsing here only decides whether a string is an
//! acceptable redirect target.

use url::Url;
use validator::ValidationError;

/// Errors describing why a target URL was refused.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TargetUrlError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,

    #[error("URL must not contain whitespace or control characters")]
    ForbiddenCharacters,
}

/// Checks that `raw` is an absolute `http` or `https` URL with a host.
///
/// Rejects `javascript:`, `data:`, `file:` and similar schemes. The string must already be
/// in the form it will be stored and sent back in `Location`: surrounding whitespace and
/// embedded tabs or newlines, which the parser would silently strip, are refused.
///
/// # Examples
///
/// ```
/// use linker::utils::url::{check_target_url, TargetUrlError};
///
/// assert!(check_target_url("https://example.com/path?q=1").is_ok());
/// assert_eq!(
///     check_target_url("ftp://example.com"),
///     Err(TargetUrlError::UnsupportedProtocol)
/// );
/// ```
pub fn check_target_url(raw: &str) -> Result<(), TargetUrlError> {
    if raw.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(TargetUrlError::ForbiddenCharacters);
    }

    let parsed = Url::parse(raw).map_err(|e| TargetUrlError::InvalidFormat(e.to_string()))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(TargetUrlError::UnsupportedProtocol);
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(TargetUrlError::MissingHost),
    }
}

/// `validator` adapter for [`check_target_url`].
pub fn validate_target_url(raw: &str) -> Result<(), ValidationError> {
    check_target_url(raw).map_err(|e| {
        let mut err = ValidationError::new("target_url");
        err.message = Some(e.to_string().into());
        err
    })
}
