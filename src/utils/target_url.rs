//! Validation of link targets.

use url::Url;

/// Message shown when a target is rejected.
pub const TARGET_MESSAGE: &str = "Please provide a target that starts with http:// or https://";

/// Errors that can occur while validating a target URL.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TargetUrlError {
    #[error("Only HTTP and HTTPS targets are allowed")]
    UnsupportedProtocol,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("URL has no host")]
    MissingHost,
}

/// Validates a target and returns it trimmed.
///
/// The target is stored as typed; only the scheme and basic structure are
/// checked. Schemes such as `javascript:`, `data:` or `file:` are rejected.
///
/// # Errors
///
/// Returns [`TargetUrlError`] if the target is not an absolute HTTP(S) URL.
pub fn validate_target(input: &str) -> Result<String, TargetUrlError> {
    let target = input.trim();

    if !(target.starts_with("http://") || target.starts_with("https://")) {
        return Err(TargetUrlError::UnsupportedProtocol);
    }

    let url = Url::parse(target).map_err(|e| TargetUrlError::InvalidFormat(e.to_string()))?;

    if url.host_str().is_none_or(str::is_empty) {
        return Err(TargetUrlError::MissingHost);
    }

    Ok(target.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert_eq!(
            validate_target("https://example.com/a?b=c#d").unwrap(),
            "https://example.com/a?b=c#d"
        );
        assert_eq!(
            validate_target("http://localhost:8080").unwrap(),
            "http://localhost:8080"
        );
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(
            validate_target("  https://example.com  ").unwrap(),
            "https://example.com"
        );
    }

    #[test]
    fn test_keeps_target_as_typed() {
        assert_eq!(
            validate_target("https://Example.COM/Path").unwrap(),
            "https://Example.COM/Path"
        );
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert_eq!(
            validate_target("javascript:alert(1)"),
            Err(TargetUrlError::UnsupportedProtocol)
        );
        assert_eq!(
            validate_target("ftp://example.com"),
            Err(TargetUrlError::UnsupportedProtocol)
        );
        assert_eq!(
            validate_target("HTTPS://example.com"),
            Err(TargetUrlError::UnsupportedProtocol)
        );
        assert_eq!(validate_target(""), Err(TargetUrlError::UnsupportedProtocol));
    }

    #[test]
    fn test_rejects_missing_host() {
        assert!(validate_target("http://").is_err());
    }
}
