use thiserror::Error;
use url::Url;

/// Errors that can occur when validating a configured feed endpoint.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
}

/// Returns true when `value` looks like an absolute web link.
///
/// This is the predicate applied to every feed-sourced link and image URL:
/// it only checks for an `http://` or `https://` prefix. Relative links,
/// `javascript:` URLs and empty strings all fail it.
pub fn is_valid_link(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Returns `value` (trimmed) when it passes [`is_valid_link`], otherwise `fallback`.
///
/// # Examples
///
/// ```
/// use offers_feed::util::normalize_link;
///
/// assert_eq!(normalize_link(Some(" https://a.example/p "), "https://group"), "https://a.example/p");
/// assert_eq!(normalize_link(Some("/relative"), "https://group"), "https://group");
/// assert_eq!(normalize_link(None, ""), "");
/// ```
pub fn normalize_link(value: Option<&str>, fallback: &str) -> String {
    match value.map(str::trim) {
        Some(v) if is_valid_link(v) => v.to_owned(),
        _ => fallback.to_owned(),
    }
}

/// Validates the configured feed URL.
///
/// Unlike [`is_valid_link`], this fully parses the URL so a typo in the
/// configuration file fails at startup rather than at fetch time.
///
/// # Errors
///
/// Returns [`UrlValidationError`] if:
/// - The URL cannot be parsed ([`UrlValidationError::InvalidUrl`])
/// - The scheme is not `http` or `https` ([`UrlValidationError::UnsupportedScheme`])
pub fn validate_feed_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str)?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
}
