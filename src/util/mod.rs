//! Utility functions for common operations.
//!
//! - **Text processing**: Unicode-aware truncation and control-character
//!   stripping for store-supplied titles
//! - **Dates**: relative "Today"/"Yesterday"/"N days ago" formatting for cards
//! - **URL safety**: scheme check before handing a store URL to the browser

mod dates;
mod text;

pub use dates::{format_date, smart_date};
pub use text::{strip_control_chars, truncate_to_width};

use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum OpenUrlError {
    #[error("Invalid URL: {0}")]
    Invalid(#[from] url::ParseError),
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
}

/// Validate a store page URL before passing it to the system browser.
///
/// Store URLs arrive from the backend, which in turn scraped them; only
/// http(s) may reach `open::that`, anything else (file:, javascript:) is
/// rejected.
pub fn validate_open_url(url_str: &str) -> Result<Url, OpenUrlError> {
    let url = Url::parse(url_str)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(OpenUrlError::UnsupportedScheme(scheme.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_url_accepts_store_pages() {
        assert!(validate_open_url("https://apps.apple.com/us/app/id123").is_ok());
        assert!(
            validate_open_url("https://play.google.com/store/apps/details?id=com.x.y").is_ok()
        );
    }

    #[test]
    fn test_open_url_rejects_non_http_schemes() {
        assert!(validate_open_url("file:///etc/passwd").is_err());
        assert!(validate_open_url("javascript:alert(1)").is_err());
    }

    #[test]
    fn test_open_url_rejects_garbage() {
        assert!(validate_open_url("not a url").is_err());
    }
}
