use crate::UrlError;
use url::Url;

/// Normalizes a user-supplied target into a fetchable URL
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Prepend `https://` if no scheme is given
/// 3. Parse; reject anything that is not HTTP(S)
/// 4. Remove the fragment
///
/// # Examples
///
/// ```
/// use sitegauge::url::normalize_input;
///
/// let url = normalize_input("example.com/page").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
/// ```
pub fn normalize_input(input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Parse("empty URL".to_string()));
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let mut url = Url::parse(&with_scheme).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS targets are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    Ok(url)
}

/// Returns the host of a URL stripped of any `www.` prefix, lowercased
///
/// Used for internal bookkeeping (robots/404 probe cache keys, same-domain
/// comparisons) so that `www.example.com` and `example.com` share state.
pub fn bare_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| {
        let lower = h.to_lowercase();
        lower
            .strip_prefix("www.")
            .map(|s| s.to_string())
            .unwrap_or(lower)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_defaulted_to_https() {
        let url = normalize_input("example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn test_existing_scheme_preserved() {
        let url = normalize_input("http://example.com/page").unwrap();
        assert_eq!(url.as_str(), "http://example.com/page");
    }

    #[test]
    fn test_fragment_removed() {
        let url = normalize_input("https://example.com/page#section").unwrap();
        assert_eq!(url.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_whitespace_trimmed() {
        let url = normalize_input("  example.com/a  ").unwrap();
        assert_eq!(url.as_str(), "https://example.com/a");
    }

    #[test]
    fn test_invalid_scheme_rejected() {
        let result = normalize_input("ftp://example.com/file");
        assert!(matches!(result.unwrap_err(), UrlError::InvalidScheme(_)));
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(normalize_input("   ").is_err());
    }

    #[test]
    fn test_bare_host_strips_www() {
        let url = Url::parse("https://www.Example.COM/page").unwrap();
        assert_eq!(bare_host(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_bare_host_plain() {
        let url = Url::parse("https://sub.example.com/").unwrap();
        assert_eq!(bare_host(&url), Some("sub.example.com".to_string()));
    }
}
