use url::Url;

/// Classifies a resolved URL as internal or external to the analyzed page
///
/// A URL is internal when its host exactly equals the page host or is a
/// subdomain of it. This exact rule is shared by every extractor so that
/// link classification and canonical comparisons stay consistent.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitegauge::url::is_internal;
///
/// let page = Url::parse("https://example.com/page").unwrap();
/// let blog = Url::parse("https://blog.example.com/post").unwrap();
/// let other = Url::parse("https://other.com/").unwrap();
///
/// assert!(is_internal(&blog, &page));
/// assert!(!is_internal(&other, &page));
/// ```
pub fn is_internal(candidate: &Url, page: &Url) -> bool {
    let (Some(candidate_host), Some(page_host)) = (candidate.host_str(), page.host_str()) else {
        return false;
    };

    let candidate_host = candidate_host.to_lowercase();
    let page_host = page_host.to_lowercase();

    candidate_host == page_host || candidate_host.ends_with(&format!(".{}", page_host))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    #[test]
    fn test_same_host_internal() {
        let url = Url::parse("https://example.com/other").unwrap();
        assert!(is_internal(&url, &page()));
    }

    #[test]
    fn test_subdomain_internal() {
        let url = Url::parse("https://blog.example.com/post").unwrap();
        assert!(is_internal(&url, &page()));
    }

    #[test]
    fn test_nested_subdomain_internal() {
        let url = Url::parse("https://a.b.example.com/").unwrap();
        assert!(is_internal(&url, &page()));
    }

    #[test]
    fn test_other_host_external() {
        let url = Url::parse("https://other.com/").unwrap();
        assert!(!is_internal(&url, &page()));
    }

    #[test]
    fn test_suffix_without_dot_is_external() {
        // notexample.com must not count as a subdomain of example.com
        let url = Url::parse("https://notexample.com/").unwrap();
        assert!(!is_internal(&url, &page()));
    }

    #[test]
    fn test_case_insensitive() {
        let url = Url::parse("https://EXAMPLE.com/other").unwrap();
        assert!(is_internal(&url, &page()));
    }

    #[test]
    fn test_scheme_ignored() {
        let url = Url::parse("http://example.com/insecure").unwrap();
        assert!(is_internal(&url, &page()));
    }
}
