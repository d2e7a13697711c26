use crate::UrlError;
use url::Url;

/// Parses and normalizes the seed URL of a crawl
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace and parse; reject if malformed
/// 2. Require an `http` or `https` scheme
/// 3. Require a host
/// 4. Remove the fragment (everything after #)
///
/// The `url` crate already lowercases the host, drops default ports and
/// removes dot segments while parsing, so nothing else is rewritten.
///
/// # Examples
///
/// ```
/// use linkwalk::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.com/docs/#intro").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs/");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);
    Ok(url)
}

/// Returns the key a discovered link is claimed under
///
/// Two links that differ only in their fragment name the same resource.
pub fn visit_key(url: &Url) -> Url {
    let mut key = url.clone();
    key.set_fragment(None);
    key
}
