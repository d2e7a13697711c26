//! URL handling module for linkwalk
//!
//! This module provides seed normalization, domain extraction, and the scope
//! filter that keeps a crawl on its starting origin.

mod domain;
mod normalize;

use crate::UrlResult;
use url::Url;

// Re-export main functions
pub use domain::extract_domain;
pub use normalize::{normalize_url, visit_key};

/// The origin a crawl is confined to
///
/// A candidate is in scope when its scheme equals the seed's exactly, its
/// host equals the seed's ignoring ASCII case, and it resolves to the same
/// port (explicit or the scheme default).
#[derive(Debug, Clone)]
pub struct CrawlScope {
    seed: Url,
    host: String,
    port: Option<u16>,
}

impl CrawlScope {
    /// Builds the scope of a crawl from its seed URL string
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlScope)` - The seed parsed and normalized
    /// * `Err(UrlError)` - The seed is malformed, not http(s), or has no host
    ///
    /// # Examples
    ///
    /// ```
    /// use linkwalk::url::CrawlScope;
    /// use url::Url;
    ///
    /// let scope = CrawlScope::from_seed("https://a.com/x").unwrap();
    /// assert!(scope.contains(&Url::parse("https://A.COM/y").unwrap()));
    /// assert!(!scope.contains(&Url::parse("http://a.com/y").unwrap()));
    /// ```
    pub fn from_seed(seed: &str) -> UrlResult<Self> {
        let seed = normalize_url(seed)?;
        let host = extract_domain(&seed).ok_or(crate::UrlError::MissingHost)?;
        let port = seed.port_or_known_default();
        Ok(Self { seed, host, port })
    }

    /// The normalized seed URL
    pub fn seed(&self) -> &Url {
        &self.seed
    }

    /// The lowercase seed host
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns true if `candidate` belongs to this crawl
    pub fn contains(&self, candidate: &Url) -> bool {
        if candidate.scheme() != self.seed.scheme() {
            return false;
        }

        let same_host = candidate
            .host_str()
            .is_some_and(|h| h.eq_ignore_ascii_case(&self.host));

        same_host && candidate.port_or_known_default() == self.port
    }
}
