//! Host registration filter: the `*://*.<domain>/*` match pattern.

use anyhow::{Context, Result};

/// Schemes covered by a `*` scheme in a WebExtension match pattern.
const WILDCARD_SCHEMES: [&str; 4] = ["http", "https", "ws", "wss"];

/// Match pattern the host registers the router for, in blocking mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterceptFilter {
    domain: String,
}

impl InterceptFilter {
    pub fn for_domain(domain: &str) -> Self {
        Self {
            domain: domain.trim().trim_end_matches('.').to_ascii_lowercase(),
        }
    }

    /// Pattern string handed to the host interception API.
    pub fn pattern(&self) -> String {
        format!("*://*.{}/*", self.domain)
    }

    /// Whether the host would deliver a request for `url` to the router.
    ///
    /// `*.` matches the domain itself as well as any subdomain.
    pub fn matches(&self, url: &str) -> Result<bool> {
        let parsed =
            url::Url::parse(url).with_context(|| format!("invalid URL for intercept filter: {url}"))?;
        if !WILDCARD_SCHEMES.contains(&parsed.scheme()) {
            return Ok(false);
        }
        let Some(host) = parsed.host_str() else {
            return Ok(false);
        };
        let host = host.trim_end_matches('.');
        Ok(host == self.domain
            || host
                .strip_suffix(&self.domain)
                .is_some_and(|prefix| prefix.ends_with('.')))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_uses_wildcards() {
        let f = InterceptFilter::for_domain("wikipedia.org");
        assert_eq!(f.pattern(), "*://*.wikipedia.org/*");
    }

    #[test]
    fn matches_domain_and_subdomains() {
        let f = InterceptFilter::for_domain("wikipedia.org");
        assert!(f.matches("https://wikipedia.org/").unwrap());
        assert!(f.matches("http://en.wikipedia.org/wiki/Foo").unwrap());
        assert!(f.matches("https://upload.wikimedia.wikipedia.org/x").unwrap());
        assert!(f.matches("wss://www.wikipedia.org/socket").unwrap());
    }

    #[test]
    fn rejects_lookalikes_and_other_schemes() {
        let f = InterceptFilter::for_domain("wikipedia.org");
        assert!(!f.matches("https://notwikipedia.org/").unwrap());
        assert!(!f.matches("https://wikipedia.org.evil.com/").unwrap());
        assert!(!f.matches("ftp://en.wikipedia.org/file").unwrap());
    }

    #[test]
    fn invalid_url_is_an_error() {
        let f = InterceptFilter::for_domain("wikipedia.org");
        assert!(f.matches("not a url").is_err());
    }
}
