//! Canonical landing roots and the host intercept filter.
//!
//! The router issues redirects to `<scheme>://<domain>/<path>/<token>` (the
//! bare root) and expects the remote site to bounce the browser on to
//! `<scheme>://www.<domain>/<path>/<token>` (the "www" root).

mod filter;

pub use filter::InterceptFilter;

use crate::config::{MatchMode, RouterConfig};
use crate::token::Token;

/// The two canonical landing roots, both ending in `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingRoots {
    bare: String,
    www: String,
    mode: MatchMode,
}

impl LandingRoots {
    pub fn new(scheme: &str, domain: &str, path: &str, mode: MatchMode) -> Self {
        let domain = domain.trim().trim_end_matches('.').to_ascii_lowercase();
        let path = path.trim_matches('/');
        Self {
            bare: format!("{scheme}://{domain}/{path}/"),
            www: format!("{scheme}://www.{domain}/{path}/"),
            mode,
        }
    }

    pub fn from_config(cfg: &RouterConfig) -> Self {
        Self::new(
            &cfg.scheme,
            &cfg.target_domain,
            &cfg.landing_path,
            cfg.match_mode,
        )
    }

    pub fn bare(&self) -> &str {
        &self.bare
    }

    pub fn www(&self) -> &str {
        &self.www
    }

    /// Byte offset just past `root` inside `url`, if it matches.
    fn find(&self, url: &str, root: &str) -> Option<usize> {
        match self.mode {
            MatchMode::Substring => url.find(root).map(|i| i + root.len()),
            MatchMode::Prefix => url.starts_with(root).then_some(root.len()),
        }
    }

    pub fn matches_www(&self, url: &str) -> bool {
        self.find(url, &self.www).is_some()
    }

    pub fn matches_bare(&self, url: &str) -> bool {
        self.find(url, &self.bare).is_some()
    }

    /// Intermediate URL the browser is sent to for a given token.
    pub fn intermediate_url(&self, token: &Token) -> String {
        format!("{}{}", self.bare, token)
    }

    /// Text following the "www" root, cut at the next `/`, `?` or `#`.
    pub fn token_suffix<'a>(&self, url: &'a str) -> Option<&'a str> {
        let start = self.find(url, &self.www)?;
        let rest = &url[start..];
        let end = rest.find(|c: char| matches!(c, '/' | '?' | '#')).unwrap_or(rest.len());
        Some(&rest[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roots(mode: MatchMode) -> LandingRoots {
        LandingRoots::new("https", "wikipedia.org", "censorship-circumvention", mode)
    }

    #[test]
    fn builds_bare_and_www_roots() {
        let r = roots(MatchMode::Substring);
        assert_eq!(r.bare(), "https://wikipedia.org/censorship-circumvention/");
        assert_eq!(r.www(), "https://www.wikipedia.org/censorship-circumvention/");
    }

    #[test]
    fn normalises_domain_and_path() {
        let r = LandingRoots::new("https", " Wikipedia.ORG. ", "/landing/", MatchMode::Prefix);
        assert_eq!(r.bare(), "https://wikipedia.org/landing/");
    }

    #[test]
    fn roots_do_not_match_each_other() {
        let r = roots(MatchMode::Substring);
        assert!(!r.matches_www(r.bare()));
        assert!(!r.matches_bare(r.www()));
    }

    #[test]
    fn substring_mode_matches_anywhere() {
        let r = roots(MatchMode::Substring);
        let embedded =
            "https://en.wikipedia.org/w/index.php?from=https://wikipedia.org/censorship-circumvention/1";
        assert!(r.matches_bare(embedded));
        assert!(!roots(MatchMode::Prefix).matches_bare(embedded));
    }

    #[test]
    fn token_suffix_stops_at_delimiters() {
        let r = roots(MatchMode::Substring);
        let www = r.www();
        assert_eq!(r.token_suffix(&format!("{www}1234")), Some("1234"));
        assert_eq!(r.token_suffix(&format!("{www}1234?utm=x")), Some("1234"));
        assert_eq!(r.token_suffix(&format!("{www}1234/extra")), Some("1234"));
        assert_eq!(r.token_suffix(www), Some(""));
        assert_eq!(r.token_suffix("https://en.wikipedia.org/wiki/Foo"), None);
    }

    #[test]
    fn intermediate_url_appends_token() {
        let r = roots(MatchMode::Substring);
        let token = Token::parse("0000000000000042", 16).unwrap();
        assert_eq!(
            r.intermediate_url(&token),
            "https://wikipedia.org/censorship-circumvention/0000000000000042"
        );
    }
}
