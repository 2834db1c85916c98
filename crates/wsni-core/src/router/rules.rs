//! Ordered routing rules. The first rule that applies decides the request.

use std::fmt;

use crate::landing::LandingRoots;

/// One guard in the routing chain, listed in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Request for the "www" landing root: the last leg of the ping-pong.
    LandingReturn,
    /// Request for the bare landing root, i.e. our own redirect target.
    IgnoreRecursion,
    /// Plain `http://` request, upgraded before anything else happens.
    UpgradeScheme,
    /// A ping-pong started less than the debounce window ago.
    Debounce,
    /// Catch-all: start a new ping-pong exchange.
    PingPong,
}

impl Rule {
    pub const ORDER: [Rule; 5] = [
        Rule::LandingReturn,
        Rule::IgnoreRecursion,
        Rule::UpgradeScheme,
        Rule::Debounce,
        Rule::PingPong,
    ];

    /// Whether this rule applies to `url`. `debouncing` is true while the
    /// debounce window since the last ping-pong start is still open.
    pub fn applies(self, url: &str, roots: &LandingRoots, debouncing: bool) -> bool {
        match self {
            Rule::LandingReturn => roots.matches_www(url),
            Rule::IgnoreRecursion => roots.matches_bare(url),
            Rule::UpgradeScheme => is_insecure(url),
            Rule::Debounce => debouncing,
            Rule::PingPong => true,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rule::LandingReturn => "landing-return",
            Rule::IgnoreRecursion => "ignore-recursion",
            Rule::UpgradeScheme => "upgrade-scheme",
            Rule::Debounce => "debounce",
            Rule::PingPong => "ping-pong",
        };
        f.pad(s)
    }
}

/// First rule in [`Rule::ORDER`] that applies.
pub fn classify(url: &str, roots: &LandingRoots, debouncing: bool) -> Rule {
    Rule::ORDER
        .into_iter()
        .find(|rule| rule.applies(url, roots, debouncing))
        .unwrap_or(Rule::PingPong)
}

const INSECURE: &str = "http://";

/// True when `url` starts with `http://` (ASCII case-insensitive).
pub fn is_insecure(url: &str) -> bool {
    url.get(..INSECURE.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(INSECURE))
}

/// Same URL with the `http://` scheme replaced by `https://`.
pub fn upgrade_scheme(url: &str) -> Option<String> {
    is_insecure(url).then(|| format!("https://{}", &url[INSECURE.len()..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchMode;

    fn roots() -> LandingRoots {
        LandingRoots::new(
            "https",
            "wikipedia.org",
            "censorship-circumvention",
            MatchMode::Substring,
        )
    }

    #[test]
    fn order_is_fixed() {
        assert_eq!(Rule::ORDER[0], Rule::LandingReturn);
        assert_eq!(Rule::ORDER[4], Rule::PingPong);
    }

    #[test]
    fn landing_roots_beat_everything() {
        let r = roots();
        let www = format!("{}0000000000000001", r.www());
        let bare = format!("{}0000000000000001", r.bare());
        assert_eq!(classify(&www, &r, true), Rule::LandingReturn);
        assert_eq!(classify(&bare, &r, true), Rule::IgnoreRecursion);
    }

    #[test]
    fn upgrade_beats_debounce() {
        let r = roots();
        assert_eq!(
            classify("http://en.wikipedia.org/wiki/Foo", &r, true),
            Rule::UpgradeScheme
        );
        assert_eq!(
            classify("https://en.wikipedia.org/wiki/Foo", &r, true),
            Rule::Debounce
        );
        assert_eq!(
            classify("https://en.wikipedia.org/wiki/Foo", &r, false),
            Rule::PingPong
        );
    }

    #[test]
    fn upgrade_scheme_rewrites_only_the_scheme() {
        assert_eq!(
            upgrade_scheme("http://en.wikipedia.org/w?u=http://x").as_deref(),
            Some("https://en.wikipedia.org/w?u=http://x")
        );
        assert_eq!(
            upgrade_scheme("HTTP://en.wikipedia.org/").as_deref(),
            Some("https://en.wikipedia.org/")
        );
        assert_eq!(upgrade_scheme("https://en.wikipedia.org/"), None);
        assert_eq!(upgrade_scheme("ws://en.wikipedia.org/"), None);
    }
}
