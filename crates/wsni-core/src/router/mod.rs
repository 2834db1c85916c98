//! Redirect router: the ping-pong state machine.
//!
//! For every intercepted request to the target domain the router returns one
//! [`Decision`]. Outbound requests are bounced to the bare landing root with a
//! fresh token; the remote site redirects that to the "www" landing root,
//! which by then rides on an established TLS session. The original target is
//! kept in a [`PendingTable`] so it can be restored on the way back.
//!
//! State (pending table, last ping-pong start) is owned by the [`Router`]
//! instance. Wrap it in a [`SharedRouter`] when events can arrive concurrently.

mod error;
mod pending;
pub mod rules;
mod shared;

use std::fmt;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::RouterConfig;
use crate::landing::LandingRoots;
use crate::token::{RandomTokens, Token, TokenSource};

pub use error::RouteError;
pub use pending::PendingTable;
pub use rules::Rule;
pub use shared::SharedRouter;

/// Fresh tokens tried before a live entry is overwritten.
const MAX_TOKEN_ATTEMPTS: usize = 8;

/// Why the router declined to act on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    /// Request for our own intermediate URL.
    Recursion,
    /// Inside the debounce window.
    Debounce,
}

/// Routing decision handed back to the host for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Let the request proceed unmodified.
    Allow,
    /// Take no part in the request. The host still lets it go out; our own
    /// intermediate URL in particular must reach the remote site.
    Suppress(SuppressReason),
    /// Redirect the request to the given URL.
    RedirectTo(String),
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Allow => f.write_str("allow"),
            Decision::Suppress(SuppressReason::Recursion) => f.write_str("suppress(recursion)"),
            Decision::Suppress(SuppressReason::Debounce) => f.write_str("suppress(debounce)"),
            Decision::RedirectTo(url) => write!(f, "redirect {url}"),
        }
    }
}

pub struct Router {
    roots: LandingRoots,
    debounce_ms: u64,
    token_digits: usize,
    restore_on_return: bool,
    pending: PendingTable,
    last_action_ms: Option<u64>,
    clock: Box<dyn Clock>,
    tokens: Box<dyn TokenSource>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("roots", &self.roots)
            .field("debounce_ms", &self.debounce_ms)
            .field("token_digits", &self.token_digits)
            .field("restore_on_return", &self.restore_on_return)
            .field("pending", &self.pending.len())
            .field("last_action_ms", &self.last_action_ms)
            .finish()
    }
}

impl Router {
    /// Build a router from a validated config, using the wall clock and
    /// random tokens.
    pub fn new(cfg: &RouterConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            roots: LandingRoots::from_config(cfg),
            debounce_ms: cfg.debounce_ms,
            token_digits: cfg.effective_token_digits(),
            restore_on_return: cfg.restore_on_return,
            pending: PendingTable::new(),
            last_action_ms: None,
            clock: Box::new(SystemClock),
            tokens: Box::new(RandomTokens),
        })
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_token_source(mut self, tokens: impl TokenSource + 'static) -> Self {
        self.tokens = Box::new(tokens);
        self
    }

    pub fn roots(&self) -> &LandingRoots {
        &self.roots
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Time of the last ping-pong start, if any.
    pub fn last_action_ms(&self) -> Option<u64> {
        self.last_action_ms
    }

    fn debouncing(&self, now: u64) -> bool {
        self.last_action_ms
            .is_some_and(|last| now.saturating_sub(last) < self.debounce_ms)
    }

    /// Rule that [`Router::route`] would apply to `url` right now. No side effects.
    pub fn classify(&self, url: &str) -> Rule {
        rules::classify(url, &self.roots, self.debouncing(self.clock.now_ms()))
    }

    /// Decide what to do with one intercepted request.
    pub fn route(&mut self, url: &str) -> Decision {
        match self.classify(url) {
            Rule::LandingReturn if self.restore_on_return => self.restore_or_allow(url),
            Rule::LandingReturn => {
                debug!("wsni: allow intermediate {url}");
                self.release(url);
                Decision::Allow
            }
            Rule::IgnoreRecursion => {
                debug!("wsni: ignore recursion {url}");
                Decision::Suppress(SuppressReason::Recursion)
            }
            Rule::UpgradeScheme => {
                info!("wsni: HTTPS upgrade {url}");
                match rules::upgrade_scheme(url) {
                    Some(target) => Decision::RedirectTo(target),
                    None => Decision::Allow,
                }
            }
            Rule::Debounce => {
                debug!("wsni: ignore recent {url}");
                Decision::Suppress(SuppressReason::Debounce)
            }
            Rule::PingPong => self.exchange(url),
        }
    }

    /// Ping-pong sub-decision: outbound URLs are intercepted, "www" landing
    /// returns are restored.
    pub fn exchange(&mut self, url: &str) -> Decision {
        if self.roots.matches_www(url) {
            self.restore_or_allow(url)
        } else {
            self.intercept(url)
        }
    }

    /// Park `url` under a fresh token and send the browser to the bare
    /// landing root. Stamps the debounce clock.
    pub fn intercept(&mut self, url: &str) -> Decision {
        self.last_action_ms = Some(self.clock.now_ms());

        let token = self.issue_token(url);
        info!(token = %token, "wsni: intercept {url}");
        Decision::RedirectTo(self.roots.intermediate_url(&token))
    }

    fn issue_token(&mut self, url: &str) -> Token {
        for _ in 1..MAX_TOKEN_ATTEMPTS {
            let token = self.tokens.next_token(self.token_digits);
            if self.pending.insert(token.clone(), url) {
                return token;
            }
            debug!(token = %token, "wsni: token collision, drawing again");
        }
        let token = self.tokens.next_token(self.token_digits);
        if let Some(evicted) = self.pending.replace(token.clone(), url) {
            warn!(token = %token, "wsni: token space exhausted, dropped pending {evicted}");
        }
        token
    }

    /// Look up and consume the pending entry named by the token in a "www"
    /// landing URL. Does not touch the debounce clock.
    pub fn restore(&mut self, url: &str) -> Result<String, RouteError> {
        let suffix = self
            .roots
            .token_suffix(url)
            .ok_or_else(|| RouteError::NotLandingReturn {
                url: url.to_string(),
            })?;
        let token =
            Token::parse(suffix, self.token_digits).ok_or_else(|| RouteError::MalformedToken {
                suffix: suffix.to_string(),
                digits: self.token_digits,
            })?;
        self.pending
            .take(&token)
            .ok_or(RouteError::LookupMiss { token })
    }

    /// Drop the pending entry for a "www" landing URL that is allowed
    /// through: the round trip is complete and the token is spent.
    fn release(&mut self, url: &str) {
        match self.restore(url) {
            Ok(target) => debug!("wsni: released token for {target}"),
            Err(err) => debug!("wsni: nothing to release for {url}: {err}"),
        }
    }

    fn restore_or_allow(&mut self, url: &str) -> Decision {
        match self.restore(url) {
            Ok(target) => {
                info!("wsni: restore {url} -> {target}");
                Decision::RedirectTo(target)
            }
            Err(err) => {
                warn!("wsni: restore failed, allowing {url}: {err}");
                Decision::Allow
            }
        }
    }
}
