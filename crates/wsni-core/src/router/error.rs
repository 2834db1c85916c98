//! Restore failures. None of these are fatal: the router logs them and lets
//! the request through unmodified.

use thiserror::Error;

use crate::token::Token;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// URL does not contain the "www" landing root, so it carries no token.
    #[error("not a landing return URL: {url}")]
    NotLandingReturn { url: String },
    /// Text after the "www" root is not a token of the configured length.
    #[error("malformed token {suffix:?} (expected {digits} digits)")]
    MalformedToken { suffix: String, digits: usize },
    /// Token is well formed but has no pending entry (expired, consumed, or never issued).
    #[error("no pending redirect for token {token}")]
    LookupMiss { token: Token },
}
