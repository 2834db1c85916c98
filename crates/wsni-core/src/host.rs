//! Wire shapes exchanged with the host interception API.
//!
//! The host hands us `{"url": ...}` for each blocked request and expects a
//! blocking response: `{}` to let it proceed, `{"redirectUrl": ...}` to
//! redirect it.
//!
//! A suppressed request is one the router declines to act on, not one the
//! browser must drop. Our own intermediate URL has to reach the remote site,
//! whose redirect to the "www" root is what warms the TLS session, so every
//! `Suppress` is answered with `{}`.

use serde::{Deserialize, Serialize};

use crate::router::Decision;

/// One intercepted request. Unknown fields sent by the host are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HostEvent {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockingResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

impl BlockingResponse {
    pub fn allow() -> Self {
        Self::default()
    }
}

impl From<&Decision> for BlockingResponse {
    fn from(decision: &Decision) -> Self {
        match decision {
            Decision::Allow | Decision::Suppress(_) => Self::allow(),
            Decision::RedirectTo(url) => Self {
                redirect_url: Some(url.clone()),
            },
        }
    }
}

impl From<Decision> for BlockingResponse {
    fn from(decision: Decision) -> Self {
        Self::from(&decision)
    }
}
