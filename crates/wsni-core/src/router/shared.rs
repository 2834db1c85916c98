//! Router behind a single mutex, for hosts that deliver events concurrently.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{Decision, Router};

/// Cloneable handle; every clone routes through the same state.
#[derive(Debug, Clone)]
pub struct SharedRouter {
    inner: Arc<Mutex<Router>>,
}

impl SharedRouter {
    pub fn new(router: Router) -> Self {
        Self {
            inner: Arc::new(Mutex::new(router)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Router> {
        // Router state stays consistent across a panic in a caller, so a
        // poisoned lock is still usable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Route one request. The classify-then-mutate sequence runs under the lock.
    pub fn route(&self, url: &str) -> Decision {
        self.lock().route(url)
    }

    /// Run `f` with exclusive access to the router.
    pub fn with<R>(&self, f: impl FnOnce(&mut Router) -> R) -> R {
        f(&mut self.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::RouterConfig;
    use std::thread;

    #[test]
    fn concurrent_routes_start_exactly_one_ping_pong() {
        let router = Router::new(&RouterConfig::default())
            .unwrap()
            .with_clock(ManualClock::new(1_000_000));
        let shared = SharedRouter::new(router);

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    shared.route(&format!("https://en.wikipedia.org/wiki/Page{i}"))
                })
            })
            .collect();

        let redirects = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|d| matches!(d, Decision::RedirectTo(_)))
            .count();
        assert_eq!(redirects, 1);
        assert_eq!(shared.with(|r| r.pending_len()), 1);
    }
}
