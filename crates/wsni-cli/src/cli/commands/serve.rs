//! `wsni serve` – blocking host loop over newline-delimited JSON.
//!
//! Each input line is a host event (`{"url": ...}`); each output line is the
//! matching blocking response. One event is fully routed and answered before
//! the next line is read.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use wsni_core::config::RouterConfig;
use wsni_core::host::{BlockingResponse, HostEvent};
use wsni_core::landing::InterceptFilter;
use wsni_core::router::Router;

pub fn run_serve(cfg: &RouterConfig) -> Result<()> {
    let mut router = Router::new(cfg)?;
    let filter = InterceptFilter::for_domain(&cfg.target_domain);
    tracing::info!("serving host events for {}", filter.pattern());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let answered = serve_lines(&mut router, &filter, stdin.lock(), stdout.lock())?;
    tracing::info!("host closed input after {answered} events");
    Ok(())
}

/// Answer every non-blank line of `input` on `output`. Returns the number of
/// events answered.
pub fn serve_lines<R: BufRead, W: Write>(
    router: &mut Router,
    filter: &InterceptFilter,
    input: R,
    mut output: W,
) -> Result<usize> {
    let mut answered = 0;
    for line in input.lines() {
        let line = line.context("read host event")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let response = respond(router, filter, line);
        let json = serde_json::to_string(&response).context("serialize response")?;
        writeln!(output, "{json}").context("write response")?;
        output.flush().context("flush response")?;
        answered += 1;
    }
    Ok(answered)
}

fn respond(router: &mut Router, filter: &InterceptFilter, line: &str) -> BlockingResponse {
    let event: HostEvent = match serde_json::from_str(line) {
        Ok(ev) => ev,
        Err(e) => {
            tracing::warn!("malformed host event, allowing: {e}");
            return BlockingResponse::allow();
        }
    };
    match filter.matches(&event.url) {
        Ok(true) => BlockingResponse::from(router.route(&event.url)),
        Ok(false) => {
            tracing::debug!("outside {}: {}", filter.pattern(), event.url);
            BlockingResponse::allow()
        }
        Err(e) => {
            tracing::warn!("{e:#}");
            BlockingResponse::allow()
        }
    }
}
