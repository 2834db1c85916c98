//! `wsni route <url>...` – route URLs in order and print the rule and decision for each.

use anyhow::{Context, Result};
use wsni_core::config::RouterConfig;
use wsni_core::host::BlockingResponse;
use wsni_core::router::Router;

pub fn run_route(cfg: &RouterConfig, urls: &[String], json: bool) -> Result<()> {
    let mut router = Router::new(cfg)?;
    for url in urls {
        let rule = router.classify(url);
        let decision = router.route(url);
        if json {
            let response = BlockingResponse::from(&decision);
            let line = serde_json::to_string(&response).context("serialize response")?;
            println!("{line}");
        } else {
            println!("{rule:<16} {decision}\t{url}");
        }
    }
    Ok(())
}
