//! `wsni config` – print the effective configuration.

use anyhow::{Context, Result};
use wsni_core::config::RouterConfig;

pub fn run_config(cfg: &RouterConfig) -> Result<()> {
    let toml = toml::to_string_pretty(cfg).context("serialize config")?;
    print!("{toml}");
    Ok(())
}
