use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// How canonical landing roots are recognised inside a request URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Root may appear anywhere in the URL (compatible, permissive).
    #[default]
    Substring,
    /// Root must be a prefix of the URL.
    Prefix,
}

/// Router configuration loaded from `~/.config/wsni/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Domain whose requests are intercepted (`*://*.<target_domain>/*`).
    pub target_domain: String,
    /// Path segment of the censorship-circumvention landing page.
    pub landing_path: String,
    /// Scheme used for the canonical landing roots.
    #[serde(default = "default_scheme")]
    pub scheme: String,
    /// Minimum interval in milliseconds between two ping-pong starts.
    pub debounce_ms: u64,
    /// Number of decimal digits in a correlation token (clamped to 1..=32).
    pub token_digits: usize,
    /// Substring (default) or prefix matching of the landing roots.
    #[serde(default)]
    pub match_mode: MatchMode,
    /// When true, a request to the "www" landing root restores the original
    /// target from the pending table instead of being allowed through.
    #[serde(default)]
    pub restore_on_return: bool,
}

fn default_scheme() -> String {
    "https".to_string()
}

pub const MAX_TOKEN_DIGITS: usize = 32;

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            target_domain: "wikipedia.org".to_string(),
            landing_path: "censorship-circumvention".to_string(),
            scheme: default_scheme(),
            debounce_ms: 60_000,
            token_digits: 16,
            match_mode: MatchMode::Substring,
            restore_on_return: false,
        }
    }
}

impl RouterConfig {
    /// Reject values that cannot form a canonical landing root.
    pub fn validate(&self) -> Result<()> {
        let domain = self.target_domain.trim();
        if domain.is_empty() {
            bail!("target_domain must not be empty");
        }
        if domain.contains("://") || domain.contains('/') {
            bail!("target_domain must be a bare host name, got {domain:?}");
        }
        if self.landing_path.trim_matches('/').is_empty() {
            bail!("landing_path must not be empty");
        }
        if self.scheme.is_empty() || !self.scheme.chars().all(|c| c.is_ascii_alphanumeric()) {
            bail!("scheme must be alphanumeric, got {:?}", self.scheme);
        }
        Ok(())
    }

    /// Token length after clamping into the supported range.
    pub fn effective_token_digits(&self) -> usize {
        self.token_digits.clamp(1, MAX_TOKEN_DIGITS)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("wsni")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load and validate configuration from an explicit path.
pub fn load_from_path(path: &Path) -> Result<RouterConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: RouterConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RouterConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RouterConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}
