//! `wsni pattern` – print the intercept registration pattern.

use wsni_core::config::RouterConfig;
use wsni_core::landing::InterceptFilter;

pub fn run_pattern(cfg: &RouterConfig) {
    println!("{}", InterceptFilter::for_domain(&cfg.target_domain).pattern());
}
