//! CLI command handlers. Each command is in its own file.

mod config;
mod pattern;
mod route;
mod serve;

pub use config::run_config;
pub use pattern::run_pattern;
pub use route::run_route;
pub use serve::run_serve;
