//! CLI host harness for the wsni redirect router.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wsni_core::config::{self, RouterConfig};

use commands::{run_config, run_pattern, run_route, run_serve};

/// Top-level CLI for the wsni redirect router.
#[derive(Debug, Parser)]
#[command(name = "wsni")]
#[command(about = "wsni: SNI ping-pong redirect router", long_about = None)]
pub struct Cli {
    /// Use this config file instead of ~/.config/wsni/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Route URLs in order through one router and print each decision.
    Route {
        /// Request URLs, as the host would deliver them.
        #[arg(required = true)]
        urls: Vec<String>,
        /// Print the host blocking response as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// Read host events (one JSON object per line) on stdin and answer each on stdout.
    Serve,

    /// Print the intercept registration pattern.
    Pattern,

    /// Print the effective configuration as TOML.
    Config,
}

impl Cli {
    fn load_config(&self) -> Result<RouterConfig> {
        match &self.config {
            Some(path) => config::load_from_path(path),
            None => config::load_or_init(),
        }
    }

    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = cli.load_config()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Route { urls, json } => run_route(&cfg, &urls, json)?,
            CliCommand::Serve => run_serve(&cfg)?,
            CliCommand::Pattern => run_pattern(&cfg),
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}
