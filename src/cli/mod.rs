//! CLI module for todo-server
//!
//! Provides command-line parsing for the server binary. Flags override the
//! matching environment settings.

use clap::Parser;
use std::path::PathBuf;

use crate::utils::config::Config;

/// todo-server - multi-user todo API
///
/// Configuration is read from the environment (and an optional `.env` file);
/// the flags below take precedence.
#[derive(Parser, Debug)]
#[command(
    name = "todo-server",
    version,
    about = "Multi-user todo API with bearer-token authentication",
    after_help = "EXAMPLES:\n    \
                  todo-server                          # Start with settings from the environment\n    \
                  todo-server --env-file prod.env      # Load a specific env file first\n    \
                  todo-server --host 127.0.0.1 --port 9000"
)]
pub struct Cli {
    /// Env file to load before reading configuration (defaults to ./.env if present)
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Address to bind (overrides HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Applies flag overrides on top of the environment config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
