//! CLI argument definitions using clap
//!
//! Commands:
//! - newsdesk serve --config <path> [--port <port>] [--memory-seed <path>]
//! - newsdesk check-config --config <path>
//! - newsdesk hash-password <password>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// newsdesk - paginated news and events API
#[derive(Parser, Debug)]
#[command(name = "newsdesk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP API
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./newsdesk.json")]
        config: PathBuf,

        /// Port to listen on, overriding the configuration
        #[arg(long, env = "NEWSDESK_PORT")]
        port: Option<u16>,

        /// Serve from an in-memory store seeded with this JSON file instead of PostgREST
        #[arg(long)]
        memory_seed: Option<PathBuf>,
    },

    /// Validate a configuration file and exit
    CheckConfig {
        /// Path to configuration file
        #[arg(long, default_value = "./newsdesk.json")]
        config: PathBuf,
    },

    /// Print an Argon2id hash for use in `auth.users`
    HashPassword {
        password: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
