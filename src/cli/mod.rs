//! CLI module for newsdesk
//!
//! Provides command-line interface for:
//! - serve: Load configuration and run the HTTP API
//! - check-config: Validate a configuration file and exit
//! - hash-password: Print an Argon2id hash for a `users` entry

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{check_config, hash_password, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
