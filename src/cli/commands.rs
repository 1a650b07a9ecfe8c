//! CLI command implementations
//!
//! `serve` follows a fixed boot sequence: load config, validate, start
//! logging, build the store and auth state, then hand the router to a tokio
//! runtime. Nothing is started before validation succeeds.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::auth::{crypto, JwtManager, StaticCredentialStore};
use crate::config::AppConfig;
use crate::http_server::{AppState, HttpServer};
use crate::logging::init_logging;
use crate::store::{DataStore, InMemoryStore, PostgrestStore};

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Main CLI entry point
///
/// Loads `.env` (if present), parses arguments and dispatches.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    // A missing .env is normal
    let _ = dotenvy::dotenv();

    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve {
            config,
            port,
            memory_seed,
        } => serve(&config, port, memory_seed.as_deref()),
        Command::CheckConfig { config } => check_config(&config),
        Command::HashPassword { password } => hash_password(&password),
    }
}

/// Start the HTTP API
///
/// With `memory_seed` the in-memory store is used and no store URL is needed.
pub fn serve(config_path: &Path, port: Option<u16>, memory_seed: Option<&Path>) -> CliResult<()> {
    let mut config = AppConfig::load(config_path)?;
    if let Some(port) = port {
        config.server.port = port;
    }
    config.validate(memory_seed.is_none())?;

    init_logging(&config.log_level);

    let state = build_state(&config, memory_seed)?;
    if config.auth.users.is_empty() {
        warn!("no users configured; every login will be refused");
    }
    info!(
        backend = state.store.backend_name(),
        users = config.auth.users.len(),
        max_limit = config.query.max_limit,
        "newsdesk configured"
    );

    let server = HttpServer::with_config(state, config.server.clone());

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Validate a configuration file and print a summary
pub fn check_config(config_path: &Path) -> CliResult<()> {
    let config = AppConfig::load(config_path)?;
    config.validate(true)?;

    println!("config ok: {}", config_path.display());
    println!("  listen:    {}", config.server.socket_addr());
    println!("  store:     {}", config.store.url);
    println!("  users:     {}", config.auth.users.len());
    println!("  token ttl: {}s", config.auth.token_ttl_secs);
    println!(
        "  limits:    default {}, max {}",
        config.query.default_limit, config.query.max_limit
    );
    Ok(())
}

/// Print an Argon2id PHC hash for `password`
pub fn hash_password(password: &str) -> CliResult<()> {
    let hash = crypto::hash_password(password)?;
    println!("{}", hash);
    Ok(())
}

/// Assemble application state from a validated configuration
pub fn build_state(config: &AppConfig, memory_seed: Option<&Path>) -> CliResult<AppState> {
    let store: Arc<dyn DataStore> = match memory_seed {
        Some(path) => Arc::new(load_seed(path)?),
        None => Arc::new(PostgrestStore::new(&config.store)?),
    };

    let credentials = Arc::new(StaticCredentialStore::new(config.auth.users.clone()));
    let tokens = JwtManager::new(config.auth.jwt_config());

    Ok(AppState::new(store, credentials, tokens)
        .with_limits(config.query.limits())
        .with_list_delay(config.query.list_delay()))
}

fn load_seed(path: &Path) -> CliResult<InMemoryStore> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("Failed to read seed {}: {}", path.display(), e)))?;
    let seed: Value = serde_json::from_str(&content)
        .map_err(|e| CliError::io_error(format!("Invalid seed JSON: {}", e)))?;
    Ok(InMemoryStore::from_seed(seed)?)
}
