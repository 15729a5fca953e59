//! CLI command implementations

use std::path::Path;

use crate::config::ServerConfig;
use crate::http::{ApiServer, AppState};
use crate::observability::{Logger, Severity};
use crate::seed;
use crate::store::MemoryStore;

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Dispatch a parsed command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Serve {
            host,
            port,
            data_dir,
        } => serve(host, port, data_dir.as_deref()),
        Command::Seed { data_dir, destroy } => seed_command(&data_dir, destroy),
    }
}

/// Boot the server, optionally importing fixtures first
fn serve(host: Option<String>, port: Option<u16>, data_dir: Option<&Path>) -> CliResult<()> {
    let mut config = ServerConfig::from_env();
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    let state = AppState::from_config(&config);

    if let Some(dir) = data_dir {
        let report = seed::import_data(state.store.as_ref(), dir)?;
        log_report(&report);
    }

    let server = ApiServer::with_state(config, state);

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::Server(format!("runtime: {}", e)))?;
    runtime
        .block_on(server.start())
        .map_err(|e| CliError::Server(e.to_string()))
}

/// One-shot import or destroy against a fresh store.
///
/// The in-memory store lives and dies with the process, so the seed command
/// is mostly useful for validating fixture files before `serve --data-dir`.
fn seed_command(data_dir: &Path, destroy: bool) -> CliResult<()> {
    let store = MemoryStore::new();

    if destroy {
        seed::destroy_data(&store)?;
        Logger::log(Severity::Info, "seed_destroyed", &[]);
        return Ok(());
    }

    let report = seed::import_data(&store, data_dir)?;
    log_report(&report);
    Ok(())
}

fn log_report(report: &seed::SeedReport) {
    Logger::log(
        Severity::Info,
        "seed_imported",
        &[
            ("bootcamps", &report.bootcamps.to_string()),
            ("courses", &report.courses.to_string()),
            ("reviews", &report.reviews.to_string()),
            ("users", &report.users.to_string()),
        ],
    );
}
