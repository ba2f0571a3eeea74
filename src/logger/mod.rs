//! Logger module
//!
//! `log` facade with an `env_logger` backend, plus helpers for the
//! server lifecycle and the access log.

mod format;

pub use format::{AccessLogEntry, AccessLogFormat};

use crate::config::Config;
use std::io::Write;
use std::net::SocketAddr;

/// Target used for access log lines, filterable as `access=off`
pub const ACCESS_TARGET: &str = "access";

/// Initialize the global logger from `logging.level`
///
/// `RUST_LOG`, when set, wins over the configured filter.
/// Should be called once at application startup.
pub fn init(config: &Config) -> Result<(), log::SetLoggerError> {
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.level.clone());

    env_logger::Builder::new()
        .parse_filters(&filters)
        .format(|buf, record| {
            // Access lines are already complete records
            if record.target() == ACCESS_TARGET {
                return writeln!(buf, "{}", record.args());
            }
            writeln!(
                buf,
                "[{} {:<5} {}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init()
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    log::info!("======================================");
    log::info!("geodist started successfully");
    log::info!("Listening on: http://{addr}");
    log::info!("Log level: {}", config.logging.level);
    if let Some(workers) = config.server.workers {
        log::info!("Worker threads: {workers}");
    }
    log::info!("Static root: {}", config.static_files.root);
    log::info!("Geocoding provider: {}", config.geocoder.base_url);
    if config.geocoder.parallel_lookups {
        log::info!("Geocoding both addresses concurrently");
    }
    log::info!("======================================");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    log::error!("Failed to serve connection: {err:?}");
}

/// Write one formatted access log line
pub fn log_access(entry: &AccessLogEntry, format: &AccessLogFormat) {
    log::info!(target: ACCESS_TARGET, "{}", entry.format(format));
}

/// Log a successful distance answer before it is written to the client
pub fn log_distance_response(payload: &str) {
    log::info!("Response: {payload}");
}
