// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub static_files: StaticFilesConfig,
    pub geocoder: GeocoderConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// `env_logger` filter directive, e.g. `info` or `geodist=debug,hyper=warn`
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration, durations in seconds
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Upper bound on the lifetime of one inbound connection
    pub read_timeout: u64,
    /// Deadline for answering one `/distance` request
    pub request_timeout: u64,
    pub max_connections: Option<u64>,
    /// How long shutdown waits for active connections
    pub shutdown_grace: u64,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    /// Liveness probe path, empty to disable
    #[serde(default)]
    pub health_path: String,
}

/// Static front-end configuration
#[derive(Debug, Deserialize, Clone)]
pub struct StaticFilesConfig {
    pub root: String,
    #[serde(default = "default_index_files")]
    pub index_files: Vec<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_index_files() -> Vec<String> {
    vec!["index.html".to_string(), "index.htm".to_string()]
}

/// Outbound geocoding provider configuration
#[derive(Debug, Deserialize, Clone)]
pub struct GeocoderConfig {
    /// Provider root; `/search` is appended
    pub base_url: String,
    /// Identifying User-Agent, required by public Nominatim instances
    pub user_agent: String,
    /// Per-request timeout in seconds
    pub timeout: u64,
    /// Resolve both addresses concurrently instead of one after the other
    pub parallel_lookups: bool,
}
