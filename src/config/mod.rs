// Configuration module entry point
// Loads layered configuration and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;
use std::time::Duration;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, GeocoderConfig, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig,
    StaticFilesConfig,
};

/// Default config file base name, resolved as `config.toml` and friends
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Identifies this build to clients and to the geocoding provider
pub const DEFAULT_AGENT: &str = concat!("geodist/", env!("CARGO_PKG_VERSION"));

impl Config {
    /// Load configuration from the default file name
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional. Environment variables such as
    /// `GEODIST_SERVER__PORT=9090` override it.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("GEODIST")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.request_timeout", 20)?
            .set_default("performance.shutdown_grace", 5)?
            .set_default("http.server_name", DEFAULT_AGENT)?
            .set_default("http.enable_cors", false)?
            .set_default("http.health_path", "/healthz")?
            .set_default("static_files.root", ".")?
            .set_default("geocoder.base_url", "https://nominatim.openstreetmap.org")?
            .set_default("geocoder.user_agent", DEFAULT_AGENT)?
            .set_default("geocoder.timeout", 10)?
            .set_default("geocoder.parallel_lookups", false)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

impl PerformanceConfig {
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub const fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout)
    }

    pub const fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace)
    }
}
