// Application state module
// Shared, read-mostly state handed to every connection

use hyper::header::HeaderValue;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::sync::Notify;

use super::types::Config;
use crate::geocoder::Geocode;
use crate::logger::AccessLogFormat;

/// Application state
pub struct AppState {
    pub config: Config,
    pub geocoder: Arc<dyn Geocode>,
    /// Parsed once from `logging.access_log_format`
    pub access_log_format: AccessLogFormat,
    /// `Server` header value; `None` when `http.server_name` is empty or invalid
    pub server_header: Option<HeaderValue>,
    /// Connections currently being served
    pub active_connections: AtomicUsize,
    /// Notified once when the server should stop accepting connections
    pub shutdown: Arc<Notify>,
}

impl AppState {
    pub fn new(config: Config, geocoder: Arc<dyn Geocode>) -> Self {
        let access_log_format = AccessLogFormat::parse(&config.logging.access_log_format);
        let server_header = server_header(&config.http.server_name);

        Self {
            config,
            geocoder,
            access_log_format,
            server_header,
            active_connections: AtomicUsize::new(0),
            shutdown: Arc::new(Notify::new()),
        }
    }
}

fn server_header(name: &str) -> Option<HeaderValue> {
    if name.is_empty() {
        return None;
    }
    match HeaderValue::from_str(name) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring http.server_name '{name}': {e}");
            None
        }
    }
}
