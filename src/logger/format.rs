//! Access log format module
//!
//! Supports multiple log formats:
//! - `combined` (Apache/Nginx combined format)
//! - `common` (Common Log Format - CLF)
//! - `json` (one JSON object per line)
//! - Custom patterns with `$variables`

use chrono::{DateTime, Local};
use hyper::header::{HeaderName, REFERER, USER_AGENT};
use hyper::{Request, Version};
use std::net::SocketAddr;
use std::time::Instant;

const CLF_TIME: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Access log format selected by `logging.access_log_format`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessLogFormat {
    Combined,
    Common,
    Json,
    Custom(String),
}

impl AccessLogFormat {
    pub fn parse(format: &str) -> Self {
        match format {
            "combined" => Self::Combined,
            "common" => Self::Common,
            "json" => Self::Json,
            custom => Self::Custom(custom.to_string()),
        }
    }
}

/// One served request, filled in as the response is produced
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    pub path: String,
    /// Query string without the leading `?`
    pub query: Option<String>,
    pub http_version: &'static str,
    pub status: u16,
    pub body_bytes: u64,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub request_time_us: u64,
    started: Instant,
}

impl AccessLogEntry {
    /// Capture the request side; the clock starts now
    pub fn from_request<B>(req: &Request<B>, peer: SocketAddr) -> Self {
        let header = |name: HeaderName| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };
        Self {
            remote_addr: peer.ip().to_string(),
            time: Local::now(),
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            query: req.uri().query().map(ToString::to_string),
            http_version: version_label(req.version()),
            status: 0,
            body_bytes: 0,
            referer: header(REFERER),
            user_agent: header(USER_AGENT),
            request_time_us: 0,
            started: Instant::now(),
        }
    }

    /// Record the response side and stop the clock
    pub fn finish(&mut self, status: u16, body_bytes: u64) {
        self.status = status;
        self.body_bytes = body_bytes;
        self.request_time_us =
            u64::try_from(self.started.elapsed().as_micros()).unwrap_or(u64::MAX);
    }

    pub fn format(&self, format: &AccessLogFormat) -> String {
        match format {
            AccessLogFormat::Combined => format!(
                "{} \"{}\" \"{}\"",
                self.format_common(),
                self.referer.as_deref().unwrap_or("-"),
                self.user_agent.as_deref().unwrap_or("-"),
            ),
            AccessLogFormat::Common => self.format_common(),
            AccessLogFormat::Json => self.format_json(),
            AccessLogFormat::Custom(pattern) => self.format_custom(pattern),
        }
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} HTTP/{}\" {} {}",
            self.remote_addr,
            self.time.format(CLF_TIME),
            self.method,
            self.request_uri(),
            self.http_version,
            self.status,
            self.body_bytes,
        )
    }

    fn format_json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    /// Expand `$name` variables in one pass; unknown names are kept verbatim
    ///
    /// Variables: `$remote_addr`, `$time_local`, `$time_iso8601`, `$request`,
    /// `$request_method`, `$request_uri`, `$request_time` (seconds),
    /// `$status`, `$body_bytes_sent`, `$http_referer`, `$http_user_agent`.
    fn format_custom(&self, pattern: &str) -> String {
        let mut out = String::with_capacity(pattern.len() + 64);
        let mut rest = pattern;

        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];
            let name_len = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            let name = &after[..name_len];
            match self.variable(name) {
                Some(value) => out.push_str(&value),
                None => {
                    out.push('$');
                    out.push_str(name);
                }
            }
            rest = &after[name_len..];
        }
        out.push_str(rest);
        out
    }

    fn variable(&self, name: &str) -> Option<String> {
        let value = match name {
            "remote_addr" => self.remote_addr.clone(),
            "time_local" => self.time.format(CLF_TIME).to_string(),
            "time_iso8601" => self.time.to_rfc3339(),
            "request" => format!(
                "{} {} HTTP/{}",
                self.method,
                self.request_uri(),
                self.http_version
            ),
            "request_method" => self.method.clone(),
            "request_uri" => self.request_uri(),
            "request_time" => {
                #[allow(clippy::cast_precision_loss)]
                let seconds = self.request_time_us as f64 / 1_000_000.0;
                format!("{seconds:.3}")
            }
            "status" => self.status.to_string(),
            "body_bytes_sent" => self.body_bytes.to_string(),
            "http_referer" => self.referer.clone().unwrap_or_else(|| "-".to_string()),
            "http_user_agent" => self.user_agent.clone().unwrap_or_else(|| "-".to_string()),
            _ => return None,
        };
        Some(value)
    }
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> AccessLogEntry {
        let req = Request::builder()
            .method("GET")
            .uri("/distance?address1=Tokyo&address2=Osaka")
            .header("Referer", "http://localhost:8080/")
            .header("User-Agent", "Mozilla/5.0")
            .body(())
            .unwrap();
        let mut entry = AccessLogEntry::from_request(&req, "192.168.1.1:50000".parse().unwrap());
        entry.finish(200, 74);
        entry.request_time_us = 1500;
        entry
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(AccessLogFormat::parse("json"), AccessLogFormat::Json);
        assert_eq!(
            AccessLogFormat::parse("$status"),
            AccessLogFormat::Custom("$status".to_string())
        );
    }

    #[test]
    fn test_format_combined() {
        let log = sample_entry().format(&AccessLogFormat::Combined);
        assert!(log.starts_with("192.168.1.1 - - ["));
        assert!(log.contains("\"GET /distance?address1=Tokyo&address2=Osaka HTTP/1.1\" 200 74"));
        assert!(log.ends_with("\"http://localhost:8080/\" \"Mozilla/5.0\""));
    }

    #[test]
    fn test_format_common_omits_headers() {
        let log = sample_entry().format(&AccessLogFormat::Common);
        assert!(log.ends_with("HTTP/1.1\" 200 74"));
        assert!(!log.contains("Mozilla"));
    }

    #[test]
    fn test_format_json() {
        let log = sample_entry().format(&AccessLogFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&log).unwrap();
        assert_eq!(value["remote_addr"], "192.168.1.1");
        assert_eq!(value["path"], "/distance");
        assert_eq!(value["query"], "address1=Tokyo&address2=Osaka");
        assert_eq!(value["status"], 200);
        assert_eq!(value["body_bytes"], 74);
    }

    #[test]
    fn test_format_custom() {
        let entry = sample_entry();
        let format = AccessLogFormat::parse(
            "$request_method $request_uri -> $status in $request_time ($unknown)",
        );
        assert_eq!(
            entry.format(&format),
            "GET /distance?address1=Tokyo&address2=Osaka -> 200 in 0.002 ($unknown)"
        );
    }

    #[test]
    fn test_custom_request_does_not_eat_longer_names() {
        let entry = sample_entry();
        let format = AccessLogFormat::parse("[$request] $request_time$");
        assert_eq!(
            entry.format(&format),
            "[GET /distance?address1=Tokyo&address2=Osaka HTTP/1.1] 0.002$"
        );
    }
}
