use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::pipeline::{EtlDefaults, OcrDefaults, PollerConfig};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub poller: PollerConfig,
    #[serde(default)]
    pub ocr: OcrDefaults,
    #[serde(default)]
    pub etl: EtlDefaults,
}

/// Operator console listen address
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Base URLs and timeouts for the three collaborating services.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServicesConfig {
    /// File storage/organizer service (e.g., "http://localhost:8005")
    #[serde(default = "default_storage_url")]
    pub storage_url: String,
    /// ETL service
    #[serde(default = "default_etl_url")]
    pub etl_url: String,
    /// OCR service
    #[serde(default = "default_ocr_url")]
    pub ocr_url: String,
    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u32,
    /// Timeout for health probes in seconds (default: 5)
    #[serde(default = "default_health_timeout")]
    pub health_timeout_secs: u32,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            storage_url: default_storage_url(),
            etl_url: default_etl_url(),
            ocr_url: default_ocr_url(),
            request_timeout_secs: default_request_timeout(),
            health_timeout_secs: default_health_timeout(),
        }
    }
}

fn default_storage_url() -> String {
    "http://localhost:8005".to_string()
}

fn default_etl_url() -> String {
    "http://localhost:8002".to_string()
}

fn default_ocr_url() -> String {
    "http://localhost:8006".to_string()
}

fn default_request_timeout() -> u32 {
    30
}

fn default_health_timeout() -> u32 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.services.storage_url, "http://localhost:8005");
        assert_eq!(config.services.etl_url, "http://localhost:8002");
        assert_eq!(config.services.ocr_url, "http://localhost:8006");
        assert_eq!(config.services.request_timeout_secs, 30);
        assert_eq!(config.services.health_timeout_secs, 5);
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000

[services]
storage_url = "http://files:8005"
etl_url = "http://etl:8002"
ocr_url = "http://ocr:8006"
request_timeout_secs = 10

[poller]
max_attempts = 20
interval_ms = 2000

[ocr]
default_language = "fra"
default_confidence_threshold = 50.0

[etl]
default_language = "deu"
recent_jobs_limit = 5
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.services.etl_url, "http://etl:8002");
        assert_eq!(config.services.request_timeout_secs, 10);
        assert_eq!(config.services.health_timeout_secs, 5);
        assert_eq!(config.poller.max_attempts, 20);
        assert_eq!(config.poller.interval_ms, 2000);
        assert_eq!(config.ocr.default_language, "fra");
        assert_eq!(config.ocr.default_confidence_threshold, 50.0);
        assert_eq!(config.etl.default_language, "deu");
        assert_eq!(config.etl.recent_jobs_limit, 5);
    }

    #[test]
    fn test_config_serializes_back() {
        let config = Config::default();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["server"]["port"], 8080);
        assert_eq!(json["poller"]["max_attempts"], 15);
    }
}
