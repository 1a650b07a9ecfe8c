//! Listener settings: bind address, allowed CORS origins and the per-request
//! deadline.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
    /// Browser origins allowed to call the API. Empty means any origin.
    pub cors_origins: Vec<String>,
    /// Requests still running after this many seconds get a 408
    pub request_timeout_secs: u64,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
            cors_origins: Vec::new(),
            request_timeout_secs: 30,
        }
    }
}

impl HttpServerConfig {
    /// `host:port`, ready for parsing into a `SocketAddr`
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listens_on_port_4000_everywhere() {
        let config = HttpServerConfig::default();
        assert_eq!(config.socket_addr(), "0.0.0.0:4000");
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_missing_keys_keep_defaults() {
        let config: HttpServerConfig =
            serde_json::from_str(r#"{ "host": "127.0.0.1", "cors_origins": ["http://localhost:3000"] }"#)
                .unwrap();
        assert_eq!(config.socket_addr(), "127.0.0.1:4000");
        assert_eq!(config.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.request_timeout_secs, 30);
    }
}
