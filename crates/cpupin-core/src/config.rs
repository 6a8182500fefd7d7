//! Configuration types for cpupin

use serde::{Deserialize, Serialize};

/// Main daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// API server configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DaemonConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &std::path::Path) -> crate::CpupinResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Address to bind the REST API server
    pub address: String,
    /// Port for the REST API server
    pub port: u16,
    /// Host header every request must carry unless `debug` is set
    pub public_host: String,
    /// Skip the host check
    pub debug: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8002,
            public_host: "passthroughtools.org".to_string(),
            debug: false,
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_daemon_config() {
        let config = DaemonConfig::default();
        assert_eq!(config.api.port, 8002);
        assert_eq!(config.api.public_host, "passthroughtools.org");
        assert!(!config.api.debug);
        assert_eq!(config.api.socket_addr(), "127.0.0.1:8002");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"
[api]
port = 9000
debug = true
"#;
        let config: DaemonConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.port, 9000);
        assert!(config.api.debug);
        assert_eq!(config.api.address, "127.0.0.1");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[api]\npublic_host = \"pin.example.org\"\n\n[logging]\nlevel = \"debug\""
        )
        .unwrap();

        let config = DaemonConfig::from_file(file.path()).unwrap();
        assert_eq!(config.api.public_host, "pin.example.org");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_from_missing_file() {
        let result = DaemonConfig::from_file(std::path::Path::new("/nonexistent/cpupin.toml"));
        assert!(matches!(result, Err(crate::CpupinError::Io(_))));
    }

    #[test]
    fn test_from_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nport = \"not a port\"").unwrap();

        let result = DaemonConfig::from_file(file.path());
        assert!(matches!(result, Err(crate::CpupinError::Config(_))));
    }
}
