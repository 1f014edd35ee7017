//! Service configuration
//!
//! The service is configured from an optional YAML file; command line flags
//! override individual values. Every field has a default, so an empty file
//! (or no file) plus a `--source`/`--file` flag is a complete configuration.
//!
//! ```yaml
//! source:
//!   url: "https://example.com/stations.json"
//!   format: json
//!   record_path: data.items
//! http:
//!   timeout_secs: 30
//!   max_retries: 3
//!   backoff: exponential
//! server:
//!   port: 3000
//! ingest:
//!   refresh_secs: 300
//! ```

use crate::decode::{DecoderConfig, DecoderFormat};
use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use crate::types::{BackoffType, OptionStringExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete service configuration loaded from YAML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Where records come from
    #[serde(default)]
    pub source: SourceConfig,

    /// HTTP client settings for remote sources
    #[serde(default)]
    pub http: HttpConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Ingestion schedule
    #[serde(default)]
    pub ingest: IngestConfig,
}

impl ServiceConfig {
    /// Load a config from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::FileNotFound {
                path: path.display().to_string(),
            },
            _ => Error::Io(e),
        })?;
        Self::from_yaml(&content)
    }

    /// Parse a config from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Check that the config describes exactly one usable source
    pub fn validate(&self) -> Result<()> {
        self.source.location()?;

        if self.source.format == DecoderFormat::Jsonl
            && self.source.record_path.clone().none_if_empty().is_some()
        {
            return Err(Error::invalid_value(
                "source.record_path",
                "not supported with format jsonl",
            ));
        }
        if self.http.timeout_secs == 0 {
            return Err(Error::invalid_value(
                "http.timeout_secs",
                "must be greater than zero",
            ));
        }
        if let Some(0) = self.ingest.refresh_secs {
            return Err(Error::invalid_value(
                "ingest.refresh_secs",
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Decoder settings for the configured source
    pub fn decoder_config(&self) -> DecoderConfig {
        DecoderConfig {
            format: self.source.format,
            record_path: self.source.record_path.clone().none_if_empty(),
        }
    }

    /// HTTP client settings for a remote source
    pub fn http_client_config(&self) -> HttpClientConfig {
        HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.http.timeout_secs))
            .max_retries(self.http.max_retries)
            .backoff(
                self.http.backoff,
                Duration::from_millis(self.http.initial_backoff_ms),
                Duration::from_secs(self.http.max_backoff_secs),
            )
            .build()
    }

    /// Refresh interval, if periodic refresh is enabled
    pub fn refresh_interval(&self) -> Option<Duration> {
        self.ingest.refresh_secs.map(Duration::from_secs)
    }
}

// ============================================================================
// Source Config
// ============================================================================

/// Record source configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// URL to fetch records from
    #[serde(default)]
    pub url: Option<String>,

    /// Local file to read records from
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Body format
    #[serde(default)]
    pub format: DecoderFormat,

    /// Dot path to the record array inside a JSON body
    #[serde(default)]
    pub record_path: Option<String>,
}

/// Resolved location of a record source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    /// Remote URL
    Url(String),
    /// Local file
    Path(PathBuf),
}

impl SourceConfig {
    /// Point the source at a URL, replacing any file path
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = Some(url.into());
        self.path = None;
    }

    /// Point the source at a local file, replacing any URL
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
        self.url = None;
    }

    /// Resolve the configured location, requiring exactly one of url/path
    pub fn location(&self) -> Result<SourceLocation> {
        match (self.url.clone().none_if_empty(), &self.path) {
            (Some(_), Some(_)) => Err(Error::config(
                "source.url and source.path are mutually exclusive",
            )),
            (None, None) => Err(Error::config(
                "no record source configured: set source.url or source.path",
            )),
            (Some(url), None) => {
                let parsed = url::Url::parse(&url)?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(Error::invalid_value(
                        "source.url",
                        format!("unsupported scheme '{}'", parsed.scheme()),
                    ));
                }
                Ok(SourceLocation::Url(url))
            }
            (None, Some(path)) => Ok(SourceLocation::Path(path.clone())),
        }
    }
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum number of retries
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in seconds
    #[serde(default = "default_max_backoff_secs")]
    pub max_backoff_secs: u64,

    /// Backoff strategy
    #[serde(default)]
    pub backoff: BackoffType,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_secs: default_max_backoff_secs(),
            backoff: BackoffType::default(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    100
}

fn default_max_backoff_secs() -> u64 {
    60
}

// ============================================================================
// Server & Ingest Config
// ============================================================================

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

/// Ingestion schedule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IngestConfig {
    /// Re-ingest every N seconds; ingest once when unset
    #[serde(default)]
    pub refresh_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
source:
  url: "https://example.com/stations.json"
  format: json
  record_path: data.items
http:
  timeout_secs: 10
  max_retries: 5
  initial_backoff_ms: 250
  max_backoff_secs: 20
  backoff: linear
server:
  port: 8080
ingest:
  refresh_secs: 300
"#;

        let config = ServiceConfig::from_yaml(yaml).unwrap();
        assert_eq!(
            config.source.url,
            Some("https://example.com/stations.json".to_string())
        );
        assert_eq!(config.source.record_path, Some("data.items".to_string()));
        assert_eq!(config.http.max_retries, 5);
        assert_eq!(config.http.backoff, BackoffType::Linear);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.refresh_interval(), Some(Duration::from_secs(300)));
        config.validate().unwrap();
    }

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::from_yaml("source:\n  path: data.jsonl\n  format: jsonl\n")
            .unwrap();

        assert_eq!(config.http, HttpConfig::default());
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.refresh_interval(), None);
        assert_eq!(config.decoder_config(), DecoderConfig::jsonl());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(ServiceConfig::from_yaml("").unwrap(), ServiceConfig::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = ServiceConfig::from_yaml("server:\n  hostname: x\n").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_validate_requires_one_source() {
        let err = ServiceConfig::default().validate().unwrap_err();
        assert!(err.to_string().contains("no record source configured"));

        let mut config = ServiceConfig::default();
        config.source.url = Some("https://example.com/a.json".into());
        config.source.path = Some(PathBuf::from("a.json"));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("mutually exclusive"));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = ServiceConfig::default();
        config.source.set_url("not a url");
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::InvalidUrl(_)
        ));

        config.source.set_url("ftp://example.com/a.json");
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::InvalidConfigValue { .. }
        ));
    }

    #[test]
    fn test_validate_rejects_zero_refresh() {
        let mut config = ServiceConfig::default();
        config.source.set_path("a.json");
        config.ingest.refresh_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_set_url_and_path_replace_each_other() {
        let mut source = SourceConfig::default();
        source.set_path("a.json");
        source.set_url("https://example.com/a.json");
        assert_eq!(
            source.location().unwrap(),
            SourceLocation::Url("https://example.com/a.json".into())
        );

        source.set_path("b.json");
        assert_eq!(
            source.location().unwrap(),
            SourceLocation::Path(PathBuf::from("b.json"))
        );
    }

    #[test]
    fn test_record_path_rejected_for_jsonl() {
        let config = ServiceConfig::from_yaml(
            "source:\n  path: data.jsonl\n  format: jsonl\n  record_path: items\n",
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("source.record_path"));

        let mut config = config;
        config.source.record_path = Some(" ".into());
        config.validate().unwrap();
    }

    #[test]
    fn test_blank_record_path_ignored() {
        let mut config = ServiceConfig::default();
        config.source.record_path = Some("  ".into());
        assert_eq!(config.decoder_config().record_path, None);
    }

    #[test]
    fn test_http_client_config() {
        let mut config = ServiceConfig::default();
        config.http.timeout_secs = 5;
        config.http.backoff = BackoffType::Constant;

        let client = config.http_client_config();
        assert_eq!(client.timeout, Duration::from_secs(5));
        assert_eq!(client.backoff_type, BackoffType::Constant);
        assert_eq!(client.initial_backoff, Duration::from_millis(100));
        assert_eq!(client.max_backoff, Duration::from_secs(60));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "source:\n  path: /tmp/records.json").unwrap();

        let config = ServiceConfig::load(file.path()).unwrap();
        assert_eq!(config.source.path, Some(PathBuf::from("/tmp/records.json")));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ServiceConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
