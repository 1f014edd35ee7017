//! Record source implementations

use super::types::RecordSource;
use crate::config::{ServiceConfig, SourceLocation};
use crate::decode::{DecoderConfig, RecordDecoder};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::types::JsonValue;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// HTTP Source
// ============================================================================

/// Fetches records from a URL
pub struct HttpSource {
    url: String,
    client: HttpClient,
    decoder: Box<dyn RecordDecoder>,
}

impl HttpSource {
    /// Create an HTTP source
    pub fn new(url: impl Into<String>, client: HttpClient, decoder: &DecoderConfig) -> Self {
        Self {
            url: url.into(),
            client,
            decoder: decoder.build(),
        }
    }
}

#[async_trait]
impl RecordSource for HttpSource {
    fn name(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<Vec<JsonValue>> {
        let body = self.client.get_text(&self.url).await?;
        debug!(url = %self.url, bytes = body.len(), "Fetched source body");
        self.decoder.decode(&body)
    }
}

impl std::fmt::Debug for HttpSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSource")
            .field("url", &self.url)
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// File Source
// ============================================================================

/// Reads records from a local file
pub struct FileSource {
    path: PathBuf,
    name: String,
    decoder: Box<dyn RecordDecoder>,
}

impl FileSource {
    /// Create a file source
    pub fn new(path: impl AsRef<Path>, decoder: &DecoderConfig) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            name: path.display().to_string(),
            path,
            decoder: decoder.build(),
        }
    }
}

#[async_trait]
impl RecordSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Vec<JsonValue>> {
        let body = match tokio::fs::read_to_string(&self.path).await {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::FileNotFound {
                    path: self.name.clone(),
                });
            }
            Err(e) => return Err(Error::Io(e)),
        };
        debug!(path = %self.name, bytes = body.len(), "Read source file");
        self.decoder.decode(&body)
    }
}

impl std::fmt::Debug for FileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSource")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Static Source
// ============================================================================

/// Serves a fixed, in-memory record set
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<JsonValue>,
}

impl StaticSource {
    /// Create a static source
    pub fn new(records: Vec<JsonValue>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl RecordSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(&self) -> Result<Vec<JsonValue>> {
        Ok(self.records.clone())
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Build the record source a service config describes
pub fn from_config(config: &ServiceConfig) -> Result<Arc<dyn RecordSource>> {
    let decoder = config.decoder_config();
    match config.source.location()? {
        SourceLocation::Url(url) => {
            let client = HttpClient::with_config(config.http_client_config())?;
            Ok(Arc::new(HttpSource::new(url, client, &decoder)))
        }
        SourceLocation::Path(path) => Ok(Arc::new(FileSource::new(path, &decoder))),
    }
}
