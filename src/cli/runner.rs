//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::ServiceConfig;
use crate::engine::IngestEngine;
use crate::error::{Error, Result, ResultExt};
use crate::query::{FilterSpec, Query};
use crate::snapshot::SnapshotStore;
use crate::source;
use crate::types::{JsonValue, OptionStringExt};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let mut config = self.load_config()?;

        match &self.cli.command {
            Commands::Serve { port, refresh_secs } => {
                if let Some(port) = port {
                    config.server.port = *port;
                }
                if refresh_secs.is_some() {
                    config.ingest.refresh_secs = *refresh_secs;
                }
                config.validate()?;
                self.serve(&config).await
            }
            Commands::Schema => {
                let engine = Self::ingest(&config).await?;
                self.output(&engine.store().schema())
            }
            Commands::Query { filter, order_by } => {
                let query = Self::build_query(filter.as_deref(), order_by.clone())?;
                let engine = Self::ingest(&config).await?;
                self.output(&engine.store().rows(&query))
            }
            Commands::Get { id } => {
                let engine = Self::ingest(&config).await?;
                let row = engine.store().row_by_id(&JsonValue::String(id.clone()))?;
                self.output(&row)
            }
        }
    }

    /// Load the config file (if any) and apply source flags over it
    fn load_config(&self) -> Result<ServiceConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ServiceConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ServiceConfig::default(),
        };

        if let Some(url) = self.cli.source.clone().none_if_empty() {
            config.source.set_url(url);
        }
        if let Some(path) = &self.cli.file {
            config.source.set_path(path);
        }
        if let Some(record_path) = &self.cli.record_path {
            config.source.record_path = Some(record_path.clone());
        }
        if let Some(format) = self.cli.format {
            config.source.format = format;
        }

        Ok(config)
    }

    /// Build a query from `--where` and `--order-by`
    fn build_query(filter: Option<&str>, order_by: Option<String>) -> Result<Query> {
        let mut query = Query::new();
        if let Some(raw) = filter {
            let value: JsonValue = serde_json::from_str(raw)
                .map_err(|e| Error::invalid_query(format!("--where is not valid JSON: {e}")))?;
            query = query.with_filter(FilterSpec::from_json(&value)?);
        }
        if let Some(key) = order_by.none_if_empty() {
            query = query.with_order_by(key);
        }
        Ok(query)
    }

    /// Ingest once for a one-shot command; failure is fatal here
    async fn ingest(config: &ServiceConfig) -> Result<IngestEngine> {
        config.validate()?;
        let engine = IngestEngine::new(source::from_config(config)?, Arc::new(SnapshotStore::new()));
        engine.ingest_once().await?;
        Ok(engine)
    }

    /// Ingest, schedule refreshes and serve until shutdown
    async fn serve(&self, config: &ServiceConfig) -> Result<()> {
        let store = Arc::new(SnapshotStore::new());
        let engine = IngestEngine::new(source::from_config(config)?, Arc::clone(&store));

        // The server starts even if the first ingestion fails
        if engine.refresh().await.is_none() {
            warn!("Serving an empty snapshot until the next successful ingestion");
        }

        let refresh = config
            .refresh_interval()
            .map(|every| engine.spawn_refresh(every));

        let result = crate::cli::serve(store, config.server.port).await;

        if let Some(handle) = refresh {
            handle.abort();
        }
        result
    }

    /// Write a value to stdout as JSON
    fn output<T: Serialize>(&self, value: &T) -> Result<()> {
        let text = if self.cli.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        println!("{text}");
        Ok(())
    }
}
