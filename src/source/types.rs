//! Record source trait

use crate::error::Result;
use crate::types::JsonValue;
use async_trait::async_trait;

/// A data source producing a sequence of untyped records
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Human-readable source name used in logs and errors
    fn name(&self) -> &str;

    /// Fetch the full record set
    async fn fetch(&self) -> Result<Vec<JsonValue>>;
}
