//! Object storage port and its implementations.

#[cfg(test)]
mod memory_store;
mod s3_store;

use std::collections::HashMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};

#[cfg(test)]
pub use memory_store::MemoryStore;
pub use s3_store::S3Store;

/// An object fetched from the bucket.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub content_type: Option<String>,
    pub content_length: u64,
    pub last_modified: DateTime<Utc>,
    pub metadata: HashMap<String, String>,
    pub body: Option<Bytes>,
}

/// One key returned by a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedObject {
    pub key: String,
}

#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn get_object(&self, key: &str) -> Result<StoredObject, StorageError>;

    /// Keys starting with `prefix`; an empty prefix lists the whole bucket.
    async fn list_objects(&self, prefix: &str) -> Result<Vec<ListedObject>, StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("storage request failed: {0}")]
    Backend(String),
}
