//! The `get_object` and `list_buckets` tools.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use s3doc_core::Dispatcher;
use serde::Serialize;

use crate::storage::{ListedObject, ObjectStorage};

/// Text reported when extraction produced nothing.
pub const NO_CONTENT: &str = "No content";

/// What `get_object` returns for one stored object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionOutcome {
    pub content_length: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub last_modified: DateTime<Utc>,
    pub metadata: HashMap<String, String>,
    pub text: String,
}

pub struct ToolHandler {
    store: Arc<dyn ObjectStorage>,
    dispatcher: Arc<Dispatcher>,
    default_content_type: String,
}

impl ToolHandler {
    pub fn new(
        store: Arc<dyn ObjectStorage>,
        dispatcher: Arc<Dispatcher>,
        default_content_type: impl Into<String>,
    ) -> Self {
        Self {
            store,
            dispatcher,
            default_content_type: default_content_type.into(),
        }
    }

    /// Fetch an object and extract its text.
    pub async fn get_object(&self, key: &str) -> Result<ExtractionOutcome> {
        let object = self
            .store
            .get_object(key)
            .await
            .with_context(|| format!("Failed to fetch '{}'", key))?;

        let content_type = object
            .content_type
            .clone()
            .unwrap_or_else(|| self.default_content_type.clone());
        log::debug!("'{}': {} bytes of {}", key, object.content_length, content_type);

        let dispatcher = self.dispatcher.clone();
        let body = object.body.clone();
        let text = tokio::task::spawn_blocking(move || {
            dispatcher.extract(body.as_deref(), &content_type)
        })
        .await
        .context("Extraction task failed")?
        .with_context(|| format!("Failed to extract text from '{}'", key))?;

        Ok(ExtractionOutcome {
            content_length: object.content_length,
            content_type: object.content_type,
            last_modified: object.last_modified,
            metadata: object.metadata,
            text: if text.is_empty() {
                NO_CONTENT.to_string()
            } else {
                text
            },
        })
    }

    /// List keys under a prefix.
    pub async fn list_buckets(&self, prefix: &str) -> Result<Vec<ListedObject>> {
        self.store
            .list_objects(prefix)
            .await
            .with_context(|| format!("Failed to list objects under '{}'", prefix))
    }
}
